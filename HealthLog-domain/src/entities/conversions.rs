use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::entities::entry::{DateInput, EntryChanges, EntryData, EntryDraft, EntryRevision};

/// Date-time layouts accepted without an offset; all are read as UTC
const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Years whose stored text form is fixed width and reads back
const STORABLE_YEARS: RangeInclusive<i32> = 0..=9999;

/// Coerce a client-supplied date into a UTC timestamp
pub fn coerce_date(input: &DateInput) -> Result<DateTime<Utc>, String> {
    let date = match input {
        DateInput::Millis(millis) => Utc
            .timestamp_millis_opt(*millis)
            .single()
            .ok_or_else(|| format!("Invalid date: {} is out of range", millis))?,
        DateInput::Text(text) => parse_date_text(text.trim())?,
    };

    if !STORABLE_YEARS.contains(&date.year()) {
        return Err(format!(
            "Invalid date: year {} is outside {}..={}",
            date.year(),
            STORABLE_YEARS.start(),
            STORABLE_YEARS.end()
        ));
    }

    Ok(date)
}

fn parse_date_text(text: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Ok(date.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("Invalid date: '{}'", text))
}

/// Convert a draft into the full column set, defaulting every absent field to null
pub fn convert_to_data_entry(draft: EntryDraft) -> Result<EntryData, String> {
    let date = match draft.date {
        Some(ref input) if !input.is_absent() => Some(coerce_date(input)?),
        _ => None,
    };

    Ok(EntryData {
        date,
        note: draft.note,
        blood_sugar: draft.blood_sugar,
        systolic: draft.systolic,
        diastolic: draft.diastolic,
        weight: draft.weight,
        pulse: draft.pulse,
        carbs: draft.carbs,
        insulin_bolus: draft.insulin_bolus,
        insulin_basal: draft.insulin_basal,
        sport_type: draft.sport_type,
        sport_minutes: draft.sport_minutes,
    })
}

/// Convert a revision into repository changes; the date is mandatory here
pub fn convert_to_data_changes(revision: EntryRevision) -> Result<EntryChanges, String> {
    let date = revision
        .date
        .as_ref()
        .ok_or_else(|| "date is required".to_string())
        .and_then(coerce_date)?;

    Ok(EntryChanges {
        date,
        note: revision.note.unwrap_or_default(),
        blood_sugar: revision.blood_sugar,
        systolic: revision.systolic,
        diastolic: revision.diastolic,
        pulse: revision.pulse,
        weight: revision.weight,
        sport_minutes: revision.sport_minutes,
        insulin_bolus: revision.insulin_bolus,
    })
}
