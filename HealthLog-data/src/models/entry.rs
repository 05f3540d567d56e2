use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Storage model for a health log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-assigned identifier, never reused
    pub id: i64,

    /// When the measurements were taken
    pub date: Option<DateTime<Utc>>,

    /// Free-form note
    pub note: Option<String>,

    /// Blood glucose reading
    pub blood_sugar: Option<f64>,

    /// Systolic blood pressure (the higher number)
    pub systolic: Option<i32>,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: Option<i32>,

    /// Body weight
    pub weight: Option<f64>,

    /// Pulse rate in beats per minute
    pub pulse: Option<i32>,

    /// Carbohydrate intake
    pub carbs: Option<f64>,

    /// Bolus insulin units
    pub insulin_bolus: Option<f64>,

    /// Basal insulin units
    pub insulin_basal: Option<f64>,

    /// Kind of exercise
    pub sport_type: Option<String>,

    /// Exercise duration in minutes
    pub sport_minutes: Option<i32>,
}

/// Every non-id column of an entry, written as a whole on insert and full replace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryData {
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub blood_sugar: Option<f64>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub weight: Option<f64>,
    pub pulse: Option<i32>,
    pub carbs: Option<f64>,
    pub insulin_bolus: Option<f64>,
    pub insulin_basal: Option<f64>,
    pub sport_type: Option<String>,
    pub sport_minutes: Option<i32>,
}

/// Partial update of an entry.
///
/// `date` and `note` are always written. For the remaining fields the outer
/// `Option` says whether the column is touched at all and the inner one holds
/// the new, possibly null, value.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryChanges {
    pub date: DateTime<Utc>,
    pub note: String,
    pub blood_sugar: Option<Option<f64>>,
    pub systolic: Option<Option<i32>>,
    pub diastolic: Option<Option<i32>>,
    pub pulse: Option<Option<i32>>,
    pub weight: Option<Option<f64>>,
    pub sport_minutes: Option<Option<i32>>,
    pub insulin_bolus: Option<Option<f64>>,
}

#[cfg(test)]
impl EntryChanges {
    /// Changes that only set the two mandatory columns
    pub(crate) fn new(date: DateTime<Utc>, note: impl Into<String>) -> Self {
        Self {
            date,
            note: note.into(),
            blood_sugar: None,
            systolic: None,
            diastolic: None,
            pulse: None,
            weight: None,
            sport_minutes: None,
            insulin_bolus: None,
        }
    }
}

/// Canonical text form of a stored date.
///
/// Fixed width with millisecond precision and a `Z` suffix, so string order in
/// SQLite matches chronological order.
pub fn format_stored_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a date previously written by [`format_stored_date`]
pub fn parse_stored_date(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stored_dates_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2023, 9, 30, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap();

        let a = format_stored_date(&earlier);
        let b = format_stored_date(&later);

        assert_eq!(a, "2023-09-30T23:59:59.000Z");
        assert!(a < b);
        assert_eq!(parse_stored_date(&b).unwrap(), later);
    }
}
