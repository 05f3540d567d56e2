use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use health_log_domain::entities::entry::{
    DateInput, Entry as DomainEntry, EntryDraft, EntryRevision,
};

/// Default page size for entry listings
pub const DEFAULT_TAKE: u32 = 100;

/// Health log entry as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique identifier
    pub id: i64,

    /// When the measurements were taken (ISO 8601)
    pub date: Option<DateTime<Utc>>,

    /// Free-form note
    pub note: Option<String>,

    /// Blood glucose reading
    pub blood_sugar: Option<f64>,

    /// Systolic pressure in mmHg
    pub systolic: Option<i32>,

    /// Diastolic pressure in mmHg
    pub diastolic: Option<i32>,

    /// Body weight
    pub weight: Option<f64>,

    /// Pulse in beats per minute
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

impl From<DomainEntry> for Entry {
    fn from(entry: DomainEntry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            note: entry.note,
            blood_sugar: entry.blood_sugar,
            systolic: entry.systolic,
            diastolic: entry.diastolic,
            weight: entry.weight,
            pulse: entry.pulse,
            carbs: entry.carbs,
            insulin_bolus: entry.insulin_bolus,
            insulin_basal: entry.insulin_basal,
            sport_type: entry.sport_type,
            sport_minutes: entry.sport_minutes,
        }
    }
}

/// Request body for creating or replacing an entry.
///
/// Every field is optional. Fields left out are stored as null.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    /// ISO 8601 date-time, `YYYY-MM-DD`, or epoch milliseconds; `""` or `0` means no date
    #[schema(value_type = Option<String>, example = "2024-05-01T06:30:00Z")]
    pub date: Option<DateInput>,
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

impl From<EntryRequest> for EntryDraft {
    fn from(request: EntryRequest) -> Self {
        Self {
            date: request.date,
            note: request.note,
            blood_sugar: request.blood_sugar,
            systolic: request.systolic,
            diastolic: request.diastolic,
            weight: request.weight,
            pulse: request.pulse,
            carbs: request.carbs,
            insulin_bolus: request.insulin_bolus,
            insulin_basal: request.insulin_basal,
            sport_type: request.sport_type,
            sport_minutes: request.sport_minutes,
        }
    }
}

/// Distinguish a field sent as `null` from a field left out
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Request body for the update that names its target in the body.
///
/// `date` is required. A missing `note` is stored as an empty string.
/// Measurement fields that are left out keep their stored value; fields sent
/// as `null` are cleared. Carbs, basal insulin and sport type are not
/// changed by this request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryUpdateRequest {
    /// Entry to update
    pub id: i64,

    #[schema(value_type = String, example = "2024-05-01T06:30:00Z")]
    pub date: Option<DateInput>,

    pub note: Option<String>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<f64>)]
    pub blood_sugar: Option<Option<f64>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<i32>)]
    pub systolic: Option<Option<i32>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<i32>)]
    pub diastolic: Option<Option<i32>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<i32>)]
    pub pulse: Option<Option<i32>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<f64>)]
    pub weight: Option<Option<f64>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<i32>)]
    pub sport_minutes: Option<Option<i32>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<f64>)]
    pub insulin_bolus: Option<Option<f64>>,
}

impl From<EntryUpdateRequest> for EntryRevision {
    fn from(request: EntryUpdateRequest) -> Self {
        Self {
            id: request.id,
            date: request.date,
            note: request.note,
            blood_sugar: request.blood_sugar,
            systolic: request.systolic,
            diastolic: request.diastolic,
            pulse: request.pulse,
            weight: request.weight,
            sport_minutes: request.sport_minutes,
            insulin_bolus: request.insulin_bolus,
        }
    }
}

/// Pagination for entry listings
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListEntriesParams {
    /// Number of entries to skip (default: 0)
    pub skip: Option<u32>,

    /// Maximum number of entries to return (default: 100)
    pub take: Option<u32>,
}

impl ListEntriesParams {
    pub fn skip(&self) -> u32 {
        self.skip.unwrap_or(0)
    }

    pub fn take(&self) -> u32 {
        self.take.unwrap_or(DEFAULT_TAKE)
    }
}

/// Target of the query-string delete
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DeleteEntryParams {
    /// Entry to delete
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_serializes_camel_case_with_nulls() {
        let entry = Entry {
            id: 1,
            date: None,
            note: None,
            blood_sugar: Some(120.0),
            systolic: None,
            diastolic: None,
            weight: None,
            pulse: None,
            carbs: None,
            insulin_bolus: None,
            insulin_basal: None,
            sport_type: None,
            sport_minutes: None,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["bloodSugar"], json!(120.0));
        assert_eq!(value["sportMinutes"], json!(null));
        assert!(value.as_object().unwrap().contains_key("insulinBasal"));
    }

    #[test]
    fn test_update_request_tells_null_from_absent() {
        let request: EntryUpdateRequest = serde_json::from_value(json!({
            "id": 4,
            "date": "2024-05-01",
            "pulse": null,
            "weight": 71.5
        }))
        .unwrap();

        assert_eq!(request.pulse, Some(None));
        assert_eq!(request.weight, Some(Some(71.5)));
        assert_eq!(request.systolic, None);
        assert_eq!(request.note, None);
    }

    #[test]
    fn test_entry_request_accepts_numeric_dates() {
        let request: EntryRequest = serde_json::from_value(json!({
            "date": 1714545000000i64,
            "sportType": "cycling",
            "sportMinutes": 45
        }))
        .unwrap();

        let draft = EntryDraft::from(request);
        assert_eq!(draft.date, Some(DateInput::Millis(1_714_545_000_000)));
        assert_eq!(draft.sport_type.as_deref(), Some("cycling"));
        assert_eq!(draft.sport_minutes, Some(45));
        assert_eq!(draft.blood_sugar, None);
    }

    #[test]
    fn test_list_params_defaults() {
        let params = ListEntriesParams { skip: None, take: None };
        assert_eq!(params.skip(), 0);
        assert_eq!(params.take(), DEFAULT_TAKE);
    }
}
