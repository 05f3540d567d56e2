use serde::{Deserialize, Serialize};

pub use health_log_data::models::entry::{Entry, EntryChanges, EntryData};

/// A date as it arrives from a client, before coercion.
///
/// Either text (RFC 3339, a naive date-time, or a plain `YYYY-MM-DD`) or a
/// number of milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Millis(i64),
    Text(String),
}

impl DateInput {
    /// An empty string or `0` counts as "no date" on create and replace
    pub fn is_absent(&self) -> bool {
        match self {
            DateInput::Millis(millis) => *millis == 0,
            DateInput::Text(text) => text.is_empty(),
        }
    }
}

/// Permissive input for creating or fully replacing an entry.
///
/// Every field is optional; whatever is missing is stored as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
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

/// Input for the update that carries its target id in the body.
///
/// `date` must be present. A missing `note` is written as an empty string.
/// The measurement fields are tri-state: `None` leaves the stored value alone,
/// `Some(None)` clears it, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryRevision {
    pub id: i64,
    pub date: Option<DateInput>,
    pub note: Option<String>,
    pub blood_sugar: Option<Option<f64>>,
    pub systolic: Option<Option<i32>>,
    pub diastolic: Option<Option<i32>>,
    pub pulse: Option<Option<i32>>,
    pub weight: Option<Option<f64>>,
    pub sport_minutes: Option<Option<i32>>,
    pub insulin_bolus: Option<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_input_accepts_text_and_numbers() {
        let text: DateInput = serde_json::from_str("\"2024-05-01\"").unwrap();
        assert_eq!(text, DateInput::Text("2024-05-01".to_string()));

        let millis: DateInput = serde_json::from_str("1714521600000").unwrap();
        assert_eq!(millis, DateInput::Millis(1_714_521_600_000));

        assert!(DateInput::Text(String::new()).is_absent());
        assert!(DateInput::Millis(0).is_absent());
        assert!(!DateInput::Text("  ".to_string()).is_absent());
        assert!(!DateInput::Millis(1).is_absent());
    }
}
