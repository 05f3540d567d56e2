use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::entities::conversions::{convert_to_data_changes, convert_to_data_entry};
use crate::entities::entry::{Entry, EntryDraft, EntryRevision};
use health_log_data::repository::{EntryRepository, EntryRepositoryTrait, RepositoryError};

/// Entry service errors
#[derive(Debug, Error)]
pub enum EntryServiceError {
    /// Malformed or missing input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No entry with the given id
    #[error("Entry not found: {0}")]
    NotFound(i64),

    /// Storage failure
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<RepositoryError> for EntryServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => EntryServiceError::NotFound(id),
            other => EntryServiceError::RepositoryError(other.to_string()),
        }
    }
}

/// Trait for entry service operations
#[async_trait]
pub trait EntryServiceTrait {
    /// List entries newest first
    async fn list_entries(&self, skip: u32, take: Option<u32>) -> Result<Vec<Entry>, EntryServiceError>;

    /// Get one entry, `None` when absent
    async fn get_entry(&self, id: i64) -> Result<Option<Entry>, EntryServiceError>;

    /// Create an entry from a draft; absent fields become null
    async fn create_entry(&self, draft: EntryDraft) -> Result<Entry, EntryServiceError>;

    /// Replace every field of an entry from a draft; absent fields become null
    async fn replace_entry(&self, id: i64, draft: EntryDraft) -> Result<Entry, EntryServiceError>;

    /// Apply a revision addressed by the id it carries
    async fn update_entry(&self, revision: EntryRevision) -> Result<Entry, EntryServiceError>;

    /// Delete an entry
    async fn delete_entry(&self, id: i64) -> Result<(), EntryServiceError>;
}

/// Entry service over a repository
pub struct EntryService<R: EntryRepositoryTrait> {
    repository: R,
}

impl<R: EntryRepositoryTrait> EntryService<R> {
    /// Create a new entry service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

fn invalid(message: String) -> EntryServiceError {
    warn!("Rejected entry input: {}", message);
    EntryServiceError::ValidationError(message)
}

#[async_trait]
impl<R: EntryRepositoryTrait> EntryServiceTrait for EntryService<R> {
    async fn list_entries(&self, skip: u32, take: Option<u32>) -> Result<Vec<Entry>, EntryServiceError> {
        Ok(self.repository.list(skip, take).await?)
    }

    async fn get_entry(&self, id: i64) -> Result<Option<Entry>, EntryServiceError> {
        Ok(self.repository.get_by_id(id).await?)
    }

    async fn create_entry(&self, draft: EntryDraft) -> Result<Entry, EntryServiceError> {
        let data = convert_to_data_entry(draft).map_err(invalid)?;
        let entry = self.repository.create(data).await?;
        debug!("Created entry {}", entry.id);
        Ok(entry)
    }

    async fn replace_entry(&self, id: i64, draft: EntryDraft) -> Result<Entry, EntryServiceError> {
        let data = convert_to_data_entry(draft).map_err(invalid)?;
        Ok(self.repository.replace(id, data).await?)
    }

    async fn update_entry(&self, revision: EntryRevision) -> Result<Entry, EntryServiceError> {
        let id = revision.id;
        let changes = convert_to_data_changes(revision).map_err(invalid)?;
        Ok(self.repository.apply_changes(id, changes).await?)
    }

    async fn delete_entry(&self, id: i64) -> Result<(), EntryServiceError> {
        self.repository.delete(id).await?;
        debug!("Deleted entry {}", id);
        Ok(())
    }
}

/// Create an entry service on the process-wide database pool
pub fn create_default_entry_service() -> Result<EntryService<EntryRepository>, EntryServiceError> {
    let repository = EntryRepository::from_global()?;
    Ok(EntryService::new(repository))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::entry::{DateInput, EntryChanges, EntryData};
    use chrono::{TimeZone, Utc};
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Repository {}

        #[async_trait]
        impl EntryRepositoryTrait for Repository {
            async fn create(&self, data: EntryData) -> Result<Entry, RepositoryError>;
            async fn get_by_id(&self, id: i64) -> Result<Option<Entry>, RepositoryError>;
            async fn list(&self, skip: u32, take: Option<u32>) -> Result<Vec<Entry>, RepositoryError>;
            async fn replace(&self, id: i64, data: EntryData) -> Result<Entry, RepositoryError>;
            async fn apply_changes(&self, id: i64, changes: EntryChanges) -> Result<Entry, RepositoryError>;
            async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
        }
    }

    fn stored(id: i64, data: EntryData) -> Entry {
        Entry {
            id,
            date: data.date,
            note: data.note,
            blood_sugar: data.blood_sugar,
            systolic: data.systolic,
            diastolic: data.diastolic,
            weight: data.weight,
            pulse: data.pulse,
            carbs: data.carbs,
            insulin_bolus: data.insulin_bolus,
            insulin_basal: data.insulin_basal,
            sport_type: data.sport_type,
            sport_minutes: data.sport_minutes,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_absent_fields_to_null() {
        let mut repo = MockRepository::new();
        repo.expect_create()
            .withf(|data| *data == EntryData { blood_sugar: Some(120.0), ..EntryData::default() })
            .times(1)
            .returning(|data| Ok(stored(7, data)));

        let service = EntryService::new(repo);
        let entry = service
            .create_entry(EntryDraft { blood_sugar: Some(120.0), ..EntryDraft::default() })
            .await
            .unwrap();

        assert_eq!(entry.id, 7);
        assert_eq!(entry.blood_sugar, Some(120.0));
        assert_eq!(entry.date, None);
    }

    #[tokio::test]
    async fn test_invalid_date_never_reaches_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_create().times(0);
        repo.expect_replace().times(0);

        let service = EntryService::new(repo);
        let draft = EntryDraft {
            date: Some(DateInput::Text("someday".to_string())),
            ..EntryDraft::default()
        };

        assert!(matches!(
            service.create_entry(draft.clone()).await,
            Err(EntryServiceError::ValidationError(_))
        ));
        assert!(matches!(
            service.replace_entry(3, draft).await,
            Err(EntryServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_update_without_date_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_apply_changes().times(0);

        let service = EntryService::new(repo);
        let result = service
            .update_entry(EntryRevision { id: 3, ..EntryRevision::default() })
            .await;

        assert!(matches!(result, Err(EntryServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_passes_changes_through() {
        let date = Utc.with_ymd_and_hms(2024, 2, 1, 7, 0, 0).unwrap();
        let mut repo = MockRepository::new();
        repo.expect_apply_changes()
            .withf(move |id, changes| {
                *id == 3
                    && changes.date == date
                    && changes.note.is_empty()
                    && changes.systolic == Some(Some(118))
                    && changes.weight.is_none()
            })
            .times(1)
            .returning(|id, changes| {
                Ok(stored(id, EntryData {
                    date: Some(changes.date),
                    note: Some(changes.note),
                    systolic: changes.systolic.flatten(),
                    ..EntryData::default()
                }))
            });

        let service = EntryService::new(repo);
        let entry = service
            .update_entry(EntryRevision {
                id: 3,
                date: Some(DateInput::Millis(date.timestamp_millis())),
                systolic: Some(Some(118)),
                ..EntryRevision::default()
            })
            .await
            .unwrap();

        assert_eq!(entry.note.as_deref(), Some(""));
        assert_eq!(entry.systolic, Some(118));
    }

    #[tokio::test]
    async fn test_missing_entry_maps_to_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_delete()
            .with(eq(99))
            .returning(|id| Err(RepositoryError::NotFound(id)));
        repo.expect_replace()
            .returning(|id, _| Err(RepositoryError::NotFound(id)));

        let service = EntryService::new(repo);

        assert!(matches!(service.delete_entry(99).await, Err(EntryServiceError::NotFound(99))));
        assert!(matches!(
            service.replace_entry(99, EntryDraft::default()).await,
            Err(EntryServiceError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_list_forwards_pagination() {
        let mut repo = MockRepository::new();
        repo.expect_list()
            .with(eq(5), eq(Some(2)))
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let service = EntryService::new(repo);
        assert!(service.list_entries(5, Some(2)).await.unwrap().is_empty());
    }
}
