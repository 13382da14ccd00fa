use super::{WorkEntry, WorkEntryMedia};
use crate::DomainError;
use async_trait::async_trait;

/// Repository interface for work entries and their attached media
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkEntryRepository: Send + Sync {
    async fn insert(&self, entry: &WorkEntry) -> Result<(), DomainError>;

    /// Bulk insert of media rows. The parent entry must already exist.
    async fn insert_media(&self, media: &[WorkEntryMedia]) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<WorkEntry>, DomainError>;

    /// Entries newest `work_date` first, restricted to one city when given
    async fn list(&self, city_id: Option<String>) -> Result<Vec<WorkEntry>, DomainError>;

    /// Media of one entry ordered by `display_order`
    async fn media_for(&self, entry_id: &str) -> Result<Vec<WorkEntryMedia>, DomainError>;

    /// Delete an entry and its media. Returns false when nothing matched.
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
}
