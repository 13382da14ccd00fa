use super::{City, Location, ReferenceKind, Ward, Zone};
use crate::DomainError;
use async_trait::async_trait;

/// Repository interface for the City → Zone → Ward → Location reference data
///
/// Listing methods return records ordered by name.
/// Deleting a record removes its descendants as well.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn list_cities(&self) -> Result<Vec<City>, DomainError>;
    async fn list_zones(&self) -> Result<Vec<Zone>, DomainError>;
    async fn list_wards(&self) -> Result<Vec<Ward>, DomainError>;
    async fn list_locations(&self) -> Result<Vec<Location>, DomainError>;

    async fn find_city(&self, id: &str) -> Result<Option<City>, DomainError>;
    async fn find_zone(&self, id: &str) -> Result<Option<Zone>, DomainError>;
    async fn find_ward(&self, id: &str) -> Result<Option<Ward>, DomainError>;
    async fn find_location(&self, id: &str) -> Result<Option<Location>, DomainError>;

    async fn insert_city(&self, city: &City) -> Result<(), DomainError>;
    async fn insert_zone(&self, zone: &Zone) -> Result<(), DomainError>;
    async fn insert_ward(&self, ward: &Ward) -> Result<(), DomainError>;
    async fn insert_location(&self, location: &Location) -> Result<(), DomainError>;

    /// Delete a record and everything beneath it. Returns false when nothing matched.
    async fn delete(&self, kind: ReferenceKind, id: &str) -> Result<bool, DomainError>;
}
