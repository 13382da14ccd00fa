use super::{Role, UserProfile};
use crate::DomainError;
use async_trait::async_trait;

/// Repository interface for stored user profiles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, DomainError>;

    /// Case-insensitive email lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, DomainError>;

    /// All profiles, newest first
    async fn list(&self) -> Result<Vec<UserProfile>, DomainError>;

    /// Profiles with the given role, optionally restricted to one city, ordered by name
    async fn list_by_role(
        &self,
        role: Role,
        city_id: Option<String>,
    ) -> Result<Vec<UserProfile>, DomainError>;

    async fn insert(&self, profile: &UserProfile) -> Result<(), DomainError>;

    async fn set_temp_password(&self, id: &str, password: &str) -> Result<(), DomainError>;

    /// Returns false when no profile matched
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Every email starting with `prefix` and ending with `@{domain}`
    async fn emails_with_prefix(
        &self,
        prefix: &str,
        domain: &str,
    ) -> Result<Vec<String>, DomainError>;
}
