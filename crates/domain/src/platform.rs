//! Ports onto the hosted platform: identity, account administration and
//! object storage. Implementations live in the infrastructure layer.

use crate::DomainError;
use crate::user::{AuthUser, NewAuthUser};
use async_trait::async_trait;

/// Resolves a bearer token to the account it was issued for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Unauthorized` when the platform rejects the token.
    async fn resolve(&self, token: &str) -> Result<AuthUser, DomainError>;
}

/// Privileged account management on the identity platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthAdmin: Send + Sync {
    /// `Conflict` when the email is already registered.
    async fn create_user(&self, user: &NewAuthUser) -> Result<AuthUser, DomainError>;

    async fn update_password(&self, user_id: &str, password: &str) -> Result<(), DomainError>;

    async fn delete_user(&self, user_id: &str) -> Result<(), DomainError>;
}

/// Issues time-limited PUT URLs for object storage.
pub trait UploadSigner: Send + Sync {
    fn presign_put(&self, key: &str, expires_secs: u64) -> Result<String, DomainError>;

    /// Where the object will be publicly readable once uploaded.
    fn public_url(&self, key: &str) -> String;
}
