use domain::DomainError;
use domain::error::Result;
use domain::platform::IdentityProvider;
use domain::user::{AuthUser, Identity, UserRepository};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns an `Authorization` header into the caller's identity.
///
/// Token validation is the platform's job; this only forwards the token and
/// then loads the stored profile, which is the source of truth for role and
/// city.
#[derive(Clone)]
pub struct Authenticator {
    identity: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserRepository>,
}

impl Authenticator {
    pub fn new(identity: Arc<dyn IdentityProvider>, users: Arc<dyn UserRepository>) -> Self {
        Self { identity, users }
    }

    /// Extract the token from `Bearer <token>`.
    pub fn bearer_token(header: Option<&str>) -> Result<&str> {
        let header = header
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                DomainError::Unauthorized("Unauthorized: No authorization header".to_string())
            })?;

        let token = match header.split_once(' ') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            None if header.eq_ignore_ascii_case("bearer") => "",
            _ => header,
        };

        if token.is_empty() {
            return Err(DomainError::Unauthorized(
                "Unauthorized: Invalid token".to_string(),
            ));
        }
        Ok(token)
    }

    /// Resolve the platform account behind the header without loading a profile.
    pub async fn resolve_account(&self, header: Option<&str>) -> Result<AuthUser> {
        let token = Self::bearer_token(header)?;
        self.identity.resolve(token).await.map_err(|e| match e {
            DomainError::Unauthorized(_) => e,
            other => {
                warn!("Token resolution failed: {}", other);
                DomainError::Unauthorized("Unauthorized: Invalid token".to_string())
            }
        })
    }

    pub async fn authenticate(&self, header: Option<&str>) -> Result<Identity> {
        let account = self.resolve_account(header).await?;
        let profile = self
            .users
            .find_by_id(&account.id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User profile not found".to_string()))?;

        debug!(user_id = %profile.id, role = %profile.role, "Authenticated caller");
        Ok(profile.identity())
    }

    pub async fn authorize_admin(&self, header: Option<&str>) -> Result<Identity> {
        let identity = self.authenticate(header).await?;
        if !identity.is_admin() {
            warn!(user_id = %identity.id, role = %identity.role, "Rejected non-admin caller");
            return Err(DomainError::Forbidden(
                "Forbidden: Admin access required".to_string(),
            ));
        }
        Ok(identity)
    }
}
