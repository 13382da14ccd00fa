//! HTTP client for the hosted identity platform.
//!
//! Token lookups go to `GET /auth/v1/user` with the caller's bearer token.
//! Admin operations go to `/auth/v1/admin/users` authorized with the
//! service role key.

use crate::config::PlatformConfig;
use async_trait::async_trait;
use domain::DomainError;
use domain::platform::{AuthAdmin, IdentityProvider};
use domain::user::{AuthUser, NewAuthUser};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, warn};

#[derive(Debug, Deserialize)]
struct PlatformUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<PlatformUser> for AuthUser {
    fn from(user: PlatformUser) -> Self {
        AuthUser {
            id: user.id,
            email: user.email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct UserMetadata<'a> {
    full_name: &'a str,
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    city_id: Option<&'a str>,
}

#[derive(Clone)]
pub struct PlatformAuthClient {
    client: reqwest::Client,
    base_url: String,
    service_role_key: String,
    anon_key: String,
}

impl PlatformAuthClient {
    pub fn new(config: &PlatformConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| DomainError::Configuration(format!("HTTP client: {}", e)))?;

        let anon_key = if config.anon_key.is_empty() {
            config.service_role_key.clone()
        } else {
            config.anon_key.clone()
        };

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_role_key: config.service_role_key.clone(),
            anon_key,
        })
    }

    fn admin(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    fn admin_user_url(&self, user_id: &str) -> String {
        format!("{}/auth/v1/admin/users/{}", self.base_url, user_id)
    }

    async fn send(builder: RequestBuilder, action: &str) -> Result<Response, DomainError> {
        builder.send().await.map_err(|e| {
            error!("[PLATFORM] {} request failed: {}", action, e);
            DomainError::Platform(format!("{} request failed: {}", action, e))
        })
    }

    async fn failure(response: Response, action: &str) -> DomainError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!("[PLATFORM] {} failed with {}: {}", action, status, body);

        if status == StatusCode::NOT_FOUND {
            return DomainError::NotFound("User not found".to_string());
        }
        if is_duplicate(status, &body) {
            return DomainError::Conflict("Email already exists".to_string());
        }
        DomainError::Platform(format!("{} failed ({}): {}", action, status, body))
    }
}

/// The platform reports an existing email as 422 (or 400) with a message
/// along the lines of "User already registered".
fn is_duplicate(status: StatusCode, body: &str) -> bool {
    let body = body.to_lowercase();
    matches!(
        status,
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST | StatusCode::CONFLICT
    ) && (body.contains("already registered")
        || body.contains("already been registered")
        || body.contains("already exists")
        || body.contains("email_exists"))
}

#[async_trait]
impl IdentityProvider for PlatformAuthClient {
    async fn resolve(&self, token: &str) -> Result<AuthUser, DomainError> {
        let request = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token);
        let response = Self::send(request, "Token lookup").await?;

        match response.status() {
            s if s.is_success() => {
                let user: PlatformUser = response.json().await.map_err(|e| {
                    DomainError::Platform(format!("Invalid user payload: {}", e))
                })?;
                debug!(user_id = %user.id, "[PLATFORM] Token resolved");
                Ok(user.into())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DomainError::Unauthorized(
                "Unauthorized: Invalid token".to_string(),
            )),
            _ => Err(Self::failure(response, "Token lookup").await),
        }
    }
}

#[async_trait]
impl AuthAdmin for PlatformAuthClient {
    async fn create_user(&self, user: &NewAuthUser) -> Result<AuthUser, DomainError> {
        let body = json!({
            "email": user.email,
            "password": user.password,
            "email_confirm": true,
            "user_metadata": UserMetadata {
                full_name: &user.full_name,
                role: user.role.as_str(),
                city_id: user.city_id.as_deref(),
            },
        });
        let request = self
            .admin(self.client.post(format!("{}/auth/v1/admin/users", self.base_url)))
            .json(&body);
        let response = Self::send(request, "Create user").await?;

        if !response.status().is_success() {
            return Err(Self::failure(response, "Create user").await);
        }
        let created: PlatformUser = response
            .json()
            .await
            .map_err(|e| DomainError::Platform(format!("Invalid user payload: {}", e)))?;
        Ok(created.into())
    }

    async fn update_password(&self, user_id: &str, password: &str) -> Result<(), DomainError> {
        let request = self
            .admin(self.client.put(self.admin_user_url(user_id)))
            .json(&json!({ "password": password }));
        let response = Self::send(request, "Update password").await?;

        if !response.status().is_success() {
            return Err(Self::failure(response, "Update password").await);
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), DomainError> {
        let request = self.admin(self.client.delete(self.admin_user_url(user_id)));
        let response = Self::send(request, "Delete user").await?;

        if !response.status().is_success() {
            return Err(Self::failure(response, "Delete user").await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_detection() {
        assert!(is_duplicate(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"msg":"A user with this email address has already been registered"}"#
        ));
        assert!(is_duplicate(
            StatusCode::BAD_REQUEST,
            r#"{"msg":"User already registered"}"#
        ));
        assert!(is_duplicate(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"error_code":"email_exists"}"#
        ));
        assert!(!is_duplicate(
            StatusCode::INTERNAL_SERVER_ERROR,
            "already registered"
        ));
        assert!(!is_duplicate(StatusCode::BAD_REQUEST, "weak password"));
    }
}
