use chrono::Utc;
use domain::DomainError;
use domain::access::can_manage_users;
use domain::credentials::{self, DEFAULT_PASSWORD_LENGTH};
use domain::error::Result;
use domain::platform::AuthAdmin;
use domain::reference::ReferenceRepository;
use domain::user::{Identity, NewAuthUser, Role, UserProfile, UserRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Account policy knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSettings {
    /// Domain of generated login emails (`sup001@{email_domain}`).
    pub email_domain: String,
    pub password_length: usize,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            email_domain: "fieldops.local".to_string(),
            password_length: DEFAULT_PASSWORD_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub city_id: String,
    /// Explicit login email. A sequential login id is generated when absent.
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    pub user_id: String,
    pub email: String,
    pub password: String,
    pub login_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUser {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(String),
    AlreadyExists(String),
}

/// Privileged account operations: create, reset password, delete.
///
/// Every operation requires an admin caller. Admin accounts themselves are
/// never reset or deleted through here.
#[derive(Clone)]
pub struct AccountService {
    auth_admin: Arc<dyn AuthAdmin>,
    users: Arc<dyn UserRepository>,
    reference: Arc<dyn ReferenceRepository>,
    settings: AccountSettings,
}

impl AccountService {
    pub fn new(
        auth_admin: Arc<dyn AuthAdmin>,
        users: Arc<dyn UserRepository>,
        reference: Arc<dyn ReferenceRepository>,
        settings: AccountSettings,
    ) -> Self {
        Self {
            auth_admin,
            users,
            reference,
            settings,
        }
    }

    fn ensure_admin(caller: &Identity) -> Result<()> {
        if can_manage_users(caller.role) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "Forbidden: Admin access required".to_string(),
            ))
        }
    }

    fn new_password(&self) -> String {
        credentials::generate_password(&mut rand::thread_rng(), self.settings.password_length)
    }

    pub async fn list_users(&self, caller: &Identity) -> Result<Vec<UserProfile>> {
        Self::ensure_admin(caller)?;
        self.users.list().await
    }

    /// Supervisors of one city, for the entry form.
    pub async fn supervisors_in(&self, city_id: &str) -> Result<Vec<UserProfile>> {
        self.users
            .list_by_role(Role::Supervisor, Some(city_id.to_string()))
            .await
    }

    pub async fn create_user(
        &self,
        caller: &Identity,
        request: &CreateUserRequest,
    ) -> Result<CreatedUser> {
        Self::ensure_admin(caller)?;

        if request.full_name.trim().is_empty()
            || request.role.trim().is_empty()
            || request.city_id.trim().is_empty()
        {
            return Err(DomainError::Validation(
                "Missing required fields".to_string(),
            ));
        }

        let role: Role = request.role.trim().parse()?;
        if role.is_admin() {
            return Err(DomainError::Validation(
                "Invalid role. Admin accounts cannot be created here".to_string(),
            ));
        }

        if self.reference.find_city(&request.city_id).await?.is_none() {
            return Err(DomainError::NotFound(format!(
                "City not found: {}",
                request.city_id
            )));
        }

        let (login_id, email) = match request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
        {
            Some(explicit) => {
                if !explicit.contains('@') {
                    return Err(DomainError::Validation("Invalid email".to_string()));
                }
                let email = explicit.to_lowercase();
                let login_id = email.split('@').next().unwrap_or_default().to_uppercase();
                (login_id, email)
            }
            None => {
                let prefix = role.login_prefix();
                let domain = &self.settings.email_domain;
                let existing = self
                    .users
                    .emails_with_prefix(&prefix.to_lowercase(), domain)
                    .await?;
                let login_id = credentials::next_login_id(
                    prefix,
                    domain,
                    existing.iter().map(String::as_str),
                );
                let email = credentials::login_email(&login_id, &self.settings.email_domain);
                (login_id, email)
            }
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".to_string()));
        }

        let password = self.new_password();
        info!(%email, %role, by = %caller.id, "[CREATE-USER] Creating auth user");

        let account = self
            .auth_admin
            .create_user(&NewAuthUser {
                email: email.clone(),
                password: password.clone(),
                full_name: request.full_name.trim().to_string(),
                role,
                city_id: Some(request.city_id.clone()),
            })
            .await?;

        let profile = UserProfile {
            id: account.id.clone(),
            email: email.clone(),
            full_name: request.full_name.trim().to_string(),
            role,
            city_id: Some(request.city_id.clone()),
            temp_password: Some(password.clone()),
            created_at: Utc::now(),
        };

        if let Err(e) = self.users.insert(&profile).await {
            error!("[CREATE-USER] Failed to store profile: {}", e);
            if let Err(cleanup) = self.auth_admin.delete_user(&account.id).await {
                error!(
                    "[CREATE-USER] Failed to remove auth user {} after profile error: {}",
                    account.id, cleanup
                );
            }
            return Err(e);
        }

        info!(user_id = %account.id, %login_id, "[CREATE-USER] ✅ User created");
        Ok(CreatedUser {
            user_id: account.id,
            email,
            password,
            login_id,
        })
    }

    /// Load a non-admin target profile for reset/delete.
    async fn target(&self, user_id: &str, admin_message: &str) -> Result<UserProfile> {
        if user_id.trim().is_empty() {
            return Err(DomainError::Validation(
                "Missing required field: userId".to_string(),
            ));
        }
        let target = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;
        if target.role.is_admin() {
            return Err(DomainError::Forbidden(admin_message.to_string()));
        }
        Ok(target)
    }

    /// Returns the new password.
    pub async fn reset_password(&self, caller: &Identity, user_id: &str) -> Result<String> {
        Self::ensure_admin(caller)?;
        let target = self.target(user_id, "Cannot reset admin password").await?;

        let password = self.new_password();
        info!(user_id = %target.id, by = %caller.id, "[RESET-PASSWORD] Resetting password");

        self.auth_admin
            .update_password(&target.id, &password)
            .await?;
        self.users.set_temp_password(&target.id, &password).await?;

        info!(user_id = %target.id, "[RESET-PASSWORD] ✅ Password reset");
        Ok(password)
    }

    pub async fn delete_user(&self, caller: &Identity, user_id: &str) -> Result<DeletedUser> {
        Self::ensure_admin(caller)?;
        let target = self.target(user_id, "Cannot delete admin accounts").await?;

        self.users.delete(&target.id).await?;

        let warning = match self.auth_admin.delete_user(&target.id).await {
            Ok(()) => None,
            Err(e) => {
                warn!(
                    "[DELETE-USER] Profile {} removed but auth deletion failed: {}",
                    target.id, e
                );
                Some(
                    "User profile deleted but auth user deletion failed. The user cannot log in anymore."
                        .to_string(),
                )
            }
        };

        info!(
            user_id = %target.id,
            email = %target.email,
            by = %caller.id,
            "[DELETE-USER] User deleted"
        );
        Ok(DeletedUser {
            email: target.email,
            warning,
        })
    }

    /// Create the first admin account if none with this email exists.
    pub async fn seed_admin(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SeedOutcome> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        if let Some(existing) = self.users.find_by_email(&email).await? {
            info!(%email, "Admin user already exists");
            return Ok(SeedOutcome::AlreadyExists(existing.id));
        }

        let account = self
            .auth_admin
            .create_user(&NewAuthUser {
                email: email.clone(),
                password: password.to_string(),
                full_name: full_name.to_string(),
                role: Role::Admin,
                city_id: None,
            })
            .await?;

        let profile = UserProfile {
            id: account.id.clone(),
            email,
            full_name: full_name.to_string(),
            role: Role::Admin,
            city_id: None,
            temp_password: None,
            created_at: Utc::now(),
        };
        if let Err(e) = self.users.insert(&profile).await {
            error!("Failed to store admin profile: {}", e);
            if let Err(cleanup) = self.auth_admin.delete_user(&account.id).await {
                error!(
                    "Failed to remove auth user {} after profile error: {}",
                    account.id, cleanup
                );
            }
            return Err(e);
        }

        info!(user_id = %account.id, "✅ Admin user created");
        Ok(SeedOutcome::Created(account.id))
    }
}
