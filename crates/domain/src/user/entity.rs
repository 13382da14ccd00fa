use super::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored profile row for an account.
///
/// `temp_password` holds the last generated password so administrators can
/// hand it out; it is `None` for accounts that set their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub city_id: Option<String>,
    pub temp_password: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
            city_id: self.city_id.clone(),
        }
    }
}

/// The caller of a request, resolved from its bearer token and stored profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub city_id: Option<String>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Account as known to the identity platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Request to create an account on the identity platform.
///
/// `full_name`, `role` and `city_id` travel as account metadata so the
/// platform can hand them back inside session tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub city_id: Option<String>,
}
