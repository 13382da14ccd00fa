use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role claim carried by every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employee,
    Customer,
    Engineer,
    ExecutiveEngineer,
    Supervisor,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Employee,
        Role::Customer,
        Role::Engineer,
        Role::ExecutiveEngineer,
        Role::Supervisor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Customer => "customer",
            Role::Engineer => "engineer",
            Role::ExecutiveEngineer => "executive_engineer",
            Role::Supervisor => "supervisor",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Prefix of generated login ids (`SUP001`, `CUST014`, ...).
    pub fn login_prefix(&self) -> &'static str {
        match self {
            Role::Admin => "ADM",
            Role::Employee => "EMP",
            Role::Customer => "CUST",
            Role::Engineer => "ENG",
            Role::ExecutiveEngineer => "EXE",
            Role::Supervisor => "SUP",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("Invalid role: {s}")))
    }
}
