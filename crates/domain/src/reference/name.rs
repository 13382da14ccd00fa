use crate::error::{DomainError, Result};

const MAX_NAME_LEN: usize = 100;

/// Value object for the display name of a city, zone, ward or location.
///
/// Rules:
/// - Surrounding whitespace is trimmed
/// - Must be non-empty after trimming
/// - Max length 100 characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceName(String);

impl ReferenceName {
    pub fn new(raw: &str) -> Result<Self> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(DomainError::Validation("Name cannot be empty".to_string()));
        }

        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "Name too long: {} chars (max {MAX_NAME_LEN})",
                name.chars().count()
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ReferenceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
