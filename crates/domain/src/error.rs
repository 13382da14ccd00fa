use thiserror::Error;

/// Domain-level errors
///
/// Each variant carries the user-facing message. The HTTP layer maps
/// variants to status codes through [`DomainError::status_code`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DomainError {
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::Unauthorized(_) => 401,
            DomainError::Forbidden(_) => 403,
            DomainError::NotFound(_) => 404,
            DomainError::Validation(_) => 400,
            DomainError::Conflict(_) => 409,
            DomainError::Platform(_) => 502,
            DomainError::Storage(_) | DomainError::Configuration(_) => 500,
        }
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        DomainError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(DomainError::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(DomainError::Forbidden("x".into()).status_code(), 403);
        assert_eq!(DomainError::NotFound("x".into()).status_code(), 404);
        assert_eq!(DomainError::Validation("x".into()).status_code(), 400);
        assert_eq!(DomainError::Conflict("x".into()).status_code(), 409);
        assert_eq!(DomainError::Platform("x".into()).status_code(), 502);
        assert_eq!(DomainError::Storage("x".into()).status_code(), 500);
    }

    #[test]
    fn test_user_facing_message_is_unprefixed() {
        let err = DomainError::Forbidden("Cannot delete admin accounts".into());
        assert_eq!(err.to_string(), "Cannot delete admin accounts");
    }
}
