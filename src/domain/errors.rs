use super::models::ApplicationStatus;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Fill in all required fields: {}", .fields.join(", "))]
    MissingRequiredFields { fields: Vec<&'static str> },

    #[error("Accept the terms of service to register")]
    TermsNotAccepted,

    #[error("Sign in to continue")]
    NotSignedIn,

    #[error("Already signed in as {0}")]
    AlreadySignedIn(String),

    #[error("{action} is not available from the {view} screen")]
    ActionUnavailable {
        action: &'static str,
        view: &'static str,
    },

    #[error("Application {0} not found")]
    ApplicationNotFound(u64),

    #[error("Application status cannot change from {from} to {to}")]
    InvalidStatusTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Collects the labels of required values that are blank after trimming.
pub(crate) fn require(fields: &[(&'static str, bool)]) -> DomainResult<()> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(label, _)| *label)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::MissingRequiredFields { fields: missing })
    }
}

pub(crate) fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_lists_missing_in_order() {
        let err = require(&[("phone", false), ("password", true), ("name", false)]).unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRequiredFields { fields: vec!["phone", "name"] }
        );
        assert_eq!(err.to_string(), "Fill in all required fields: phone, name");
    }

    #[test]
    fn test_present_ignores_whitespace() {
        assert!(present("x"));
        assert!(!present(""));
        assert!(!present("   "));
    }
}
