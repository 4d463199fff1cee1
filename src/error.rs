use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or loading a permission catalog.
///
/// The decision path never returns these: unknown roles, modules and actions
/// are resolved to a denial instead.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum PolicyError {
    #[error("failed to parse catalog: {0}")]
    ParseError(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("module '{module}' declares action '{action}' with no roles")]
    EmptyRoleSet { module: String, action: String },

    #[error("route '{route}' references undeclared module '{module}'")]
    UnknownModule { route: String, module: String },

    #[error("route '{0}' is bound more than once")]
    DuplicateRoute(String),

    #[error("invalid route pattern: {0}")]
    InvalidPattern(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("failed to read catalog: {0}")]
    Io(String),
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::ParseError(err.to_string())
    }
}

impl From<regex::Error> for PolicyError {
    fn from(err: regex::Error) -> Self {
        PolicyError::InvalidPattern(err.to_string())
    }
}

impl From<std::io::Error> for PolicyError {
    fn from(err: std::io::Error) -> Self {
        PolicyError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PolicyError::EmptyRoleSet {
            module: "grades".to_string(),
            action: "delete".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "module 'grades' declares action 'delete' with no roles"
        );

        let err = PolicyError::UnknownModule {
            route: "/bodega".to_string(),
            module: "inventory".to_string(),
        };
        assert!(err.to_string().contains("inventory"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: PolicyError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, PolicyError::ParseError(_)));
    }

    #[test]
    fn test_from_regex_error() {
        let err: PolicyError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, PolicyError::InvalidPattern(_)));
    }

    #[test]
    fn test_error_serializes() {
        let err = PolicyError::DuplicateRoute("/usuarios".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["DuplicateRoute"], "/usuarios");
    }
}
