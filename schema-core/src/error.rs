use thiserror::Error;

/// Result alias used across the schema crates.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// A resolution scope string was neither `base` nor `custom`.
    #[error("resolution scope can be only 'base' or 'custom', got '{0}'")]
    InvalidScope(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The identity API answered with a non-success status.
    #[error("API error ({status}) {code}: {summary}")]
    Api {
        status: u16,
        code: String,
        summary: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid link: {0}")]
    InvalidLink(String),

    #[error("Invalid property configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for SchemaError {
    fn from(err: config::ConfigError) -> Self {
        SchemaError::ConfigError(anyhow::Error::new(err))
    }
}

impl SchemaError {
    /// True for failures of the API call itself (network, auth, 5xx, ...).
    pub fn is_transport(&self) -> bool {
        matches!(self, SchemaError::Transport(_) | SchemaError::Api { .. })
    }

    /// True when a user type lookup came back empty.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SchemaError::NotFound(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SchemaError::Api { status, .. } => Some(*status),
            SchemaError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_scope_names_the_value() {
        let err = SchemaError::InvalidScope("both".to_string());
        assert!(err.to_string().contains("'both'"));
        assert!(!err.is_transport());
    }

    #[test]
    fn api_error_is_transport_class() {
        let err = SchemaError::Api {
            status: 503,
            code: "E0000009".to_string(),
            summary: "Internal Server Error".to_string(),
        };
        assert!(err.is_transport());
        assert!(!err.is_not_found());
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("E0000009"));
    }

    #[test]
    fn not_found_is_distinct_from_transport() {
        let err = SchemaError::NotFound("user type 'ghost'".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_transport());
        assert_eq!(err.status(), None);
    }
}
