use thiserror::Error;

/// Unified error type for bumper operations
#[derive(Error, Debug)]
pub enum BumperError {
    #[error("Malformed scheme '{scheme}': {reason}")]
    MalformedScheme { scheme: String, reason: String },

    #[error("No match found in file. Unable to identify current version number.")]
    NoMatch,

    #[error("Unable to read version source '{path}'")]
    UnreadableSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to write version source '{path}'")]
    UnwritableSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown field '{field}' for scheme '{scheme}'")]
    UnknownField { field: String, scheme: String },

    #[error("Value '{value}' of field '{field}' does not fit in 64 bits")]
    FieldOverflow { field: String, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience type alias for Results in bumper
pub type Result<T> = std::result::Result<T, BumperError>;

impl BumperError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumperError::Config(msg.into())
    }

    /// Create a malformed scheme error for `scheme`
    pub fn malformed(scheme: impl Into<String>, reason: impl Into<String>) -> Self {
        BumperError::MalformedScheme {
            scheme: scheme.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>, scheme: impl Into<String>) -> Self {
        BumperError::UnknownField {
            field: field.into(),
            scheme: scheme.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BumperError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_no_match_message_is_fixed() {
        assert_eq!(
            BumperError::NoMatch.to_string(),
            "No match found in file. Unable to identify current version number."
        );
    }

    #[test]
    fn test_source_cause_is_reported_once() {
        let err = BumperError::UnwritableSource {
            path: "VERSION".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let chained = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(chained, "Unable to write version source 'VERSION': denied");
    }

    #[test]
    fn test_unreadable_source_keeps_cause() {
        use std::error::Error as _;

        let err = BumperError::UnreadableSource {
            path: "VERSION".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Unable to read version source 'VERSION'");
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("missing"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (BumperError::config("x"), "Configuration error"),
            (BumperError::malformed("a[", "x"), "Malformed scheme 'a['"),
            (BumperError::unknown_field("patch", "major.minor"), "Unknown field 'patch'"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
