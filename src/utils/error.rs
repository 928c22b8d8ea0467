use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Cache unavailable: {message}")]
    CacheError { message: String },

    #[error("Task store unavailable: {message}")]
    TaskStoreError { message: String },

    #[error("Task not found: {id}")]
    TaskNotFound { id: Uuid },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Cache,
    TaskStore,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Degraded but answerable (cache misbehaving).
    Low,
    /// Client mistake, no server-side action needed.
    Medium,
    /// A request could not be answered.
    High,
    /// Process cannot start or continue.
    Critical,
}

impl DispatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::InvalidConfigValueError { .. }
            | Self::ConfigError { .. }
            | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::CacheError { .. } => ErrorCategory::Cache,
            Self::TaskStoreError { .. } | Self::TaskNotFound { .. } => ErrorCategory::TaskStore,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CacheError { .. } => ErrorSeverity::Low,
            Self::ValidationError { .. } | Self::TaskNotFound { .. } => ErrorSeverity::Medium,
            Self::TaskStoreError { .. } | Self::SerializationError(_) => ErrorSeverity::High,
            Self::InvalidConfigValueError { .. }
            | Self::ConfigError { .. }
            | Self::TomlError(_)
            | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Request a total between 1 and the configured maximum",
            ErrorCategory::Configuration => {
                "Check the CLI flags and the TOML config file for conflicting values"
            }
            ErrorCategory::Cache => {
                "No action required; results are recomputed while the cache is down"
            }
            ErrorCategory::TaskStore => {
                "Verify the task store is reachable; deferred requests cannot proceed without it"
            }
            ErrorCategory::System => "Inspect the logs for the underlying IO or encoding failure",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => format!("Invalid request: {message}"),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration problem with '{field}': {reason}")
            }
            Self::ConfigError { message } => format!("Configuration problem: {message}"),
            Self::CacheError { .. } => "Cache is temporarily unavailable".to_string(),
            Self::TaskStoreError { .. } => {
                "Deferred processing is temporarily unavailable".to_string()
            }
            Self::TaskNotFound { id } => format!("No task with id {id}"),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_errors_are_low_severity() {
        let err = DispatchError::CacheError {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Cache);
    }

    #[test]
    fn test_task_store_errors_are_high_severity() {
        let err = DispatchError::TaskStoreError {
            message: "insert failed".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.category(), ErrorCategory::TaskStore);
    }

    #[test]
    fn test_user_friendly_message_hides_internals() {
        let err = DispatchError::CacheError {
            message: "socket reset by peer at 10.0.0.3".to_string(),
        };
        assert!(!err.user_friendly_message().contains("10.0.0.3"));
    }
}
