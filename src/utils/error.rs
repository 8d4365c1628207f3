use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeywordError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("City dataset error: {message}")]
    DatasetError { message: String },

    #[error("{service} returned status {status}")]
    ServiceStatusError { service: String, status: u16 },

    #[error("{service} response could not be parsed: {message}")]
    ResponseFormatError { service: String, message: String },

    #[error("{service} reported an error: {message}")]
    ServiceError { service: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl KeywordError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            KeywordError::ApiError(_)
            | KeywordError::ServiceStatusError { .. }
            | KeywordError::ServiceError { .. } => ErrorCategory::Network,
            KeywordError::CsvError(_)
            | KeywordError::SerializationError(_)
            | KeywordError::DatasetError { .. }
            | KeywordError::ResponseFormatError { .. } => ErrorCategory::Data,
            KeywordError::IoError(_) => ErrorCategory::Io,
            KeywordError::ConfigError { .. }
            | KeywordError::MissingConfigError { .. }
            | KeywordError::InvalidConfigValueError { .. }
            | KeywordError::ConfigValidationError { .. }
            | KeywordError::ValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一批次的錯誤只會讓該批次歸零，不會中止整個執行
            KeywordError::ServiceStatusError { .. }
            | KeywordError::ResponseFormatError { .. }
            | KeywordError::ServiceError { .. } => ErrorSeverity::Medium,
            KeywordError::ApiError(_) => ErrorSeverity::Medium,
            KeywordError::CsvError(_)
            | KeywordError::SerializationError(_)
            | KeywordError::DatasetError { .. } => ErrorSeverity::High,
            KeywordError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command-line flags or the TOML file (seed, country, market, API key)"
                    .to_string()
            }
            ErrorCategory::Network => {
                "Check the network connection and that the volume service endpoint is reachable"
                    .to_string()
            }
            ErrorCategory::Data => {
                "Check that the city dataset is a tab-separated geonames file".to_string()
            }
            ErrorCategory::Io => "Check that the output directory is writable".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            KeywordError::MissingConfigError { field } => {
                format!("Please provide a value for '{}'", field)
            }
            KeywordError::InvalidConfigValueError { field, reason, .. } => {
                format!("'{}' is not valid: {}", field, reason)
            }
            KeywordError::ValidationError { message } => message.clone(),
            KeywordError::DatasetError { message } => {
                format!("Could not read the city dataset: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KeywordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_errors_are_not_fatal() {
        let err = KeywordError::ResponseFormatError {
            service: "surfer".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_missing_config_message() {
        let err = KeywordError::MissingConfigError {
            field: "api_key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.user_friendly_message(), "Please provide a value for 'api_key'");
    }
}
