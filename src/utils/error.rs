use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Serialization,
    Configuration,
    Processing,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::HttpError(_) => ErrorCategory::Network,
            CheckError::IoError(_) => ErrorCategory::Io,
            CheckError::CsvError(_) | CheckError::SerializationError(_) => {
                ErrorCategory::Serialization
            }
            CheckError::TomlError(_)
            | CheckError::ConfigError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CheckError::ProcessingError { .. } => ErrorCategory::Processing,
            CheckError::UrlError(_) | CheckError::ValidationError { .. } => {
                ErrorCategory::Validation
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // Network failures are usually transient; the fetch layer already retried
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Serialization | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Validation => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check the URL and your network connection, then retry. Persistent failures may mean the target blocks automated clients."
            }
            ErrorCategory::Io => "Check that the output directory exists and is writable.",
            ErrorCategory::Serialization => {
                "The data could not be encoded in the requested format. Inspect the input records for unexpected shapes."
            }
            ErrorCategory::Configuration => {
                "Review the command-line flags or profile file and fix the reported field."
            }
            ErrorCategory::Processing => {
                "The target content could not be processed. Re-run with --verbose for details."
            }
            ErrorCategory::Validation => "Fix the reported input value and try again.",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CheckError::HttpError(e) => format!("Request failed: {}", e),
            CheckError::IoError(e) => format!("File system error: {}", e),
            CheckError::CsvError(e) => format!("CSV export failed: {}", e),
            CheckError::SerializationError(e) => format!("Could not encode data: {}", e),
            CheckError::UrlError(e) => format!("That does not look like a valid URL: {}", e),
            CheckError::TomlError(e) => format!("Profile file is not valid TOML: {}", e),
            CheckError::ConfigError { message } => format!("Configuration problem: {}", message),
            CheckError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            CheckError::InvalidConfigValueError { field, reason, .. } => {
                format!("Bad value for {}: {}", field, reason)
            }
            CheckError::ProcessingError { message } => message.clone(),
            CheckError::ValidationError { message } => message.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
