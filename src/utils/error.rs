use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZenodoError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Zenodo {operation} request failed with status {status}: {body}")]
    HttpStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from Zenodo {operation} request: {message}")]
    UnexpectedResponse {
        operation: &'static str,
        message: String,
    },

    #[error("Invalid creator '{value}': {reason}")]
    InvalidCreator { value: String, reason: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Filesystem,
    Network,
}

impl ZenodoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ZenodoError::InvalidCreator { .. } | ZenodoError::MissingField(_) => {
                ErrorCategory::Validation
            }
            ZenodoError::MissingConfigError { .. }
            | ZenodoError::InvalidConfigValueError { .. }
            | ZenodoError::ConfigValidationError { .. }
            | ZenodoError::UrlError(_) => ErrorCategory::Configuration,
            ZenodoError::IoError(_) | ZenodoError::ZipError(_) | ZenodoError::NotADirectory { .. } => {
                ErrorCategory::Filesystem
            }
            ZenodoError::RequestError(_)
            | ZenodoError::HttpStatus { .. }
            | ZenodoError::UnexpectedResponse { .. }
            | ZenodoError::SerializationError(_) => ErrorCategory::Network,
        }
    }

    /// Process exit code for this error. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Configuration => 2,
            ErrorCategory::Filesystem => 3,
            ErrorCategory::Network => 4,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ZenodoError::HttpStatus {
                operation,
                status,
                body,
            } => {
                let body = body.trim();
                if body.is_empty() {
                    format!("Zenodo rejected the {} request (HTTP {})", operation, status)
                } else {
                    format!(
                        "Zenodo rejected the {} request (HTTP {}): {}",
                        operation, status, body
                    )
                }
            }
            ZenodoError::RequestError(e) if e.is_connect() => {
                format!("Could not connect to Zenodo: {}", e)
            }
            ZenodoError::RequestError(e) if e.is_timeout() => {
                format!("Request to Zenodo timed out: {}", e)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ZenodoError::InvalidCreator { .. } => {
                "Pass creators as --creator \"Family, Given\", one flag per person"
            }
            ZenodoError::MissingField("title") => "Pass --title or archive a named directory",
            ZenodoError::MissingField(_) => {
                "Pass at least one --creator or use --anonymous"
            }
            ZenodoError::MissingConfigError { field } if field == "ZENODO_SANDBOX_API_TOKEN" => {
                "Set ZENODO_SANDBOX_API_TOKEN, pass --token, or add sandbox_api_token to the config file"
            }
            ZenodoError::MissingConfigError { .. } => {
                "Set ZENODO_API_TOKEN, pass --token, or add api_token to the config file"
            }
            ZenodoError::InvalidConfigValueError { .. }
            | ZenodoError::ConfigValidationError { .. }
            | ZenodoError::UrlError(_) => "Check the command-line flags and the config file",
            ZenodoError::NotADirectory { .. } | ZenodoError::IoError(_) => {
                "Check that --dir points to a readable directory"
            }
            ZenodoError::ZipError(_) => "Check the directory contents and available disk space",
            ZenodoError::HttpStatus { status: 401, .. }
            | ZenodoError::HttpStatus { status: 403, .. } => {
                "Check that the token is valid for this Zenodo instance and has the deposit:write scope"
            }
            ZenodoError::HttpStatus { .. } | ZenodoError::UnexpectedResponse { .. } => {
                "Inspect the response above; a created draft may need to be finished or deleted on Zenodo"
            }
            ZenodoError::RequestError(_) | ZenodoError::SerializationError(_) => {
                "Check the network connection and try again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ZenodoError>;
