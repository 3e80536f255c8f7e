use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Galactic Console client unavailable: {message}")]
    ClientUnavailable { message: String },

    #[error("Unable to locate a 'getSystem' call on the client (tried: {})", .tried.join(", "))]
    CallNotFound { tried: Vec<String> },

    #[error("getSystem responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("The getSystem call returned no data.")]
    EmptyPayload,

    #[error("The system payload does not contain a memory stream (looked for: {})", .looked_for.join(", "))]
    MissingMemoryStream { looked_for: Vec<String> },

    #[error("Cannot encode memory stream as {encoding}: {reason}")]
    EncodeError { encoding: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Client,
    Network,
    Payload,
    Decoding,
}

impl StreamError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamError::ConfigError { .. }
            | StreamError::InvalidConfigValueError { .. }
            | StreamError::TomlError(_) => ErrorCategory::Configuration,
            StreamError::ClientUnavailable { .. } | StreamError::CallNotFound { .. } => {
                ErrorCategory::Client
            }
            StreamError::ApiError(_) | StreamError::UnexpectedStatus { .. } => {
                ErrorCategory::Network
            }
            StreamError::EmptyPayload
            | StreamError::MissingMemoryStream { .. }
            | StreamError::SerializationError(_) => ErrorCategory::Payload,
            StreamError::EncodeError { .. } => ErrorCategory::Decoding,
        }
    }

    /// 根據錯誤類型決定程序退出碼
    pub fn exit_code(&self) -> i32 {
        match self {
            StreamError::CallNotFound { .. } => 3,
            StreamError::EmptyPayload | StreamError::MissingMemoryStream { .. } => 4,
            StreamError::EncodeError { .. } => 5,
            _ => match self.category() {
                ErrorCategory::Configuration | ErrorCategory::Client => 2,
                _ => 1,
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            StreamError::ApiError(e) if e.is_timeout() => {
                "The Galactic Console API did not answer in time".to_string()
            }
            StreamError::ApiError(e) if e.is_connect() => {
                "Could not connect to the Galactic Console API".to_string()
            }
            StreamError::CallNotFound { .. } => {
                "Unable to locate a 'getSystem' call on the client.".to_string()
            }
            StreamError::MissingMemoryStream { .. } => {
                "The system payload does not contain a memory stream.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the command line flags and the config file",
            ErrorCategory::Client => match self {
                StreamError::CallNotFound { .. } => {
                    "Check --base-url, or list the client's routes under [client] routes"
                }
                _ => "Pass --base-url or set GALACTIC_CONSOLE_BASE_URL",
            },
            ErrorCategory::Network => "Check network connectivity and the API key",
            ErrorCategory::Payload => {
                "Check that the API version exposes a memory stream, or set [stream] field_names"
            }
            ErrorCategory::Decoding => "Try a different --encoding (e.g. utf-8)",
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
