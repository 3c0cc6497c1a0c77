use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Network error while fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP error while fetching {url}: status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    #[error("Empty payload: {message}")]
    EmptyPayload { message: String },

    #[error("Renderer unavailable: {message}")]
    RendererUnavailable { message: String },

    #[error("Renderer failed: {message}")]
    RendererError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Payload,
    Renderer,
    Config,
    Io,
}

impl ScrapeError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self::EmptyPayload {
            message: message.into(),
        }
    }

    /// 靜態解析失敗（可觸發渲染升級）
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedPayload { .. } | Self::EmptyPayload { .. }
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network { .. } | Self::HttpStatus { .. } => ErrorCategory::Transport,
            Self::MalformedPayload { .. }
            | Self::EmptyPayload { .. }
            | Self::CsvError(_)
            | Self::SerializationError(_) => ErrorCategory::Payload,
            Self::RendererUnavailable { .. } | Self::RendererError { .. } => {
                ErrorCategory::Renderer
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
            Self::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Network { .. } => "Check network connectivity or raise --timeout",
            Self::HttpStatus { .. } => "Verify the event identifiers and --base-url",
            Self::MalformedPayload { .. } | Self::EmptyPayload { .. } => {
                "The page may need client-side rendering; retry with --render-js"
            }
            Self::RendererUnavailable { .. } => {
                "Rebuild with `--features browser` and install Chrome/Chromium"
            }
            Self::RendererError { .. } => "Raise --timeout or retry later",
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Inspect the upstream response for unexpected structure"
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration and run again",
            Self::IoError(_) => "Check that the output path is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
