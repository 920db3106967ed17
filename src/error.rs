use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Reference data error in {source_name}: {message}")]
    ReferenceData {
        source_name: String,
        message: String,
    },

    #[error("Update cursor error: {0}")]
    Cursor(String),

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<config::ConfigError> for ProcessingError {
    fn from(err: config::ConfigError) -> Self {
        ProcessingError::Config(err.to_string())
    }
}

impl From<tempfile::PersistError> for ProcessingError {
    fn from(err: tempfile::PersistError) -> Self {
        ProcessingError::Io(err.error)
    }
}

impl ProcessingError {
    pub fn reference(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        ProcessingError::ReferenceData {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}
