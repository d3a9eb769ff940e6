use thiserror::Error;

#[derive(Debug, Error)]
pub enum KycReportError {
    #[error("Invalid input ({field}): {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for KycReportError {
    fn from(e: serde_json::Error) -> Self {
        KycReportError::SerializationError(e.to_string())
    }
}

impl From<serde_yaml::Error> for KycReportError {
    fn from(e: serde_yaml::Error) -> Self {
        KycReportError::Config(e.to_string())
    }
}
