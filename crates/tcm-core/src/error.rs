use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("unknown step id: {0}")]
    UnknownStep(String),

    #[error("unknown pulse quality: {0}")]
    UnknownPulseQuality(String),

    #[error("pulse qualities {0} and {1} cannot be selected together")]
    ConflictingPulse(String, String),

    #[error("unknown doctor level: {0}")]
    UnknownDoctorLevel(String),

    #[error("no media payload")]
    EmptyMedia,

    #[error("could not read media: {0}")]
    Media(String),

    #[error("invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

impl CoreError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
