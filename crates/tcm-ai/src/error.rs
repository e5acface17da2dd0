use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("response did not conform to expected schema: {0}")]
    SchemaViolation(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("could not read media: {0}")]
    Media(String),
}
