use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElementError {
    #[error("element record is not an object")]
    NotAnObject,
    #[error("no TLE lines found under any known alias (available fields: {0})")]
    MissingElementData(String),
    #[error("TLE lines cannot be constructed from mean orbital elements")]
    SynthesisUnsupported,
    #[error("invalid TLE for {name}: {message}")]
    InvalidTle { name: String, message: String },
    #[error("invalid catalog number: {0}")]
    InvalidCatalogId(String),
    #[error("malformed element response: {0}")]
    Json(#[from] serde_json::Error),
}
