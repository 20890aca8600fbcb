//! error types
//!
//! structured errors for config, io, http, and schema/operation parsing.

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for the generator and the codegen cli
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema parse error: {0}")]
    SchemaParse(String),

    #[error("operation parse error: {0}")]
    OperationParse(String),
}
