use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShieldError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Presentation failed: {0}")]
    Present(String),
}
