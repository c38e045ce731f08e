use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential file parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("password hashing error: {0}")]
    Hash(String),
}
