use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("could not reach mail server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail server answered {status} for {path}")]
    Status { status: u16, path: String },
    /// Message reported by the server in an `{"error": ...}` body
    #[error("{0}")]
    Server(String),
    #[error("unexpected response for {path}: {reason}")]
    Decode { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MailError>;
