use botcore::{PurgeError, SessionError, TokenError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Purge(#[from] PurgeError),

    #[error("member list worker has stopped")]
    WorkerStopped,
}

pub type Result<T> = std::result::Result<T, ClientError>;
