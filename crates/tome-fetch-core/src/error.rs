//! Error handling for Tome-Fetch

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("channel error: {0}")]
    Channel(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Error::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            Error::Network(err.to_string())
        }
    }
}

impl<T> From<async_channel::SendError<T>> for Error {
    fn from(err: async_channel::SendError<T>) -> Self {
        Error::Channel(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Human-readable message for toasts and status pages.
///
/// GraphQL failures show only the server's messages, without the variant prefix.
pub fn error_message(err: &Error) -> String {
    match err {
        Error::GraphQl(messages) if !messages.is_empty() => messages.join("; "),
        Error::Network(msg) | Error::InvalidInput(msg) | Error::Config(msg) => msg.clone(),
        other => other.to_string(),
    }
}
