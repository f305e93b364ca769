// crates/edge/src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The search engine answered with a non-success status.
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response: {0}")]
    Response(String),
}

impl Error {
    #[inline]
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    #[inline]
    pub fn response(msg: impl Into<String>) -> Self {
        Error::Response(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
