//! Error types for the wordserve library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`WordserveError`] enum. The taxonomy mirrors how failures are handled:
//! startup problems (bad arguments, bind failures, a bad crawl root) abort the
//! process, connection-level problems (malformed requests, dropped peers)
//! close one connection, and request-level user errors never surface here at
//! all — they become 403/404 HTTP responses.
//!
//! # Examples
//!
//! ```
//! use wordserve::error::{Result, WordserveError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(WordserveError::malformed_request("header line missing ':'"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for wordserve operations.
#[derive(Error, Debug)]
pub enum WordserveError {
    /// I/O errors (file operations, sockets, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Text analysis errors (tokenization)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Index-related errors
    #[error("Index error: {0}")]
    Index(String),

    /// Crawl-related errors (bad root, unreadable tree)
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// A request that could not be parsed into `GET <uri> <version>` plus
    /// well-formed headers
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The peer closed the connection (clean EOF with no pending request)
    #[error("Connection closed by peer")]
    ConnectionClosed,

    /// Internal errors (thread spawn failures and the like)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with [`WordserveError`].
pub type Result<T> = std::result::Result<T, WordserveError>;

impl WordserveError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        WordserveError::Analysis(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        WordserveError::Index(msg.into())
    }

    /// Create a new crawl error.
    pub fn crawl<S: Into<String>>(msg: S) -> Self {
        WordserveError::Crawl(msg.into())
    }

    /// Create a new malformed-request error.
    pub fn malformed_request<S: Into<String>>(msg: S) -> Self {
        WordserveError::MalformedRequest(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        WordserveError::Internal(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        WordserveError::Internal(format!("Invalid argument: {}", msg.into()))
    }
}
