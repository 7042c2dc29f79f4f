//! # Wordserve
//!
//! A multithreaded ranked word-search server: crawl a directory tree into an
//! in-memory inverted index at startup, then serve static files and
//! multi-term ranked search over a small GET-only HTTP server.
//!
//! ## Pieces
//!
//! - In-memory inverted word index with AND-semantics ranked queries
//! - Per-connection HTTP request framer that survives arbitrary chunking and
//!   pipelined requests
//! - Fixed-size worker pool with queue-drain-on-shutdown guarantees
//! - Accept loop tying the three together

pub mod analysis;
pub mod cli;
pub mod crawl;
pub mod error;
pub mod http;
pub mod index;
pub mod pool;
pub mod server;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
