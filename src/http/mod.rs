//! HTTP protocol handling: wire types, per-connection framing, and the pure
//! string utilities shared by the request handlers.

pub mod connection;
pub mod request;
pub mod response;
pub mod util;

pub use connection::HttpConnection;
pub use request::HttpRequest;
pub use response::HttpResponse;
