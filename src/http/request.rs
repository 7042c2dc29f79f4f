//! Parsed HTTP request.

use std::collections::HashMap;

/// A structured GET request produced by the connection framer.
///
/// Header names and values are stored lower-cased, so lookups are
/// case-insensitive. The URI keeps the case the client sent.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    uri: String,
    headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a request for the given URI with no headers.
    pub fn new<S: Into<String>>(uri: S) -> Self {
        HttpRequest {
            uri: uri.into(),
            headers: HashMap::new(),
        }
    }

    /// The resource path as it appeared on the request line (pre-decoding).
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Number of headers carried by the request.
    pub fn num_headers(&self) -> usize {
        self.headers.len()
    }

    /// Look up a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Add a header; a repeated name overwrites the previous value.
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers
            .insert(name.to_lowercase(), value.to_string());
    }
}
