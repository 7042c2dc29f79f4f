//! HTTP response and its wire serialization.

/// A response under construction by a request handler.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    protocol: String,
    status_code: u16,
    message: String,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl HttpResponse {
    /// Create an empty `HTTP/1.1 200 OK` response.
    pub fn new() -> Self {
        HttpResponse {
            protocol: "HTTP/1.1".to_string(),
            status_code: 200,
            message: "OK".to_string(),
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Set the status code and reason message.
    pub fn set_status<S: Into<String>>(&mut self, code: u16, message: S) {
        self.status_code = code;
        self.message = message.into();
    }

    /// Set the `Content-type` header value.
    pub fn set_content_type<S: Into<String>>(&mut self, content_type: S) {
        self.content_type = Some(content_type.into());
    }

    /// Append text to the body.
    pub fn append_body(&mut self, text: &str) {
        self.body.extend_from_slice(text.as_bytes());
    }

    /// Append raw bytes to the body.
    pub fn append_body_bytes(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// The status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The body accumulated so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Serialize into wire form: status line, `Content-type` when set, a
    /// `Content-length` always reflecting the actual body length, a blank
    /// line, then the raw body bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "{} {} {}\r\n",
            self.protocol, self.status_code, self.message
        );
        if let Some(content_type) = &self.content_type {
            head.push_str(&format!("Content-type: {content_type}\r\n"));
        }
        head.push_str(&format!("Content-length: {}\r\n\r\n", self.body.len()));

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}
