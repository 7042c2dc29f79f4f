//! Per-connection request framing.
//!
//! [`HttpConnection`] owns one byte stream and reconstructs discrete requests
//! from it no matter how the transport chunks the data. Bytes that arrive
//! after a request's header terminator stay buffered as the prefix of the
//! *next* request, which is what makes pipelined back-to-back requests and
//! mid-header partial reads transparent to the caller.

use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, WordserveError};
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

/// Marks the end of a request header block.
const HEADER_END: &[u8] = b"\r\n\r\n";

/// How many bytes one blocking read asks for.
const READ_CHUNK: usize = 1024;

/// Framer for one connection's byte stream.
///
/// Generic over the stream so tests can drive it with in-memory chunked
/// streams instead of sockets.
#[derive(Debug)]
pub struct HttpConnection<S> {
    stream: S,
    /// Residual bytes not yet consumed into a request. Lives as long as the
    /// connection; initially empty.
    buffer: Vec<u8>,
}

impl<S: Read + Write> HttpConnection<S> {
    /// Wrap a connected stream.
    pub fn new(stream: S) -> Self {
        HttpConnection {
            stream,
            buffer: Vec::new(),
        }
    }

    /// Read and parse the next request from the stream.
    ///
    /// Blocks until a full header block (terminated by `\r\n\r\n`) is
    /// buffered. Fails with [`WordserveError::ConnectionClosed`] on clean EOF,
    /// [`WordserveError::Io`] on a hard read error, and
    /// [`WordserveError::MalformedRequest`] when the header block does not
    /// parse; all three are connection-fatal for the caller.
    pub fn next_request(&mut self) -> Result<HttpRequest> {
        loop {
            if let Some(end) = find_header_end(&self.buffer) {
                let header: Vec<u8> = self.buffer[..end].to_vec();
                // Everything past the terminator belongs to the next request.
                self.buffer.drain(..end + HEADER_END.len());
                return parse_request(&header);
            }
            self.fill_buffer()?;
        }
    }

    /// Serialize `response` and write it out in full.
    ///
    /// A short write (dropped peer) is an error; the caller must close the
    /// connection.
    pub fn write_response(&mut self, response: &HttpResponse) -> Result<()> {
        self.stream.write_all(&response.to_bytes())?;
        self.stream.flush()?;
        Ok(())
    }

    /// One blocking read of available bytes, appended to the buffer.
    /// Interrupted/would-block conditions are retried here and never surface.
    fn fill_buffer(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(WordserveError::ConnectionClosed),
                Ok(n) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Position of the first header terminator, if a full header is buffered.
fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEADER_END.len())
        .position(|window| window == HEADER_END)
}

/// Parse a header block (terminator already stripped) into a request.
///
/// Method and headers are treated case-insensitively (names and values are
/// stored lower-cased); the URI keeps its case so that document paths with
/// uppercase letters stay servable.
fn parse_request(raw: &[u8]) -> Result<HttpRequest> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();

    let mut lines = text.split("\r\n");
    let first_line = lines
        .next()
        .ok_or_else(|| WordserveError::malformed_request("empty request"))?;

    let mut components = first_line.split_whitespace();
    match components.next() {
        Some(method) if method.eq_ignore_ascii_case("get") => {}
        Some(method) => {
            return Err(WordserveError::malformed_request(format!(
                "unsupported method '{method}'"
            )));
        }
        None => return Err(WordserveError::malformed_request("empty request line")),
    }
    let uri = components
        .next()
        .ok_or_else(|| WordserveError::malformed_request("request line has no path"))?;

    let mut request = HttpRequest::new(uri);
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, value) = line.split_once(':').ok_or_else(|| {
            WordserveError::malformed_request(format!("header line missing ':': '{line}'"))
        })?;
        request.add_header(name.trim(), &value.trim().to_lowercase());
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;

    /// In-memory stream that serves scripted read chunks and records writes.
    struct ChunkedStream {
        chunks: VecDeque<Vec<u8>>,
        written: Vec<u8>,
    }

    impl ChunkedStream {
        fn new<I: IntoIterator<Item = Vec<u8>>>(chunks: I) -> Self {
            ChunkedStream {
                chunks: chunks.into_iter().collect(),
                written: Vec::new(),
            }
        }

        fn single(bytes: &[u8]) -> Self {
            Self::new([bytes.to_vec()])
        }
    }

    impl Read for ChunkedStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let Some(mut chunk) = self.chunks.pop_front() else {
                return Ok(0); // EOF
            };
            let n = chunk.len().min(buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            if n < chunk.len() {
                self.chunks.push_front(chunk.split_off(n));
            }
            Ok(n)
        }
    }

    impl Write for ChunkedStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    const REQ1: &str =
        "GET /foo HTTP/1.1\r\nHost: somehost.foo.bar\r\nConnection: close\r\n\r\n";
    const REQ2: &str =
        "GET /bar HTTP/1.1\r\nConnection: close\r\nHost: somehost.foo.bar\r\n\r\n";
    const REQ3: &str =
        "GET /baz HTTP/1.1\r\nconnection: keep-alive\r\nhost: somehost.foo.bar\r\nOTHER: some_value\r\n\r\n";

    #[test]
    fn test_single_request() {
        let stream = ChunkedStream::single(REQ1.as_bytes());
        let mut connection = HttpConnection::new(stream);

        let request = connection.next_request().unwrap();
        assert_eq!(request.uri(), "/foo");
        assert_eq!(request.num_headers(), 2);
        assert_eq!(request.header_value("host"), Some("somehost.foo.bar"));
        assert_eq!(request.header_value("Connection"), Some("close"));
    }

    #[test]
    fn test_uri_case_preserved_headers_folded() {
        let stream = ChunkedStream::single(
            b"get /Static/README.TXT HTTP/1.1\r\nConnection: CLOSE\r\n\r\n",
        );
        let mut connection = HttpConnection::new(stream);

        let request = connection.next_request().unwrap();
        assert_eq!(request.uri(), "/Static/README.TXT");
        assert_eq!(request.header_value("connection"), Some("close"));
    }

    #[test]
    fn test_pipelined_requests_in_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(REQ1.as_bytes());
        bytes.extend_from_slice(REQ2.as_bytes());
        bytes.extend_from_slice(REQ3.as_bytes());
        let stream = ChunkedStream::single(&bytes);
        let mut connection = HttpConnection::new(stream);

        // All three arrive in one read; successive calls must consume them in
        // order from the residual buffer without touching the stream again.
        let r1 = connection.next_request().unwrap();
        let r2 = connection.next_request().unwrap();
        let r3 = connection.next_request().unwrap();

        assert_eq!(r1.uri(), "/foo");
        assert_eq!(r2.uri(), "/bar");
        assert_eq!(r2.header_value("connection"), Some("close"));
        assert_eq!(r3.uri(), "/baz");
        assert_eq!(r3.num_headers(), 3);
        assert_eq!(r3.header_value("other"), Some("some_value"));
        assert_eq!(r3.header_value("connection"), Some("keep-alive"));

        // Nothing left: the next call hits EOF.
        assert!(matches!(
            connection.next_request(),
            Err(WordserveError::ConnectionClosed)
        ));
    }

    #[test]
    fn test_chunking_is_transparent() {
        // Byte-at-a-time delivery, splitting inside the \r\n\r\n terminator,
        // must parse identically to a single-shot read.
        let chunks: Vec<Vec<u8>> = REQ1.as_bytes().iter().map(|&b| vec![b]).collect();
        let mut connection = HttpConnection::new(ChunkedStream::new(chunks));

        let request = connection.next_request().unwrap();
        assert_eq!(request.uri(), "/foo");
        assert_eq!(request.num_headers(), 2);
        assert_eq!(request.header_value("host"), Some("somehost.foo.bar"));

        // Split in the middle of the terminator across two chunks.
        let (a, b) = REQ2.as_bytes().split_at(REQ2.len() - 2);
        let mut connection =
            HttpConnection::new(ChunkedStream::new([a.to_vec(), b.to_vec()]));
        let request = connection.next_request().unwrap();
        assert_eq!(request.uri(), "/bar");
        assert_eq!(request.num_headers(), 2);
    }

    #[test]
    fn test_residue_spans_chunk_boundaries() {
        // First chunk carries all of request 1 plus the start of request 2.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(REQ1.as_bytes());
        bytes.extend_from_slice(REQ2.as_bytes());
        let split = REQ1.len() + 10;
        let chunks = vec![bytes[..split].to_vec(), bytes[split..].to_vec()];
        let mut connection = HttpConnection::new(ChunkedStream::new(chunks));

        assert_eq!(connection.next_request().unwrap().uri(), "/foo");
        assert_eq!(connection.next_request().unwrap().uri(), "/bar");
    }

    #[test]
    fn test_eof_before_full_header() {
        let stream = ChunkedStream::single(b"GET /foo HTTP/1.1\r\nHost: x\r\n");
        let mut connection = HttpConnection::new(stream);

        assert!(matches!(
            connection.next_request(),
            Err(WordserveError::ConnectionClosed)
        ));
    }

    #[test]
    fn test_non_get_method_is_malformed() {
        let stream = ChunkedStream::single(b"POST /foo HTTP/1.1\r\n\r\n");
        let mut connection = HttpConnection::new(stream);

        assert!(matches!(
            connection.next_request(),
            Err(WordserveError::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_header_line_without_colon_is_malformed() {
        let stream = ChunkedStream::single(b"GET /foo HTTP/1.1\r\nbogus header line\r\n\r\n");
        let mut connection = HttpConnection::new(stream);

        assert!(matches!(
            connection.next_request(),
            Err(WordserveError::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_write_response() {
        let stream = ChunkedStream::new([]);
        let mut connection = HttpConnection::new(stream);

        let mut response = HttpResponse::new();
        response.set_content_type("text/html");
        response.append_body("hi");
        connection.write_response(&response).unwrap();

        assert_eq!(
            connection.stream.written,
            b"HTTP/1.1 200 OK\r\nContent-type: text/html\r\nContent-length: 2\r\n\r\nhi"
        );
    }
}
