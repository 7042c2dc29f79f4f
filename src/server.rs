//! HTTP server: accept loop, per-connection request loop, and the static-file
//! and query handlers.

use std::fs;
use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Result, WordserveError};
use crate::http::connection::HttpConnection;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::http::util::{UrlParser, content_type_for_path, escape_html, is_path_safe};
use crate::index::WordIndex;
use crate::pool::ThreadPool;

/// URI prefix that routes to the static-file handler.
const STATIC_PREFIX: &str = "/static/";

/// Search page header: logo plus the search box, shared by every query
/// response. Result markup is appended after it.
const SEARCH_PAGE_HEADER: &str = concat!(
    "<html><head><title>wordserve</title></head>\n",
    "<body>\n",
    "<center style=\"font-size:300%;\">wordserve</center>\n",
    "<p>\n",
    "<center>\n",
    "<form action=\"/query\" method=\"get\">\n",
    "<input type=\"text\" size=30 name=\"terms\" />\n",
    "<input type=\"submit\" value=\"Search\" />\n",
    "</form>\n",
    "</center><p>\n",
);

/// The search server: owns the listening configuration and the shared
/// read-only index.
pub struct HttpServer {
    port: u16,
    static_dir: PathBuf,
    num_workers: usize,
    index: Arc<WordIndex>,
}

impl HttpServer {
    /// Create a server for the given port, static directory, worker count,
    /// and crawled index.
    pub fn new(port: u16, static_dir: PathBuf, num_workers: usize, index: Arc<WordIndex>) -> Self {
        HttpServer {
            port,
            static_dir,
            num_workers,
            index,
        }
    }

    /// Bind the listening socket and serve until the accept loop fails.
    pub fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(("0.0.0.0", self.port))?;
        self.serve(listener)
    }

    /// Accept connections from `listener`, dispatching each into the worker
    /// pool. Each accepted connection is owned by exactly one worker for its
    /// whole lifetime.
    ///
    /// A hard accept error ends the loop; the pool then drains and the server
    /// returns.
    pub fn serve(&self, listener: TcpListener) -> Result<()> {
        log::info!("listening on {}", listener.local_addr()?);
        let mut pool = ThreadPool::new(self.num_workers)?;
        log::info!("accepting connections with {} workers", self.num_workers);

        loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    log::info!("client {peer} connected");
                    let static_dir = self.static_dir.clone();
                    let index = Arc::clone(&self.index);
                    pool.dispatch(move || handle_client(stream, static_dir, index));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("accept failed, shutting down: {e}");
                    break;
                }
            }
        }

        pool.shutdown();
        Ok(())
    }
}

/// Per-connection task: frame requests off the stream in arrival order and
/// answer each one until the peer disconnects, errors, or asks to close.
fn handle_client(stream: TcpStream, static_dir: PathBuf, index: Arc<WordIndex>) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    let mut connection = HttpConnection::new(stream);

    loop {
        let request = match connection.next_request() {
            Ok(request) => request,
            Err(WordserveError::ConnectionClosed) => {
                log::debug!("client {peer} disconnected");
                return;
            }
            Err(e) => {
                log::warn!("closing connection to {peer}: {e}");
                return;
            }
        };

        let wants_close = request.header_value("connection") == Some("close");
        let response = process_request(&request, &static_dir, &index);
        log::debug!("{peer} GET {} -> {}", request.uri(), response.status_code());

        if let Err(e) = connection.write_response(&response) {
            log::warn!("write to {peer} failed: {e}");
            return;
        }
        if wants_close {
            log::debug!("client {peer} requested close");
            return;
        }
    }
}

/// Route a request: `/static/…` to the file handler, everything else to the
/// query handler.
fn process_request(request: &HttpRequest, static_dir: &Path, index: &WordIndex) -> HttpResponse {
    if request.uri().starts_with(STATIC_PREFIX) {
        process_file_request(request.uri(), static_dir)
    } else {
        process_query_request(request.uri(), index)
    }
}

/// Serve one file from under the static directory.
///
/// A path escaping the directory is 403; a path inside it that cannot be read
/// is 404. Both are request-level errors: the connection stays open.
fn process_file_request(uri: &str, static_dir: &Path) -> HttpResponse {
    let parsed = UrlParser::parse(uri);
    let file_name = &parsed.path()[STATIC_PREFIX.len()..];
    let file_path = Path::new(file_name);

    if !is_path_safe(static_dir, file_path) {
        let mut response = HttpResponse::new();
        response.set_status(403, "Forbidden");
        response.set_content_type("text/html");
        response.append_body(&format!(
            "<html><body>Forbidden \"{}\"</body></html>\n",
            escape_html(file_name)
        ));
        return response;
    }

    match fs::read(file_path) {
        Ok(content) => {
            let mut response = HttpResponse::new();
            response.set_content_type(content_type_for_path(file_path));
            response.append_body_bytes(&content);
            response
        }
        Err(_) => {
            let mut response = HttpResponse::new();
            response.set_status(404, "Not Found");
            response.set_content_type("text/html");
            response.append_body(&format!(
                "<html><body>Couldn't find file \"{}\"</body></html>\n",
                escape_html(file_name)
            ));
            response
        }
    }
}

/// Render the search page, with ranked results when a `terms` argument is
/// present.
fn process_query_request(uri: &str, index: &WordIndex) -> HttpResponse {
    let parsed = UrlParser::parse(uri);

    let mut response = HttpResponse::new();
    response.set_content_type("text/html");
    response.append_body(SEARCH_PAGE_HEADER);

    if let Some(raw_terms) = parsed.args().get("terms") {
        let terms: Vec<String> = raw_terms
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();
        let hits = index.lookup_query(&terms);
        let echoed = escape_html(&terms.join(" "));

        if hits.is_empty() {
            response.append_body(&format!(
                "<p><br>No results found for <b>{echoed}</b></p>\n"
            ));
        } else {
            let plural = if hits.len() == 1 { "" } else { "s" };
            response.append_body(&format!(
                "<p><br>{} result{plural} for <b>{echoed}</b></p>\n<ul>\n",
                hits.len()
            ));
            for hit in &hits {
                response.append_body(&format!(
                    "<li><a href=\"/static/{}\">{}</a> [{}]</li>\n",
                    hit.doc_name,
                    escape_html(&hit.doc_name),
                    hit.rank
                ));
            }
            response.append_body("</ul>\n");
        }
    }

    response.append_body("</body></html>\n");
    response
}
