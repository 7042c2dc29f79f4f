//! Pure HTTP/HTML string utilities: URL decoding, query-string parsing,
//! HTML escaping, path-safety checks, and the content-type table.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

/// Decode `%XY` escapes in a URI component.
///
/// Only codes 32..=127 are decoded; `+` becomes a space (old form encoders);
/// malformed or out-of-range escapes pass through verbatim.
pub fn decode_uri(from: &str) -> String {
    let bytes = from.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());

    let mut pos = 0;
    while pos < bytes.len() {
        let c = bytes[pos];

        if c == b'+' {
            out.push(b' ');
            pos += 1;
            continue;
        }
        if c != b'%' {
            out.push(c);
            pos += 1;
            continue;
        }

        let hi = bytes.get(pos + 1).map(|b| b.to_ascii_uppercase());
        let lo = bytes.get(pos + 2).map(|b| b.to_ascii_uppercase());
        match (hi.and_then(hex_value), lo.and_then(hex_value)) {
            (Some(hi), Some(lo)) => {
                let code = hi * 16 + lo;
                if (32..=127).contains(&code) {
                    out.push(code);
                    pos += 3;
                } else {
                    out.push(c);
                    pos += 1;
                }
            }
            _ => {
                out.push(c);
                pos += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Replace the five HTML-unsafe characters with their named entities.
///
/// One-directional; `&` is replaced first so already-present entities in the
/// input are escaped rather than preserved.
pub fn escape_html(from: &str) -> String {
    from.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// A URL split into its decoded path and decoded query arguments.
#[derive(Debug, Clone, Default)]
pub struct UrlParser {
    path: String,
    args: HashMap<String, String>,
}

impl UrlParser {
    /// Parse a request URI of the form `path[?field=value[&field=value…]]`.
    ///
    /// Query chunks without a `=` are ignored.
    pub fn parse(url: &str) -> Self {
        let (path_part, args_part) = match url.split_once('?') {
            Some((path, args)) => (path, Some(args)),
            None => (url, None),
        };

        let mut args = HashMap::new();
        if let Some(raw_args) = args_part {
            for chunk in raw_args.split('&') {
                if let Some((field, value)) = chunk.split_once('=') {
                    args.insert(decode_uri(field), decode_uri(value));
                }
            }
        }

        UrlParser {
            path: decode_uri(path_part),
            args,
        }
    }

    /// The URI-decoded path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The decoded query arguments.
    pub fn args(&self) -> &HashMap<String, String> {
        &self.args
    }
}

/// Whether `test_file` resolves to a path inside `root_dir`.
///
/// Existing paths are canonicalized so symlinks cannot escape the root.
/// Nonexistent paths are resolved lexically (`.`/`..` collapsed against the
/// working directory) so that a missing-but-inside file can still reach the
/// 404 handler instead of being rejected as unsafe.
pub fn is_path_safe(root_dir: &Path, test_file: &Path) -> bool {
    let Ok(root) = root_dir.canonicalize() else {
        return false;
    };

    let resolved = match test_file.canonicalize() {
        Ok(path) => path,
        Err(_) => match lexical_absolute(test_file) {
            Some(path) => path,
            None => return false,
        },
    };

    resolved.starts_with(&root)
}

fn lexical_absolute(path: &Path) -> Option<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().ok()?.join(path)
    };
    Some(absolute.clean())
}

/// Map a file extension to the served `Content-type`.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html",
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "txt" => "text/txt",
        "js" => "text/js",
        "css" => "text/css",
        "xml" => "text/xml",
        _ => "text/text",
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_decode_uri() {
        assert_eq!(decode_uri("a+b"), "a b");
        assert_eq!(decode_uri("a%20b"), "a b");
        assert_eq!(decode_uri("%2Fetc%2fpasswd"), "/etc/passwd");
        // Malformed escapes pass through.
        assert_eq!(decode_uri("100%"), "100%");
        assert_eq!(decode_uri("%zz"), "%zz");
        // Out-of-range codes are left alone.
        assert_eq!(decode_uri("%00abc"), "%00abc");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&apos;&lt;/a&gt;"
        );
        // Applied once to an already-escaped ampersand, the ampersand itself
        // is escaped again.
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_url_parser() {
        let parsed = UrlParser::parse("/query?terms=apple+pie&lang=en");
        assert_eq!(parsed.path(), "/query");
        assert_eq!(parsed.args().get("terms").unwrap(), "apple pie");
        assert_eq!(parsed.args().get("lang").unwrap(), "en");

        let parsed = UrlParser::parse("/static/foo%20bar.txt");
        assert_eq!(parsed.path(), "/static/foo bar.txt");
        assert!(parsed.args().is_empty());

        // Chunks without '=' are ignored.
        let parsed = UrlParser::parse("/query?terms");
        assert!(parsed.args().is_empty());
    }

    #[test]
    fn test_is_path_safe() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("inside.txt"), "x").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("deep.txt"), "x").unwrap();

        assert!(is_path_safe(root, &root.join("inside.txt")));
        assert!(is_path_safe(root, &root.join("sub/deep.txt")));
        // The root itself counts as inside.
        assert!(is_path_safe(root, root));
        // Missing but inside: still safe, so the caller can 404.
        assert!(is_path_safe(root, &root.join("missing.txt")));

        // Escapes.
        assert!(!is_path_safe(root, &root.join("../somewhere")));
        assert!(!is_path_safe(root, &root.join("sub/../../etc/passwd")));
        assert!(!is_path_safe(root, Path::new("/etc/passwd")));
    }

    #[test]
    fn test_content_type_for_path() {
        assert_eq!(content_type_for_path(Path::new("a.html")), "text/html");
        assert_eq!(content_type_for_path(Path::new("a.htm")), "text/html");
        assert_eq!(content_type_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(content_type_for_path(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for_path(Path::new("a.gif")), "image/gif");
        assert_eq!(content_type_for_path(Path::new("a.css")), "text/css");
        assert_eq!(content_type_for_path(Path::new("a.bin")), "text/text");
        assert_eq!(content_type_for_path(Path::new("noext")), "text/text");
    }
}
