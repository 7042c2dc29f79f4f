//! Startup crawl: walk a directory tree and feed every file into the index.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::analysis::AlphaTokenizer;
use crate::error::{Result, WordserveError};
use crate::index::WordIndex;

/// Recursively crawl `root`, tokenizing every regular file and recording each
/// term in `index` under the file's path as its document id.
///
/// Individual unreadable files are skipped with a warning; a `root` that is
/// not a readable directory is an error. Returns the number of files indexed.
pub fn crawl_tree(root: &Path, tokenizer: &AlphaTokenizer, index: &mut WordIndex) -> Result<usize> {
    if !root.is_dir() {
        return Err(WordserveError::crawl(format!(
            "{} is not a readable directory",
            root.display()
        )));
    }

    let mut files_indexed = 0;
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        match fs::read(entry.path()) {
            Ok(content) => {
                handle_file(entry.path(), &content, tokenizer, index);
                files_indexed += 1;
            }
            Err(e) => {
                log::warn!("skipping {}: {e}", entry.path().display());
            }
        }
    }

    Ok(files_indexed)
}

/// Tokenize one file's content and record every term.
fn handle_file(path: &Path, content: &[u8], tokenizer: &AlphaTokenizer, index: &mut WordIndex) {
    // Binary files are fair game too; undecodable bytes act as delimiters.
    let text = String::from_utf8_lossy(content);
    let doc_name = path.display().to_string();

    for token in tokenizer.tokenize(&text) {
        index.record(&token, &doc_name);
    }

    log::debug!("indexed {doc_name}");
}
