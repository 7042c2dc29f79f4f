//! Wordserve server binary.

use std::io::Write;
use std::process;
use std::sync::Arc;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use wordserve::analysis::AlphaTokenizer;
use wordserve::cli::WordserveArgs;
use wordserve::crawl::crawl_tree;
use wordserve::error::{Result, WordserveError};
use wordserve::index::WordIndex;
use wordserve::server::HttpServer;

fn main() {
    // Parse command line arguments using clap
    let args = WordserveArgs::parse();

    // Set up logging/verbosity based on args
    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (3+)
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    // A dropped client must surface as a write error, not a SIGPIPE crash.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_IGN);
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Crawl the static directory, then run the server until the accept loop
/// ends. Any error returned here is startup-fatal.
fn run(args: WordserveArgs) -> Result<()> {
    if !args.static_dir.is_dir() {
        return Err(WordserveError::invalid_argument(format!(
            "{} isn't a readable directory",
            args.static_dir.display()
        )));
    }

    let tokenizer = AlphaTokenizer::new()?;
    let mut index = WordIndex::new();
    let files_indexed = crawl_tree(&args.static_dir, &tokenizer, &mut index)?;
    log::info!(
        "indexed {files_indexed} files, {} unique words",
        index.num_words()
    );

    let server = HttpServer::new(
        args.port,
        args.static_dir.clone(),
        args.threads,
        Arc::new(index),
    );
    server.run()
}
