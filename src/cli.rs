//! Command line argument parsing for the wordserve binary using clap.

use std::path::PathBuf;

use clap::Parser;

/// Wordserve - crawl a directory tree and serve ranked word search over HTTP
#[derive(Parser, Debug, Clone)]
#[command(name = "wordserve")]
#[command(about = "Crawl a directory tree and serve ranked word search over HTTP")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct WordserveArgs {
    /// Port to listen on
    #[arg(value_name = "PORT")]
    pub port: u16,

    /// Directory of static files to crawl and serve
    #[arg(value_name = "STATIC_DIR")]
    pub static_dir: PathBuf,

    /// Number of worker threads
    #[arg(short = 't', long = "threads", default_value_t = num_cpus::get())]
    pub threads: usize,

    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,
}

impl WordserveArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}
