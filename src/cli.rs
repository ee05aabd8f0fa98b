//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Repeatedly fetch one API endpoint and save every response to disk.
///
/// Without --url the tool starts an interactive session that asks for the
/// endpoint, request count, media type and save directory. With --url it
/// performs a single run headlessly and exits.
#[derive(Parser, Debug)]
#[command(name = "apigrab")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Endpoint to fetch; runs once without prompting
    #[arg(short, long)]
    pub url: Option<String>,

    /// Number of requests for a headless run (1-1000)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub count: Option<u16>,

    /// Expected media type / extension hint for a headless run (e.g. jpg, mp3, json)
    #[arg(short, long)]
    pub media_type: Option<String>,

    /// Directory to save files into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Request timeout in seconds (1-3600)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Disable the delays between requests
    #[arg(long)]
    pub no_throttle: bool,
}
