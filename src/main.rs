//! CLI entry point for apigrab.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use apigrab_core::fetch::constants::REQUEST_TIMEOUT_SECS;
use apigrab_core::session::DefaultDirs;
use apigrab_core::{
    FetchEngine, FixedConfig, HttpClient, Prompter, RunConfig, SessionState, Throttle,
};
use clap::Parser;
use tracing::{debug, info};

mod app_config;
mod cli;
mod output;
mod shell;

use app_config::FileConfig;
use cli::Args;

const DEFAULT_HEADLESS_MEDIA_TYPE: &str = "bin";
const DEFAULT_HEADLESS_OUTPUT_DIR: &str = "downloads";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let loaded_config = app_config::load_default_file_config()?;
    let file_config = loaded_config.config_or_default();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config file > default (warn)
    let default_level = resolve_default_log_level(&args, &file_config);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, config_path = ?loaded_config.path, "CLI arguments parsed");

    let timeout = Duration::from_secs(
        args.timeout
            .or(file_config.timeout_secs)
            .unwrap_or(REQUEST_TIMEOUT_SECS),
    );

    // Pre-flight: the HTTP stack must be usable before anything is asked.
    if let Err(error) = HttpClient::with_timeout(timeout) {
        eprintln!("error: HTTP client is unavailable: {error}");
        return Ok(ExitCode::FAILURE);
    }

    let throttle = if args.no_throttle || file_config.throttle == Some(false) {
        debug!("request pacing disabled");
        Throttle::disabled()
    } else {
        Throttle::default()
    };
    let engine = FetchEngine::new(timeout, throttle);
    let mut state = SessionState::new();
    let show_progress = !args.quiet;

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            println!("Interrupted by user.");
            let _ = output::print_farewell(&mut io::stdout());
            std::process::exit(0);
        }
    });

    if let Some(url) = args.url.as_deref() {
        let config = headless_config(url, &args, &file_config)?;
        info!(url = %config.url(), count = config.count(), "headless run");
        let mut source = FixedConfig::new(config);
        shell::run_session(&mut source, &engine, &mut state, show_progress, &mut io::stdout())
            .await?;
        return Ok(ExitCode::SUCCESS);
    }

    output::print_banner(&mut io::stdout())?;

    let mut defaults = DefaultDirs::detect();
    if let Some(output_dir) = &file_config.output_dir {
        defaults = defaults.with_downloads(output_dir.clone());
    }
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout(), defaults);

    if let Err(error) =
        shell::run_session(&mut prompter, &engine, &mut state, show_progress, &mut io::stdout())
            .await
    {
        println!();
        println!("An error occurred: {error:#}");
    }

    output::print_farewell(&mut io::stdout())?;
    Ok(ExitCode::SUCCESS)
}

fn headless_config(url: &str, args: &Args, file_config: &FileConfig) -> Result<RunConfig> {
    let media_type = args
        .media_type
        .as_deref()
        .or(file_config.media_type.as_deref())
        .unwrap_or(DEFAULT_HEADLESS_MEDIA_TYPE);
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file_config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HEADLESS_OUTPUT_DIR));

    RunConfig::new(url, args.count.unwrap_or(1), media_type, output_dir)
        .context("Invalid run parameters")
}

fn resolve_default_log_level(args: &Args, file_config: &FileConfig) -> &'static str {
    if args.quiet {
        "error"
    } else if args.verbose > 0 {
        match args.verbose {
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    } else {
        file_config
            .verbosity
            .map_or("warn", app_config::VerbositySetting::log_level)
    }
}
