//! Terminal output: banner, per-request progress and run summaries.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use apigrab_core::{AttemptOutcome, FailureKind, RunConfig, RunObserver, RunReport};
use indicatif::{ProgressBar, ProgressStyle};

const RULE_WIDTH: usize = 60;

/// Prints the start-up banner.
pub(crate) fn print_banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "apigrab v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "  Formats: images, video, audio and text")?;
    writeln!(out, "  Content type detected automatically per response")?;
    writeln!(out, "  Batch downloads from one endpoint, run after run")?;
    writeln!(out, "  Built-in pacing between requests")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// Prints the closing message.
pub(crate) fn print_farewell(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Thanks for using apigrab!")
}

/// Prints the statistics of a finished run.
pub(crate) fn print_summary(
    out: &mut impl Write,
    report: &RunReport,
    save_dir: &Path,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "Run summary:")?;
    writeln!(out, "  Succeeded: {}", report.successes())?;
    writeln!(out, "  Failed:    {}", report.failures())?;
    writeln!(out, "  Saved to:  {}", save_dir.display())?;
    if !report.files().is_empty() {
        writeln!(out, "  Files:     {} written", report.files().len())?;
    }
    Ok(())
}

/// One-line description of an iteration outcome.
pub(crate) fn describe_outcome(outcome: &AttemptOutcome) -> String {
    match outcome {
        AttemptOutcome::Saved { filename } => format!("ok - {filename}"),
        AttemptOutcome::SaveFailed { message } => format!("save failed: {message}"),
        AttemptOutcome::HttpStatus { status } => format!("request failed (HTTP {status})"),
        AttemptOutcome::Failed { kind, message } => match kind {
            FailureKind::Timeout => "timed out".to_string(),
            FailureKind::Connect => "connection error".to_string(),
            FailureKind::Network => format!("network error: {message}"),
            FailureKind::Unexpected => format!("unexpected error: {message}"),
        },
    }
}

/// Status text shown while the loop waits between requests.
pub(crate) fn describe_pause(delay: Duration) -> String {
    format!("waiting {:.1}s", delay.as_secs_f64())
}

/// Progress bar plus one line per finished request.
pub(crate) struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub(crate) fn new(total: u16, enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::new(u64::from(total));
            bar.set_style(
                ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_bar} {elapsed} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl RunObserver for ProgressReporter {
    fn on_run_start(&mut self, config: &RunConfig) {
        self.bar.suspend(|| {
            println!("Fetching {} ({} requests)", config.url(), config.count());
            println!("{}", "=".repeat(50));
        });
    }

    fn on_attempt_start(&mut self, _index: usize, _total: usize) {
        self.bar.set_message("");
    }

    fn on_attempt_finish(&mut self, index: usize, total: usize, outcome: &AttemptOutcome) {
        let line = format!("[{index}/{total}] {}", describe_outcome(outcome));
        self.bar.suspend(|| println!("{line}"));
        self.bar.inc(1);
    }

    fn on_pause(&mut self, _index: usize, delay: Duration) {
        self.bar.set_message(describe_pause(delay));
    }
}
