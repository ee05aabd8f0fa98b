//! The session loop: ask for a run, execute it, report, ask again.

use std::io::Write;

use anyhow::Result;
use apigrab_core::{ConfigSource, FetchEngine, SessionState};
use tracing::{debug, warn};

use crate::output::{self, ProgressReporter};

/// Runs until the source has no more configurations or the operator
/// declines another run. Returns the number of runs that completed.
///
/// A run that cannot start (e.g. the save directory cannot be created) is
/// reported and the session continues with the "run again?" question.
pub(crate) async fn run_session(
    source: &mut dyn ConfigSource,
    engine: &FetchEngine,
    state: &mut SessionState,
    show_progress: bool,
    out: &mut impl Write,
) -> Result<usize> {
    let mut completed_runs = 0;

    loop {
        let Some(config) = source.next_run(state)? else {
            debug!("no further run configuration");
            break;
        };

        writeln!(out, "Save directory: {}", config.save_dir().display())?;
        let mut reporter = ProgressReporter::new(config.count(), show_progress);
        let result = engine.run(&config, &mut reporter).await;
        reporter.finish();

        match result {
            Ok(report) => {
                output::print_summary(out, &report, config.save_dir())?;
                state.remember_save_dir(config.save_dir());
                completed_runs += 1;
            }
            Err(error) => {
                warn!(error = %error, "run could not start");
                writeln!(out)?;
                writeln!(out, "An error occurred: {error}")?;
            }
        }

        if !source.run_again()? {
            break;
        }
    }

    Ok(completed_runs)
}
