use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::time::{Instant, interval};
use tracing::instrument;

use crate::constants::{RUN_CADENCE, SCHEDULE_POLL};
use crate::export::{self, ExportErr};
use crate::helix::{FetchErr, Helix};
use crate::util::env::Env;

#[instrument(skip(env))]
/// One full pipeline run: categories, then streams, then the CSV export.
pub async fn run_once(env: &Env) -> RunResult<PathBuf> {
    snapshot(&Helix::new(env), Path::new(&env.output_dir)).await
}

/// Inner pipeline taking the client and output dir explicitly so tests can
/// inject a mock server and a scratch directory.
pub async fn snapshot(helix: &Helix, out_dir: &Path) -> RunResult<PathBuf> {
    let categories = helix.fetch_top_categories().await?;
    let streams = helix.fetch_top_streams(&categories).await?;
    let path = export::export(streams, out_dir)?;

    Ok(path)
}

/// Blocks forever, firing `run_once` on a fixed hourly cadence. The schedule
/// is polled once a second; the first run fires one cadence after startup.
///
/// A failed run is logged and the loop keeps scheduling. Only external
/// termination stops this.
pub async fn run_forever(env: &Env) {
    let mut next_run = Instant::now() + RUN_CADENCE;
    let mut poll = interval(SCHEDULE_POLL);

    loop {
        poll.tick().await;
        if Instant::now() < next_run {
            continue;
        }
        next_run = Instant::now() + RUN_CADENCE;

        match run_once(env).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), "census run complete");
            }
            Err(e) => {
                tracing::error!(error = %e, "census run failed, awaiting next cycle");
            }
        }
    }
}

pub type RunResult<T> = core::result::Result<T, RunErr>;

#[derive(Debug, Error)]
pub enum RunErr {
    #[error(transparent)]
    Fetch(#[from] FetchErr),

    #[error(transparent)]
    Export(#[from] ExportErr),
}
