use thiserror::Error;

use crate::util::env::{Env, EnvErr};

mod constants;
mod export;
mod helix;
mod runner;
mod util;

#[derive(Debug, Error)]
enum RunnerErr {
    #[error(transparent)]
    Env(#[from] EnvErr),

    #[error(transparent)]
    Std(#[from] Box<dyn std::error::Error>),
}

type Result<T> = core::result::Result<T, RunnerErr>;

#[tokio::main]
async fn main() -> Result<()> {
    util::tracing::build_subscriber()?;

    // fail fast on missing credentials rather than sending empty ones upstream
    let env = Env::init()?;

    tracing::info!("starting stream census scheduler");
    runner::run_forever(&env).await;

    Ok(())
}
