use thiserror::Error;

use crate::constants::DEFAULT_OUTPUT_DIR;

/// Process configuration, read once at startup and passed by reference into every
/// stage. Credentials never live in a global; fakes can be constructed directly
/// in tests.
#[derive(Debug, Clone)]
pub struct Env {
    pub client_id: String,
    pub client_secret: String,
    pub ignore_rate_limit: bool,
    pub output_dir: String,
}

impl Env {
    pub fn init() -> EnvResult<Self> {
        Ok(Self {
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            ignore_rate_limit: truthy("IGNORE_RATE_LIMIT"),
            output_dir: dotenvy::var("OUTPUT_DIR")
                .unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string()),
        })
    }
}

/// Fetches a variable that must be present and non-blank.
pub fn required(key: &'static str) -> EnvResult<String> {
    let val = dotenvy::var(key).map_err(|_| EnvErr::Missing(key))?;
    if val.trim().is_empty() {
        return Err(EnvErr::Blank(key));
    }

    Ok(val)
}

fn truthy(key: &str) -> bool {
    matches!(
        dotenvy::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

pub type EnvResult<T> = core::result::Result<T, EnvErr>;

#[derive(Debug, Error)]
pub enum EnvErr {
    #[error("required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("required environment variable '{0}' is blank")]
    Blank(&'static str),
}
