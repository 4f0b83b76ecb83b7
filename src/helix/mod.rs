use http::header::{AUTHORIZATION, InvalidHeaderValue};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::constants::{
    API_HELIX_URL, API_OAUTH_URL, RATELIMIT_LIMIT_HEADER, RATELIMIT_REMAINING_HEADER,
};
use crate::helix::auth::AuthErr;
use crate::util::env::Env;

pub mod auth;
pub mod categories;
pub mod streams;

#[cfg(test)]
pub mod mock;

/// Client for the Helix endpoints this job touches.
///
/// Tokens are deliberately not cached on this struct: each fetching stage
/// performs its own client-credentials exchange so a run never starts with a
/// stale token.
#[derive(Debug, Clone)]
pub struct Helix {
    pub(crate) client: reqwest::Client,
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) ignore_rate_limit: bool,
    pub(crate) oauth_base: String,
    pub(crate) helix_base: String,
}

impl Helix {
    pub fn new(env: &Env) -> Self {
        Self::with_endpoints(env, API_OAUTH_URL, API_HELIX_URL)
    }

    /// Constructs a client against explicit endpoint bases so tests can point
    /// it at a local mock server.
    pub fn with_endpoints(env: &Env, oauth_base: &str, helix_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: env.client_id.clone(),
            client_secret: env.client_secret.clone(),
            ignore_rate_limit: env.ignore_rate_limit,
            oauth_base: oauth_base.to_string(),
            helix_base: helix_base.to_string(),
        }
    }

    #[instrument(skip(self, headers))]
    /// Performs a GET request against a Helix endpoint and parses a success
    /// body into `T`, returning the response's remaining-quota count alongside.
    ///
    /// A non-success response is checked for an upstream error body so the
    /// detail ends up in the logs rather than being swallowed.
    pub(crate) async fn get_json<T>(
        &self,
        endpoint: &'static str,
        uri: String,
        headers: HeaderMap,
    ) -> FetchResult<(T, Option<u32>)>
    where
        T: DeserializeOwned,
    {
        let res = self.client.get(&uri).headers(headers).send().await?;

        if !res.status().is_success() {
            let code = res.status();
            tracing::error!(endpoint, code = %code, "non-success response");

            if let Ok(reason) = res.json::<Value>().await {
                tracing::error!(body = ?reason, "error message in response");
                return Err(FetchErr::StatusWithBody {
                    endpoint,
                    code,
                    body: reason,
                });
            }

            return Err(FetchErr::Status { endpoint, code });
        }

        let remaining = ratelimit_remaining(res.headers());
        if let Some(available) = remaining
            && let Some(total) = res.headers().get(RATELIMIT_LIMIT_HEADER)
        {
            tracing::debug!(ratelimit_available = available, ratelimit_total = ?total, "rate-limit bucket");
        }

        let body = res.json::<T>().await?;
        Ok((body, remaining))
    }
}

/// Parses the self-reported remaining-quota header, if present and well-formed.
pub(crate) fn ratelimit_remaining(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(RATELIMIT_REMAINING_HEADER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Builds the `Client-Id` + bearer `Authorization` header pair every Helix
/// request carries.
pub(crate) fn auth_headers(client_id: &str, token: &str) -> FetchResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
    headers.insert("Client-Id", HeaderValue::from_str(client_id)?);

    Ok(headers)
}

/// Envelope every Helix list endpoint wraps its payload in.
#[derive(Debug, Clone, Deserialize)]
pub struct HelixDataResponse<T> {
    pub data: Vec<T>,
}

pub type FetchResult<T> = core::result::Result<T, FetchErr>;

#[derive(Debug, Error)]
pub enum FetchErr {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("while obtaining an access token: {0}")]
    Auth(#[from] AuthErr),

    #[error("while creating a HeaderValue ({0})")]
    Header(#[from] InvalidHeaderValue),

    #[error("error response from {endpoint}: {code}")]
    Status {
        endpoint: &'static str,
        code: StatusCode,
    },

    #[error("error response (with detail) from {endpoint}: {code}: {:#?}", body)]
    StatusWithBody {
        endpoint: &'static str,
        code: StatusCode,
        body: Value,
    },

    #[error("while fetching streams for category '{name}': {source}")]
    Category {
        name: String,
        #[source]
        source: Box<FetchErr>,
    },
}
