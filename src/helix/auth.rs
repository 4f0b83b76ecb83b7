use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::constants::OAUTH_TOKEN_ROUTE;
use crate::helix::Helix;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

impl Helix {
    #[instrument(skip(self))]
    /// Exchanges the client credentials for a short-lived app access token.
    ///
    /// Expiry is not tracked; callers request a fresh token at the start of
    /// every fetching stage instead of refreshing proactively.
    pub async fn obtain_token(&self) -> AuthResult<String> {
        let uri = format!("{}{}", self.oauth_base, OAUTH_TOKEN_ROUTE);
        let res = self
            .client
            .post(uri)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            let code = res.status();
            tracing::error!(code = %code, "token exchange rejected");
            return Err(AuthErr::TokenExchange(code));
        }

        let body = res.json::<TokenResponse>().await?;
        if body.access_token.is_empty() {
            return Err(AuthErr::MissingToken);
        }

        tracing::debug!("obtained fresh app access token");
        Ok(body.access_token)
    }
}

pub type AuthResult<T> = core::result::Result<T, AuthErr>;

#[derive(Debug, Error)]
pub enum AuthErr {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("token exchange returned {0}")]
    TokenExchange(StatusCode),

    #[error("token response lacked a usable access_token field")]
    MissingToken,
}
