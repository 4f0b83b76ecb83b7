use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::constants::{HELIX_URN_STREAMS, PAGE_SIZE, RATELIMIT_COOLDOWN, RATELIMIT_FLOOR};
use crate::helix::categories::Category;
use crate::helix::{FetchErr, FetchResult, Helix, HelixDataResponse, auth_headers};

/// The canonical projection of a live stream, in export column order.
///
/// String fields default to empty when the upstream row omits them; a missing
/// `viewer_count` becomes an empty cell. Anything else the upstream sends
/// (thumbnail URL, tag ids, ...) is dropped here during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StreamRecord {
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub viewer_count: Option<u64>,
}

/// Per-category stream lists keyed by category name, in fetch order. A vec of
/// pairs rather than a map so the exporter can preserve that order.
pub type StreamsByCategory = Vec<(String, Vec<StreamRecord>)>;

/// Local-clock backoff driven by the upstream's self-reported remaining-quota
/// header. Correct only while request issuance stays serialized; a concurrent
/// fetcher would need a real token bucket instead.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitGuard {
    pub ignore_limit: bool,
}

impl RateLimitGuard {
    #[instrument(skip(self))]
    /// Pauses for the fixed cooldown when the reported remaining quota has hit
    /// the floor, unless the override is set. A response without a readable
    /// quota header is let through with a warning.
    pub async fn pause_if_needed(&self, remaining: Option<u32>) -> Option<u32> {
        let Some(remaining) = remaining else {
            tracing::warn!("response carried no readable rate-limit header, continuing");
            return None;
        };

        if remaining <= RATELIMIT_FLOOR {
            if self.ignore_limit {
                tracing::warn!(remaining, "quota exhausted but override set, skipping cooldown");
                return Some(remaining);
            }

            tracing::info!(
                remaining,
                cooldown_secs = RATELIMIT_COOLDOWN.as_secs(),
                "rate limit nearly exhausted, cooling down"
            );
            tokio::time::sleep(RATELIMIT_COOLDOWN).await;
            tracing::info!("cooldown complete");
        }

        Some(remaining)
    }
}

impl Helix {
    #[instrument(skip(self, categories), fields(category_count = categories.len()))]
    /// Fetches up to 100 live streams for every category, strictly one request
    /// at a time so the rate-limit guard sees each response's quota header
    /// before the next request goes out. One fresh token covers the batch.
    ///
    /// Any single category failing aborts the whole batch with the category's
    /// name attached; a partial result is never returned.
    pub async fn fetch_top_streams(
        &self,
        categories: &[Category],
    ) -> FetchResult<StreamsByCategory> {
        let token = self.obtain_token().await?;
        let headers = auth_headers(&self.client_id, &token)?;
        let guard = RateLimitGuard {
            ignore_limit: self.ignore_rate_limit,
        };

        let mut streams: StreamsByCategory = Vec::with_capacity(categories.len());
        for category in categories {
            let uri = format!(
                "{}/{}?first={}&game_id={}",
                self.helix_base, HELIX_URN_STREAMS, PAGE_SIZE, category.id
            );

            let (body, remaining) = self
                .get_json::<HelixDataResponse<StreamRecord>>(
                    HELIX_URN_STREAMS,
                    uri,
                    headers.clone(),
                )
                .await
                .map_err(|e| FetchErr::Category {
                    name: category.name.clone(),
                    source: Box::new(e),
                })?;

            guard.pause_if_needed(remaining).await;

            tracing::debug!(
                category = category.name,
                stream_count = body.data.len(),
                "fetched streams for category"
            );
            streams.push((category.name.clone(), body.data));
        }

        Ok(streams)
    }
}
