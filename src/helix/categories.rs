use serde::Deserialize;
use tracing::instrument;

use crate::constants::{HELIX_URN_TOP_GAMES, PAGE_SIZE};
use crate::helix::{FetchResult, Helix, HelixDataResponse, auth_headers};

/// A content category ("game" in Helix terms), ranked by current viewership.
/// Extra upstream fields like box art are dropped during deserialization.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Helix {
    #[instrument(skip(self))]
    /// Fetches the current top categories in upstream ranking order, at most
    /// one page (100 entries). Obtains its own fresh token.
    pub async fn fetch_top_categories(&self) -> FetchResult<Vec<Category>> {
        let token = self.obtain_token().await?;
        let headers = auth_headers(&self.client_id, &token)?;

        let uri = format!("{}/{}?first={}", self.helix_base, HELIX_URN_TOP_GAMES, PAGE_SIZE);
        let (body, _) = self
            .get_json::<HelixDataResponse<Category>>(HELIX_URN_TOP_GAMES, uri, headers)
            .await?;

        tracing::info!(category_count = body.data.len(), "fetched top categories");
        Ok(body.data)
    }
}
