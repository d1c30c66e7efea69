// League data provider port and its HTTP implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::types::{
    DraftRecord, PickRecord, RookieRecord, RosterRecord, TransactionRecord, UserRecord,
};
use crate::error::EngineError;

/// Read-only gateway to the league/roster/user/transaction/draft provider.
///
/// Implemented by `SleeperClient` in production and by in-memory fakes in
/// tests. All methods are pure reads; nothing here mutates upstream state.
#[async_trait]
pub trait LeagueApi: Send + Sync {
    /// All members of the league.
    async fn users(&self, league_id: &str) -> Result<Vec<UserRecord>, EngineError>;

    /// All rosters in the league, with enriched player details.
    async fn rosters(&self, league_id: &str) -> Result<Vec<RosterRecord>, EngineError>;

    /// Recent league transactions.
    async fn transactions(&self, league_id: &str) -> Result<Vec<TransactionRecord>, EngineError>;

    /// The draft record for the given year, if one exists.
    async fn draft_for_year(
        &self,
        league_id: &str,
        year: i32,
    ) -> Result<DraftRecord, EngineError>;

    /// All pick slots for a draft, in pick order.
    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<PickRecord>, EngineError>;

    /// The current-year undrafted rookie pool.
    async fn rookies(&self) -> Result<Vec<RookieRecord>, EngineError>;
}

/// Reqwest-backed `LeagueApi` speaking the Sleeper-style JSON API.
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
}

impl SleeperClient {
    /// Create a client against the given API base URL (no trailing slash).
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET `{base_url}{path}` and decode the JSON body.
    ///
    /// A 404 maps to `NotFound` (callers rewrite it into an entity-specific
    /// message); any other failure maps to `FetchFailed`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, EngineError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "league api request");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::FetchFailed(format!("GET {url}: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EngineError::NotFound(format!("resource at {path}")));
        }
        if !status.is_success() {
            return Err(EngineError::FetchFailed(format!(
                "GET {url}: status {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| EngineError::FetchFailed(format!("decode {url}: {e}")))
    }
}

#[async_trait]
impl LeagueApi for SleeperClient {
    async fn users(&self, league_id: &str) -> Result<Vec<UserRecord>, EngineError> {
        self.get_json(&format!("/league/{league_id}/users")).await
    }

    async fn rosters(&self, league_id: &str) -> Result<Vec<RosterRecord>, EngineError> {
        self.get_json(&format!("/league/{league_id}/rosters")).await
    }

    async fn transactions(&self, league_id: &str) -> Result<Vec<TransactionRecord>, EngineError> {
        self.get_json(&format!("/league/{league_id}/transactions"))
            .await
    }

    async fn draft_for_year(
        &self,
        league_id: &str,
        year: i32,
    ) -> Result<DraftRecord, EngineError> {
        self.get_json(&format!("/league/{league_id}/drafts/{year}"))
            .await
    }

    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<PickRecord>, EngineError> {
        self.get_json(&format!("/draft/{draft_id}/picks")).await
    }

    async fn rookies(&self) -> Result<Vec<RookieRecord>, EngineError> {
        self.get_json("/rookies").await
    }
}
