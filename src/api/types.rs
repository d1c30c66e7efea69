// Wire records for the league data provider (Sleeper-style JSON).
//
// Upstream payloads are sparse: almost every field can be absent or null,
// so optionals default rather than fail deserialization.

use serde::{Deserialize, Serialize};

use crate::roster::player::Player;

/// A league member as returned by the users endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: UserMetadata,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

/// A roster entry: one team's players plus future pick entitlements.
///
/// `player_details` is the server-enriched player list (the raw players
/// endpoint only carries ids).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRecord {
    pub roster_id: i64,
    pub owner_id: String,
    #[serde(default)]
    pub player_details: Vec<Player>,
    #[serde(default)]
    pub draft_picks: Vec<PickEntitlement>,
}

/// A future draft-pick entitlement held by a roster (not an executed pick).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickEntitlement {
    pub season: String,
    pub round: u32,
    #[serde(default)]
    pub pick_number: Option<u32>,
}

/// A league transaction (trade, waiver, free-agent move).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Millisecond epoch timestamp of the last status change.
    #[serde(default)]
    pub status_updated: Option<i64>,
    #[serde(default)]
    pub roster_ids: Vec<i64>,
}

/// The draft record for a given year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRecord {
    pub draft_id: String,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One executed (or still-open) pick slot in a draft.
///
/// `metadata` carries the drafted player; it is absent for slots that have
/// not been made yet ("No Pick Yet").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickRecord {
    pub round: u32,
    pub pick_no: u32,
    #[serde(default)]
    pub picked_by: Option<String>,
    #[serde(default)]
    pub metadata: Option<Player>,
}

/// An undrafted rookie candidate from the current-year pool.
///
/// Rookies arrive with a single display name and no team assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RookieRecord {
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub grade: Option<f64>,
}
