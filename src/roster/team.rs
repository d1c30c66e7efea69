// Team assembly: merge roster, owner, and transaction records into a
// display-ready team model.

use tracing::{debug, info};

use crate::api::types::{PickEntitlement, TransactionRecord, UserRecord};
use crate::api::LeagueApi;
use crate::error::EngineError;
use crate::roster::player::{Player, PositionGroups};

/// A fully assembled team: owner identity, resolved display name, roster in
/// arrival order, and the extras the team page shows (future pick
/// entitlements, recent transactions).
///
/// Rebuilt fresh on every page visit; `team_grade` stays `None` until a
/// grade batch completes.
#[derive(Debug, Clone)]
pub struct Team {
    pub owner_id: String,
    pub roster_id: i64,
    /// Display name, resolved through the fallback chain:
    /// team metadata name -> owner display name -> "Team {owner_id}".
    pub name: String,
    pub owner_name: String,
    pub players: Vec<Player>,
    pub team_grade: Option<f64>,
    /// Players whose grade request failed in the last batch.
    pub ungraded: usize,
    pub pick_entitlements: Vec<PickEntitlement>,
    /// League transactions involving this roster, upstream order.
    pub transactions: Vec<TransactionRecord>,
}

impl Team {
    /// Roster partitioned by recognized position.
    pub fn position_groups(&self) -> PositionGroups {
        PositionGroups::from_players(&self.players)
    }
}

/// Resolve the display name for a roster owner.
///
/// A missing user row is a data gap, not an error: the name falls back to a
/// synthesized "Team {owner_id}" rather than failing the page.
pub fn resolve_team_name(owner_id: &str, owner: Option<&UserRecord>) -> (String, String) {
    let owner_name = owner
        .and_then(|u| u.display_name.clone())
        .unwrap_or_else(|| format!("Unknown Owner (ID: {owner_id})"));

    let team_name = owner
        .and_then(|u| u.metadata.team_name.clone())
        .or_else(|| owner.and_then(|u| u.display_name.clone()))
        .unwrap_or_else(|| format!("Team {owner_id}"));

    (team_name, owner_name)
}

/// Assemble a team from upstream data.
///
/// Fails with `NotFound` when the owner id matches no roster entry and with
/// `FetchFailed` when any upstream call errors. Both are terminal for the
/// current render; no partial team is ever returned.
pub async fn assemble_team(
    api: &dyn LeagueApi,
    league_id: &str,
    owner_id: &str,
) -> Result<Team, EngineError> {
    let rosters = api.rosters(league_id).await?;
    let roster = rosters
        .into_iter()
        .find(|r| r.owner_id == owner_id)
        .ok_or_else(|| EngineError::team_not_found(owner_id))?;

    let users = api.users(league_id).await?;
    let owner = users.iter().find(|u| u.user_id == owner_id);
    let (name, owner_name) = resolve_team_name(owner_id, owner);

    let transactions: Vec<TransactionRecord> = api
        .transactions(league_id)
        .await?
        .into_iter()
        .filter(|tx| tx.roster_ids.contains(&roster.roster_id))
        .collect();

    debug!(
        owner_id,
        roster_id = roster.roster_id,
        players = roster.player_details.len(),
        transactions = transactions.len(),
        "team assembled"
    );
    info!(team = %name, "loaded team");

    Ok(Team {
        owner_id: roster.owner_id,
        roster_id: roster.roster_id,
        name,
        owner_name,
        players: roster.player_details,
        team_grade: None,
        ungraded: 0,
        pick_entitlements: roster.draft_picks,
        transactions,
    })
}
