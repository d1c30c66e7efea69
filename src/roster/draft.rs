// Draft session assembly: picks by year, plus the rookie pool for the
// current year.

use tracing::{debug, info};

use crate::api::types::RookieRecord;
use crate::api::LeagueApi;
use crate::error::EngineError;
use crate::roster::player::Player;

/// One pick slot in a draft. `player` is `None` for slots that have not
/// been made yet.
#[derive(Debug, Clone)]
pub struct DraftPick {
    pub round: u32,
    pub pick_no: u32,
    pub player: Option<Player>,
}

/// An undrafted rookie candidate. Rookies arrive with a single display
/// name, no team, and sometimes a pre-computed grade.
#[derive(Debug, Clone)]
pub struct Rookie {
    pub name: String,
    pub position: Option<String>,
    pub grade: Option<f64>,
}

impl Rookie {
    /// A Player-shaped view of the rookie so the single-player inspection
    /// view can open it like any rostered player. Rookie names are not
    /// split upstream, so the full name lands in `first_name`.
    pub fn as_player(&self) -> Player {
        Player {
            player_id: format!("rookie:{}", self.name),
            first_name: self.name.clone(),
            last_name: String::new(),
            position: self.position.clone().unwrap_or_default(),
            team: None,
            college: None,
            height: None,
            weight: None,
            age: None,
            years_exp: Some(0),
            status: None,
            injury_status: None,
            avatar: None,
            grade: self.grade,
            review: None,
        }
    }
}

impl From<RookieRecord> for Rookie {
    fn from(record: RookieRecord) -> Self {
        Rookie {
            name: record.name,
            position: record.position,
            grade: record.grade,
        }
    }
}

/// A single year's draft: the ordered pick sequence and, for the current
/// calendar year only, the undrafted rookie pool.
#[derive(Debug, Clone)]
pub struct DraftSession {
    pub year: i32,
    pub draft_id: String,
    pub picks: Vec<DraftPick>,
    pub rookies: Vec<Rookie>,
}

/// Assemble the draft session for `year`.
///
/// A year with no draft on record fails with `NotFound` ("Draft for year
/// {Y} not found"). The rookie pool is fetched only when `year` equals
/// `current_year`.
pub async fn assemble_draft(
    api: &dyn LeagueApi,
    league_id: &str,
    year: i32,
    current_year: i32,
) -> Result<DraftSession, EngineError> {
    let draft = api.draft_for_year(league_id, year).await.map_err(|e| match e {
        // Rewrite the generic 404 into the year-specific message the page shows.
        EngineError::NotFound(_) => EngineError::draft_not_found(year),
        other => other,
    })?;

    let picks: Vec<DraftPick> = api
        .draft_picks(&draft.draft_id)
        .await?
        .into_iter()
        .map(|record| DraftPick {
            round: record.round,
            pick_no: record.pick_no,
            player: record.metadata,
        })
        .collect();

    let rookies: Vec<Rookie> = if year == current_year {
        api.rookies().await?.into_iter().map(Rookie::from).collect()
    } else {
        Vec::new()
    };

    debug!(
        year,
        draft_id = %draft.draft_id,
        picks = picks.len(),
        rookies = rookies.len(),
        "draft assembled"
    );
    info!(year, "loaded draft");

    Ok(DraftSession {
        year,
        draft_id: draft.draft_id,
        picks,
        rookies,
    })
}

/// The draft-year navigation list: the current year down through
/// `origin_year` inclusive, descending. The origin year is the league's
/// first draft and stays reachable.
pub fn draft_year_links(current_year: i32, origin_year: i32) -> Vec<i32> {
    if current_year < origin_year {
        return Vec::new();
    }
    (origin_year..=current_year).rev().collect()
}
