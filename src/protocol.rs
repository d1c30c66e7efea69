// Channel event types and view-facing display snapshots.
//
// The view layer (out of scope here) consumes these snapshots verbatim;
// all display strings, including the absent-field defaults, live in this
// module so the core stays free of rendering concerns.

use chrono::DateTime;

use crate::eval::grade::GradeReport;
use crate::roster::draft::DraftSession;
use crate::roster::player::Player;
use crate::roster::team::Team;

// ---------------------------------------------------------------------------
// Channel events
// ---------------------------------------------------------------------------

/// Result of a background review fetch, tagged with the inspection
/// generation that spawned it so stale arrivals can be discarded.
#[derive(Debug, Clone)]
pub enum ReviewEvent {
    Fetched {
        player_id: String,
        review: String,
        generation: u64,
    },
    Failed {
        player_id: String,
        message: String,
        generation: u64,
    },
}

impl ReviewEvent {
    pub fn generation(&self) -> u64 {
        match self {
            ReviewEvent::Fetched { generation, .. } => *generation,
            ReviewEvent::Failed { generation, .. } => *generation,
        }
    }

    pub fn player_id(&self) -> &str {
        match self {
            ReviewEvent::Fetched { player_id, .. } => player_id,
            ReviewEvent::Failed { player_id, .. } => player_id,
        }
    }
}

/// Result of a background page load (team or draft), tagged with the page
/// generation that spawned it.
#[derive(Debug, Clone)]
pub enum PageEvent {
    TeamReady {
        team: Team,
        report: GradeReport,
        generation: u64,
    },
    DraftReady {
        session: DraftSession,
        generation: u64,
    },
    PageFailed {
        message: String,
        generation: u64,
    },
}

impl PageEvent {
    pub fn generation(&self) -> u64 {
        match self {
            PageEvent::TeamReady { generation, .. } => *generation,
            PageEvent::DraftReady { generation, .. } => *generation,
            PageEvent::PageFailed { generation, .. } => *generation,
        }
    }
}

// ---------------------------------------------------------------------------
// Display snapshots
// ---------------------------------------------------------------------------

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "N/A".to_string(),
    }
}

/// The single-player inspection card: identity, biographical fields (with
/// "N/A"/"Unknown" defaults), grade, and the review slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCard {
    pub name: String,
    pub position: String,
    pub team: String,
    pub college: String,
    pub height: String,
    pub weight: String,
    pub age: String,
    pub years_exp: String,
    pub status: String,
    pub injury_status: String,
    pub grade: String,
}

impl PlayerCard {
    pub fn from_player(player: &Player) -> Self {
        PlayerCard {
            name: player.full_name(),
            position: or_na(Some(player.position.as_str())),
            team: player
                .team
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            college: or_na(player.college.as_deref()),
            height: or_na(player.height.as_deref()),
            weight: or_na(player.weight.as_deref()),
            age: player
                .age
                .map(|a| a.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            years_exp: player
                .years_exp
                .map(|y| y.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            status: or_na(player.status.as_deref()),
            injury_status: or_na(player.injury_status.as_deref()),
            grade: player
                .grade
                .map(|g| format!("{g:.2}"))
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// The team page model: header, grade line, grouped roster, future pick
/// entitlements, and recent transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSnapshot {
    pub header: String,
    pub grade_line: String,
    pub roster_lines: Vec<String>,
    pub pick_lines: Vec<String>,
    pub transaction_lines: Vec<String>,
}

impl TeamSnapshot {
    pub fn from_team(team: &Team, report: &GradeReport) -> Self {
        let header = format!("{} (Owner: {})", team.name, team.owner_name);

        let grade_line = if report.ungraded > 0 && report.graded > 0 {
            format!(
                "Team Grade: {} ({} ungraded)",
                report.team_grade_display(),
                report.ungraded
            )
        } else {
            format!("Team Grade: {}", report.team_grade_display())
        };

        let mut roster_lines = Vec::new();
        for (position, players) in team.position_groups().iter() {
            for player in players {
                let grade = player
                    .grade
                    .map(|g| format!(" [{g:.2}]"))
                    .unwrap_or_default();
                roster_lines.push(format!("{position}: {}{grade}", player.full_name()));
            }
        }

        let pick_lines = team
            .pick_entitlements
            .iter()
            .map(|pick| {
                let number = pick
                    .pick_number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "?".to_string());
                format!("{} Round {}, Pick {}", pick.season, pick.round, number)
            })
            .collect();

        let transaction_lines = team
            .transactions
            .iter()
            .map(|tx| {
                let date = tx
                    .status_updated
                    .and_then(DateTime::from_timestamp_millis)
                    .map(|dt| dt.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                format!("{} - {}", tx.kind, date)
            })
            .collect();

        TeamSnapshot {
            header,
            grade_line,
            roster_lines,
            pick_lines,
            transaction_lines,
        }
    }
}

/// The draft page model. `pick_lines` holds the no-picks message when the
/// draft has zero recorded picks, never an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub header: String,
    pub pick_lines: Vec<String>,
    pub rookie_lines: Vec<String>,
}

pub const NO_PICKS_MESSAGE: &str = "No picks found for this draft.";

impl DraftSnapshot {
    pub fn from_session(session: &DraftSession) -> Self {
        let header = format!("Draft - {}", session.year);

        let pick_lines: Vec<String> = if session.picks.is_empty() {
            vec![NO_PICKS_MESSAGE.to_string()]
        } else {
            session
                .picks
                .iter()
                .map(|pick| {
                    let who = pick
                        .player
                        .as_ref()
                        .map(Player::full_name)
                        .unwrap_or_else(|| "No Pick Yet".to_string());
                    format!("Round {}, Pick {}: {}", pick.round, pick.pick_no, who)
                })
                .collect()
        };

        let rookie_lines = session
            .rookies
            .iter()
            .map(|rookie| {
                let grade = rookie
                    .grade
                    .map(|g| format!("{g:.2}"))
                    .unwrap_or_else(|| "N/A".to_string());
                format!("{} - {}", rookie.name, grade)
            })
            .collect();

        DraftSnapshot {
            header,
            pick_lines,
            rookie_lines,
        }
    }
}
