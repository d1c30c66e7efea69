// Player identity, positions, and position grouping.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Football positions recognized by the roster views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles Sleeper-style abbreviations: "QB", "RB", "WR", "TE", "K".
    /// Anything else (IDP slots, "DEF", empty strings) returns `None` and
    /// the player is dropped from grouped views.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" => Some(Position::Kicker),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
        }
    }

    /// Deterministic ordering index for grouped roster display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::TightEnd => 3,
            Position::Kicker => 4,
        }
    }

    /// All recognized positions in display order.
    pub fn all() -> [Position; 5] {
        [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::Kicker,
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A single player as delivered by the league data provider, plus the two
/// client-side derived fields (`grade`, `review`).
///
/// Upstream attributes are immutable once fetched; `grade` is attached by
/// the grade aggregator and `review` by the inspection flow. Neither is
/// ever sent back upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Stable upstream identifier. Cache keys use this, never the name.
    pub player_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Raw position string as reported upstream (e.g. "QB", "DEF").
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub years_exp: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Numeric evaluation score, assigned client-side by the grade
    /// aggregator. Absent until a batch completes.
    #[serde(default)]
    pub grade: Option<f64>,
    /// Narrative review text, assigned client-side via the review cache.
    #[serde(default)]
    pub review: Option<String>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// The parsed position, or `None` when upstream reports something
    /// outside the recognized set.
    pub fn parsed_position(&self) -> Option<Position> {
        Position::from_str_pos(&self.position)
    }
}

/// Roster players partitioned by recognized position.
///
/// Invariant: every player whose position parses appears in exactly one
/// group, in roster arrival order. Players with unrecognized positions are
/// dropped from grouped views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionGroups {
    groups: BTreeMap<Position, Vec<Player>>,
}

impl PositionGroups {
    /// Partition `players` by parsed position, preserving arrival order
    /// within each group.
    pub fn from_players(players: &[Player]) -> Self {
        let mut groups: BTreeMap<Position, Vec<Player>> = BTreeMap::new();
        for player in players {
            if let Some(pos) = player.parsed_position() {
                groups.entry(pos).or_default().push(player.clone());
            }
        }
        PositionGroups { groups }
    }

    /// Players at the given position, in arrival order.
    pub fn at(&self, pos: Position) -> &[Player] {
        self.groups.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// (position, players) pairs in display order, skipping empty groups.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &[Player])> {
        Position::all()
            .into_iter()
            .filter_map(move |pos| self.groups.get(&pos).map(|v| (pos, v.as_slice())))
    }

    /// Total players across all groups (excludes unrecognized positions).
    pub fn grouped_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
