// Roster domain: players, teams, and draft sessions, plus the assembly
// logic that merges upstream records into display-ready models.

pub mod draft;
pub mod player;
pub mod team;

pub use draft::{assemble_draft, draft_year_links, DraftPick, DraftSession, Rookie};
pub use player::{Player, Position, PositionGroups};
pub use team::{assemble_team, Team};
