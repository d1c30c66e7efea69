// Engine-level error taxonomy.
//
// Every upstream failure is converted into one of these variants at the
// point of call and surfaces as page-local error state; nothing here is
// allowed to crash a page render.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// The requested entity is absent from upstream data. The message names
    /// the entity so the page can display it verbatim.
    #[error("{0} not found")]
    NotFound(String),

    /// Upstream was unreachable or returned a non-success response.
    #[error("upstream request failed: {0}")]
    FetchFailed(String),

    /// Some (but not all) evaluation requests in a batch failed. The page
    /// still renders the graded players; this only annotates the gap.
    #[error("{failed} of {total} evaluation requests failed")]
    PartialEvaluationFailure { failed: usize, total: usize },
}

impl EngineError {
    /// A team id that matched no roster entry.
    pub fn team_not_found(owner_id: &str) -> Self {
        EngineError::NotFound(format!("Team {owner_id}"))
    }

    /// A draft year with no draft on record.
    pub fn draft_not_found(year: i32) -> Self {
        EngineError::NotFound(format!("Draft for year {year}"))
    }

    /// The text a page shows for this error. NotFound names the missing
    /// entity; everything else gets the generic retry-later message.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::NotFound(entity) => format!("{entity} not found."),
            EngineError::FetchFailed(_) => {
                "Failed to load data. Please try again later.".to_string()
            }
            EngineError::PartialEvaluationFailure { failed, total } => {
                format!("{failed} of {total} players could not be graded.")
            }
        }
    }
}
