// Page orchestration: which page is showing, and how background loads
// land on it.
//
// Navigation has no explicit cancellation. Every load is tagged with the
// page generation current when it was spawned; by the time a result
// arrives, the user may have navigated elsewhere, and stale results are
// discarded at apply time instead of being applied to a replaced page.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::LeagueApi;
use crate::eval::client::Evaluator;
use crate::eval::grade::{grade_roster, GradeReport};
use crate::protocol::PageEvent;
use crate::roster::draft::{assemble_draft, DraftSession};
use crate::roster::team::{assemble_team, Team};

/// What the current page is showing.
#[derive(Debug, Clone)]
pub enum PageState {
    Idle,
    Loading,
    Team { team: Team, report: GradeReport },
    Draft { session: DraftSession },
    Error { message: String },
}

/// Drives team/draft page loads against the upstream providers.
pub struct Browser {
    api: Arc<dyn LeagueApi>,
    eval: Arc<dyn Evaluator>,
    league_id: String,
    current_year: i32,
    /// Incremented on every navigation. Page events from earlier
    /// generations are stale and dropped in `handle_event`.
    generation: u64,
    tx: mpsc::Sender<PageEvent>,
    state: PageState,
}

impl Browser {
    pub fn new(
        api: Arc<dyn LeagueApi>,
        eval: Arc<dyn Evaluator>,
        league_id: &str,
        current_year: i32,
        tx: mpsc::Sender<PageEvent>,
    ) -> Self {
        Browser {
            api,
            eval,
            league_id: league_id.to_string(),
            current_year,
            generation: 0,
            tx,
            state: PageState::Idle,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Navigate to a team page. Assembly and grading run in the background;
    /// the page shows a loading state until the tagged result lands.
    ///
    /// Grading is best-effort and never blocks the page: a team with failed
    /// grade requests still renders, just ungraded.
    pub fn open_team(&mut self, owner_id: &str) {
        self.generation += 1;
        let generation = self.generation;
        self.state = PageState::Loading;
        info!(owner_id, "opening team page");

        let api = Arc::clone(&self.api);
        let eval = Arc::clone(&self.eval);
        let league_id = self.league_id.clone();
        let owner_id = owner_id.to_string();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let event = match assemble_team(&*api, &league_id, &owner_id).await {
                Ok(mut team) => {
                    let report = grade_roster(&*eval, &mut team.players).await;
                    team.team_grade = report.team_grade;
                    team.ungraded = report.ungraded;
                    if let Some(partial) = report.partial_failure() {
                        warn!(error = %partial, team = %team.name, "partial grade batch");
                    }
                    PageEvent::TeamReady {
                        team,
                        report,
                        generation,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "team page load failed");
                    PageEvent::PageFailed {
                        message: e.user_message(),
                        generation,
                    }
                }
            };
            let _ = tx.send(event).await;
        });
    }

    /// Navigate to a draft page for the given year.
    pub fn open_draft(&mut self, year: i32) {
        self.generation += 1;
        let generation = self.generation;
        self.state = PageState::Loading;
        info!(year, "opening draft page");

        let api = Arc::clone(&self.api);
        let league_id = self.league_id.clone();
        let current_year = self.current_year;
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let event = match assemble_draft(&*api, &league_id, year, current_year).await {
                Ok(session) => PageEvent::DraftReady {
                    session,
                    generation,
                },
                Err(e) => {
                    warn!(error = %e, year, "draft page load failed");
                    PageEvent::PageFailed {
                        message: e.user_message(),
                        generation,
                    }
                }
            };
            let _ = tx.send(event).await;
        });
    }

    /// Apply a load result to the page, unless the user has since
    /// navigated away (stale generation).
    pub fn handle_event(&mut self, event: PageEvent) {
        if event.generation() != self.generation {
            debug!(
                event_generation = event.generation(),
                current_generation = self.generation,
                "discarding stale page event"
            );
            return;
        }

        self.state = match event {
            PageEvent::TeamReady { team, report, .. } => PageState::Team { team, report },
            PageEvent::DraftReady { session, .. } => PageState::Draft { session },
            PageEvent::PageFailed { message, .. } => PageState::Error { message },
        };
    }
}
