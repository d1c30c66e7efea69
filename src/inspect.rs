// Single-player inspection: the selection state machine.
//
// At most one player is ever open. Selecting a player surfaces its known
// attributes immediately and resolves the review through the cache first,
// falling back to a live fetch. Review fetches are tagged with a
// monotonically increasing generation; events from superseded selections
// are discarded at apply time rather than cancelled in flight.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::eval::cache::ReviewCache;
use crate::eval::client::{Evaluator, ReviewRequest};
use crate::protocol::ReviewEvent;
use crate::roster::player::Player;

/// Shown when a live review fetch fails. Never cached, never retried
/// automatically; a re-selection is the only retry path.
pub const REVIEW_FALLBACK: &str = "Could not fetch review. Please try again later.";

/// The inspection lifecycle.
#[derive(Debug, Clone)]
pub enum Inspection {
    /// No player selected.
    Closed,
    /// Player selected; review fetch in flight.
    Loading { player: Player },
    /// Review available (real text or the fallback placeholder).
    Ready { player: Player, review: String },
}

impl Inspection {
    pub fn is_open(&self) -> bool {
        !matches!(self, Inspection::Closed)
    }

    /// The currently open player, if any.
    pub fn player(&self) -> Option<&Player> {
        match self {
            Inspection::Closed => None,
            Inspection::Loading { player } => Some(player),
            Inspection::Ready { player, .. } => Some(player),
        }
    }
}

/// Drives the selection/inspection lifecycle for one view.
///
/// The cache is an explicit dependency handed in at construction, never
/// ambient global state; tests get isolation by passing an `:memory:` cache.
pub struct Inspector {
    state: Inspection,
    /// Incremented on every `select` and `close`. Events from earlier
    /// generations are stale and dropped in `handle_event`.
    generation: u64,
    cache: Arc<ReviewCache>,
    eval: Arc<dyn Evaluator>,
    tx: mpsc::Sender<ReviewEvent>,
}

impl Inspector {
    pub fn new(
        cache: Arc<ReviewCache>,
        eval: Arc<dyn Evaluator>,
        tx: mpsc::Sender<ReviewEvent>,
    ) -> Self {
        Inspector {
            state: Inspection::Closed,
            generation: 0,
            cache,
            eval,
            tx,
        }
    }

    pub fn state(&self) -> &Inspection {
        &self.state
    }

    /// Open a player for inspection. Any previously open player is
    /// implicitly closed first (no stacking of sessions).
    ///
    /// Cache hit: transitions straight to `Ready` with zero network cost.
    /// Miss: transitions to `Loading` and spawns the review fetch; the
    /// result arrives as a `ReviewEvent` for `handle_event`.
    pub fn select(&mut self, player: Player) {
        // Supersede any in-flight fetch from the previous selection.
        self.generation += 1;
        let generation = self.generation;

        info!(player = %player.full_name(), "player selected");

        match self.cache.get(&player.player_id) {
            Ok(Some(review)) => {
                debug!(player_id = %player.player_id, "review cache hit");
                let mut player = player;
                player.review = Some(review.clone());
                self.state = Inspection::Ready { player, review };
                return;
            }
            Ok(None) => {}
            Err(e) => {
                // A broken cache degrades to a miss; the live fetch still runs.
                warn!(error = %e, "review cache lookup failed");
            }
        }

        let request = ReviewRequest {
            player_name: player.full_name(),
            position: player.position.clone(),
            grade: player.grade,
        };
        let player_id = player.player_id.clone();
        self.state = Inspection::Loading { player };

        let eval = Arc::clone(&self.eval);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match eval.review(&request).await {
                Ok(review) => ReviewEvent::Fetched {
                    player_id,
                    review,
                    generation,
                },
                Err(e) => ReviewEvent::Failed {
                    player_id,
                    message: e.to_string(),
                    generation,
                },
            };
            // Receiver dropped means the view is gone; nothing to do.
            let _ = tx.send(event).await;
        });
    }

    /// Apply a review fetch result.
    ///
    /// Events from superseded generations are discarded: selecting player B
    /// while A's fetch is in flight means A's late-arriving response must
    /// never appear in B's inspection view.
    pub fn handle_event(&mut self, event: ReviewEvent) {
        if event.generation() != self.generation {
            debug!(
                event_generation = event.generation(),
                current_generation = self.generation,
                "discarding stale review event"
            );
            return;
        }

        let player = match &self.state {
            Inspection::Loading { player } if player.player_id == event.player_id() => {
                player.clone()
            }
            _ => {
                debug!("review event with no matching open session, discarding");
                return;
            }
        };

        match event {
            ReviewEvent::Fetched { review, .. } => {
                // Write-through: the cache keeps the review across sessions
                // even after this inspection closes.
                if let Err(e) = self.cache.put(&player.player_id, &review) {
                    warn!(error = %e, "failed to cache review");
                }
                let mut player = player;
                player.review = Some(review.clone());
                self.state = Inspection::Ready { player, review };
            }
            ReviewEvent::Failed { message, .. } => {
                // A failed fetch is never fatal: the view shows the fixed
                // fallback text instead. The failure is not cached.
                warn!(player = %player.full_name(), error = %message, "review fetch failed");
                self.state = Inspection::Ready {
                    player,
                    review: REVIEW_FALLBACK.to_string(),
                };
            }
        }
    }

    /// Close the inspection, discarding the displayed review and player
    /// reference. Cache entries persist.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = Inspection::Closed;
    }
}
