// Grade aggregation: one evaluation request per roster player, joined as a
// batch, reduced to a team-level grade.

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::eval::client::{Evaluator, GradeRequest};
use crate::roster::player::Player;

/// Outcome of grading a roster.
///
/// The reduction is best-effort: failed requests are skipped and the team
/// grade averages the successes only, with the gap reported via `ungraded`
/// and surfaced to callers through `partial_failure()`. A single failed
/// request never aborts the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    /// Mean of the successful grades, rounded to two decimals. `None` when
    /// no request succeeded.
    pub team_grade: Option<f64>,
    /// Players that received a grade.
    pub graded: usize,
    /// Players whose grade request failed.
    pub ungraded: usize,
}

impl GradeReport {
    /// "90.00"-style display string, or "N/A" when nothing was graded.
    pub fn team_grade_display(&self) -> String {
        match self.team_grade {
            Some(grade) => format!("{grade:.2}"),
            None => "N/A".to_string(),
        }
    }

    /// The partial-failure signal, when some but not all requests failed.
    /// Total failure is not "partial": the page simply renders ungraded.
    pub fn partial_failure(&self) -> Option<EngineError> {
        if self.ungraded > 0 && self.graded > 0 {
            Some(EngineError::PartialEvaluationFailure {
                failed: self.ungraded,
                total: self.graded + self.ungraded,
            })
        } else {
            None
        }
    }
}

/// Issue one grade request per player, all in parallel, and wait for the
/// entire batch before publishing anything. Successful grades are written
/// onto the players in place; failures leave `grade` as `None`.
///
/// Individual requests are unordered with respect to each other; only the
/// joined result is ordered relative to the caller.
pub async fn grade_roster(eval: &dyn Evaluator, players: &mut [Player]) -> GradeReport {
    // The service grades relative to positional depth, so every request
    // carries the full roster name list.
    let roster_context: Vec<String> = players.iter().map(Player::full_name).collect();

    let requests: Vec<GradeRequest> = players
        .iter()
        .map(|p| GradeRequest {
            player_name: p.full_name(),
            position: p.position.clone(),
            roster_context: roster_context.clone(),
        })
        .collect();

    let results = join_all(requests.iter().map(|req| eval.grade(req))).await;

    let mut graded = 0;
    let mut ungraded = 0;
    let mut sum = 0.0;

    for (player, result) in players.iter_mut().zip(results) {
        match result {
            Ok(grade) => {
                player.grade = Some(grade);
                sum += grade;
                graded += 1;
            }
            Err(e) => {
                warn!(player = %player.full_name(), error = %e, "grade request failed");
                player.grade = None;
                ungraded += 1;
            }
        }
    }

    let team_grade = if graded > 0 {
        Some(round2(sum / graded as f64))
    } else {
        None
    };

    debug!(graded, ungraded, ?team_grade, "grade batch complete");

    GradeReport {
        team_grade,
        graded,
        ungraded,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
