// Integration tests for the roster & draft aggregation engine.
//
// These tests exercise the full system end-to-end using the library crate's
// public API. They verify that the major subsystems (team assembly, grade
// aggregation, the review cache, the inspection state machine, and page
// navigation) work together correctly against in-memory upstream fakes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use dynasty_desk::api::types::{
    DraftRecord, PickRecord, RookieRecord, RosterRecord, TransactionRecord, UserMetadata,
    UserRecord,
};
use dynasty_desk::api::LeagueApi;
use dynasty_desk::app::{Browser, PageState};
use dynasty_desk::error::EngineError;
use dynasty_desk::eval::cache::ReviewCache;
use dynasty_desk::eval::client::{Evaluator, GradeRequest, ReviewRequest};
use dynasty_desk::eval::grade::grade_roster;
use dynasty_desk::inspect::{Inspection, Inspector, REVIEW_FALLBACK};
use dynasty_desk::protocol::{DraftSnapshot, TeamSnapshot, NO_PICKS_MESSAGE};
use dynasty_desk::roster::draft::assemble_draft;
use dynasty_desk::roster::player::{Player, Position};
use dynasty_desk::roster::team::assemble_team;

// ===========================================================================
// Test fixtures
// ===========================================================================

const LEAGUE: &str = "league-test";
const CURRENT_YEAR: i32 = 2026;

fn player(id: &str, first: &str, last: &str, pos: &str) -> Player {
    Player {
        player_id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        position: pos.to_string(),
        team: Some("BUF".to_string()),
        college: None,
        height: None,
        weight: None,
        age: Some(27),
        years_exp: Some(5),
        status: None,
        injury_status: None,
        avatar: None,
        grade: None,
        review: None,
    }
}

fn users() -> Vec<UserRecord> {
    vec![
        UserRecord {
            user_id: "owner-1".into(),
            display_name: Some("trainconductor".into()),
            metadata: UserMetadata {
                team_name: Some("Choo Choo Crew".into()),
            },
            avatar: None,
        },
        UserRecord {
            user_id: "owner-2".into(),
            display_name: Some("cabooseboss".into()),
            metadata: UserMetadata { team_name: None },
            avatar: None,
        },
    ]
}

fn rosters() -> Vec<RosterRecord> {
    vec![
        RosterRecord {
            roster_id: 1,
            owner_id: "owner-1".into(),
            player_details: vec![
                player("qb1", "Josh", "Allen", "QB"),
                player("rb1", "Bijan", "Robinson", "RB"),
                player("wr1", "Justin", "Jefferson", "WR"),
                player("def1", "Buffalo", "Defense", "DEF"),
            ],
            draft_picks: vec![],
        },
        RosterRecord {
            roster_id: 2,
            owner_id: "owner-2".into(),
            player_details: vec![player("te1", "Sam", "LaPorta", "TE")],
            draft_picks: vec![],
        },
    ]
}

/// In-memory league data provider covering every endpoint.
struct InMemoryLeague {
    drafts: HashMap<i32, DraftRecord>,
    picks: HashMap<String, Vec<PickRecord>>,
    rookies: Vec<RookieRecord>,
}

impl InMemoryLeague {
    fn new() -> Self {
        let mut drafts = HashMap::new();
        drafts.insert(
            CURRENT_YEAR,
            DraftRecord {
                draft_id: "draft-current".into(),
                season: Some(CURRENT_YEAR.to_string()),
                status: Some("drafting".into()),
            },
        );
        drafts.insert(
            2019,
            DraftRecord {
                draft_id: "draft-2019".into(),
                season: Some("2019".into()),
                status: Some("complete".into()),
            },
        );

        let mut picks = HashMap::new();
        picks.insert(
            "draft-current".to_string(),
            vec![
                PickRecord {
                    round: 1,
                    pick_no: 1,
                    picked_by: Some("owner-1".into()),
                    metadata: Some(player("rook1", "First", "Overall", "RB")),
                },
                PickRecord {
                    round: 1,
                    pick_no: 2,
                    picked_by: None,
                    metadata: None,
                },
            ],
        );
        // 2019 draft exists but has zero recorded picks.
        picks.insert("draft-2019".to_string(), vec![]);

        InMemoryLeague {
            drafts,
            picks,
            rookies: vec![RookieRecord {
                name: "Hot Prospect".into(),
                position: Some("WR".into()),
                grade: Some(8.5),
            }],
        }
    }
}

#[async_trait]
impl LeagueApi for InMemoryLeague {
    async fn users(&self, _league_id: &str) -> Result<Vec<UserRecord>, EngineError> {
        Ok(users())
    }

    async fn rosters(&self, _league_id: &str) -> Result<Vec<RosterRecord>, EngineError> {
        Ok(rosters())
    }

    async fn transactions(&self, _league_id: &str) -> Result<Vec<TransactionRecord>, EngineError> {
        Ok(vec![
            TransactionRecord {
                transaction_id: "tx-1".into(),
                kind: "trade".into(),
                status: Some("complete".into()),
                status_updated: Some(1_724_630_400_000),
                roster_ids: vec![1, 2],
            },
            TransactionRecord {
                transaction_id: "tx-2".into(),
                kind: "waiver".into(),
                status: Some("complete".into()),
                status_updated: Some(1_724_716_800_000),
                roster_ids: vec![2],
            },
        ])
    }

    async fn draft_for_year(
        &self,
        _league_id: &str,
        year: i32,
    ) -> Result<DraftRecord, EngineError> {
        self.drafts
            .get(&year)
            .cloned()
            .ok_or_else(|| EngineError::draft_not_found(year))
    }

    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<PickRecord>, EngineError> {
        Ok(self.picks.get(draft_id).cloned().unwrap_or_default())
    }

    async fn rookies(&self) -> Result<Vec<RookieRecord>, EngineError> {
        Ok(self.rookies.clone())
    }
}

/// Evaluator fake: fixed grades per player, counted review requests.
struct TestEvaluator {
    grades: HashMap<String, f64>,
    review_calls: AtomicUsize,
}

impl TestEvaluator {
    fn new(grades: &[(&str, f64)]) -> Self {
        TestEvaluator {
            grades: grades
                .iter()
                .map(|(name, grade)| (name.to_string(), *grade))
                .collect(),
            review_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Evaluator for TestEvaluator {
    async fn grade(&self, request: &GradeRequest) -> Result<f64, EngineError> {
        self.grades
            .get(&request.player_name)
            .copied()
            .ok_or_else(|| EngineError::FetchFailed("no grade on file".into()))
    }

    async fn review(&self, request: &ReviewRequest) -> Result<String, EngineError> {
        self.review_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("A solid outlook for {}.", request.player_name))
    }
}

// ===========================================================================
// Team assembly
// ===========================================================================

#[tokio::test]
async fn assembles_team_with_resolved_name_and_transactions() {
    let api = InMemoryLeague::new();
    let team = assemble_team(&api, LEAGUE, "owner-1").await.unwrap();

    assert_eq!(team.name, "Choo Choo Crew");
    assert_eq!(team.owner_name, "trainconductor");
    assert_eq!(team.players.len(), 4);
    // Only transactions touching roster 1.
    assert_eq!(team.transactions.len(), 1);
    assert_eq!(team.transactions[0].kind, "trade");
}

#[tokio::test]
async fn team_name_falls_back_to_display_name() {
    let api = InMemoryLeague::new();
    let team = assemble_team(&api, LEAGUE, "owner-2").await.unwrap();
    assert_eq!(team.name, "cabooseboss");
}

#[tokio::test]
async fn unknown_owner_fails_with_not_found_naming_the_team() {
    let api = InMemoryLeague::new();
    let err = assemble_team(&api, LEAGUE, "owner-404").await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("Team owner-404".into()));
    assert_eq!(err.user_message(), "Team owner-404 not found.");
}

#[tokio::test]
async fn position_groups_partition_the_assembled_roster() {
    let api = InMemoryLeague::new();
    let team = assemble_team(&api, LEAGUE, "owner-1").await.unwrap();
    let groups = team.position_groups();

    // DEF is unrecognized and dropped from grouped views.
    assert_eq!(groups.grouped_count(), 3);
    assert_eq!(groups.at(Position::Quarterback).len(), 1);
    assert_eq!(groups.at(Position::RunningBack).len(), 1);
    assert_eq!(groups.at(Position::WideReceiver).len(), 1);
    assert!(groups.at(Position::Kicker).is_empty());
}

// ===========================================================================
// Grade aggregation end-to-end
// ===========================================================================

#[tokio::test]
async fn team_grade_averages_all_successful_grades() {
    let api = InMemoryLeague::new();
    let eval = TestEvaluator::new(&[
        ("Josh Allen", 80.0),
        ("Bijan Robinson", 90.0),
        ("Justin Jefferson", 100.0),
        ("Buffalo Defense", 90.0),
    ]);

    let mut team = assemble_team(&api, LEAGUE, "owner-1").await.unwrap();
    let report = grade_roster(&eval, &mut team.players).await;

    assert_eq!(report.team_grade_display(), "90.00");
    assert_eq!(report.ungraded, 0);
    assert!(team.players.iter().all(|p| p.grade.is_some()));
}

#[tokio::test]
async fn team_snapshot_shows_grade_and_ungraded_count() {
    let api = InMemoryLeague::new();
    // No grade on file for the DEF entry: one request fails.
    let eval = TestEvaluator::new(&[
        ("Josh Allen", 80.0),
        ("Bijan Robinson", 90.0),
        ("Justin Jefferson", 100.0),
    ]);

    let mut team = assemble_team(&api, LEAGUE, "owner-1").await.unwrap();
    let report = grade_roster(&eval, &mut team.players).await;
    team.team_grade = report.team_grade;
    team.ungraded = report.ungraded;

    let snapshot = TeamSnapshot::from_team(&team, &report);
    assert_eq!(snapshot.header, "Choo Choo Crew (Owner: trainconductor)");
    assert_eq!(snapshot.grade_line, "Team Grade: 90.00 (1 ungraded)");
    assert!(snapshot
        .roster_lines
        .iter()
        .any(|l| l == "QB: Josh Allen [80.00]"));
}

// ===========================================================================
// Draft assembly
// ===========================================================================

#[tokio::test]
async fn current_year_draft_includes_rookie_pool() {
    let api = InMemoryLeague::new();
    let session = assemble_draft(&api, LEAGUE, CURRENT_YEAR, CURRENT_YEAR)
        .await
        .unwrap();

    assert_eq!(session.picks.len(), 2);
    assert_eq!(session.rookies.len(), 1);

    let snapshot = DraftSnapshot::from_session(&session);
    assert_eq!(snapshot.pick_lines[0], "Round 1, Pick 1: First Overall");
    assert_eq!(snapshot.pick_lines[1], "Round 1, Pick 2: No Pick Yet");
    assert_eq!(snapshot.rookie_lines[0], "Hot Prospect - 8.50");
}

#[tokio::test]
async fn prior_year_draft_skips_rookie_pool() {
    let api = InMemoryLeague::new();
    let session = assemble_draft(&api, LEAGUE, 2019, CURRENT_YEAR).await.unwrap();
    assert!(session.rookies.is_empty());
}

#[tokio::test]
async fn zero_pick_draft_renders_no_picks_message() {
    let api = InMemoryLeague::new();
    let session = assemble_draft(&api, LEAGUE, 2019, CURRENT_YEAR).await.unwrap();
    assert!(session.picks.is_empty());

    let snapshot = DraftSnapshot::from_session(&session);
    assert_eq!(snapshot.pick_lines, vec![NO_PICKS_MESSAGE.to_string()]);
}

#[tokio::test]
async fn missing_draft_year_fails_with_year_specific_message() {
    let api = InMemoryLeague::new();
    let err = assemble_draft(&api, LEAGUE, 2021, CURRENT_YEAR)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Draft for year 2021 not found.");
}

// ===========================================================================
// Inspection flow with the shared cache
// ===========================================================================

#[tokio::test]
async fn inspection_reviews_round_trip_through_the_cache() {
    let api = InMemoryLeague::new();
    let eval = Arc::new(TestEvaluator::new(&[]));
    let cache = Arc::new(ReviewCache::open(":memory:", 64).unwrap());
    let (tx, mut rx) = mpsc::channel(16);
    let mut inspector = Inspector::new(Arc::clone(&cache), Arc::clone(&eval) as Arc<dyn Evaluator>, tx);

    let team = assemble_team(&api, LEAGUE, "owner-1").await.unwrap();
    let selected = team.players[0].clone();

    // First selection: miss, fetch, write-through.
    inspector.select(selected.clone());
    let event = rx.recv().await.unwrap();
    inspector.handle_event(event);
    match inspector.state() {
        Inspection::Ready { review, .. } => {
            assert_eq!(review, "A solid outlook for Josh Allen.")
        }
        other => panic!("expected Ready, got {other:?}"),
    }
    assert_eq!(eval.review_calls.load(Ordering::SeqCst), 1);

    // Second selection of the same player: served from cache, no request.
    inspector.close();
    inspector.select(selected);
    assert!(matches!(inspector.state(), Inspection::Ready { .. }));
    assert_eq!(eval.review_calls.load(Ordering::SeqCst), 1);

    // The entry is keyed by the stable id.
    assert_eq!(
        cache.get("qb1").unwrap().as_deref(),
        Some("A solid outlook for Josh Allen.")
    );
}

#[tokio::test]
async fn selecting_a_second_player_discards_the_first_players_review() {
    let eval = Arc::new(TestEvaluator::new(&[]));
    let cache = Arc::new(ReviewCache::open(":memory:", 64).unwrap());
    let (tx, mut rx) = mpsc::channel(16);
    let mut inspector = Inspector::new(cache, eval, tx);

    inspector.select(player("a", "Player", "Aye", "RB"));
    inspector.select(player("b", "Player", "Bee", "WR"));

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    inspector.handle_event(first);
    inspector.handle_event(second);

    match inspector.state() {
        Inspection::Ready { player, review } => {
            assert_eq!(player.player_id, "b");
            assert_eq!(review, "A solid outlook for Player Bee.");
        }
        other => panic!("expected Ready for player b, got {other:?}"),
    }
}

/// Evaluator whose review endpoint always fails.
struct DownEvaluator;

#[async_trait]
impl Evaluator for DownEvaluator {
    async fn grade(&self, _request: &GradeRequest) -> Result<f64, EngineError> {
        Err(EngineError::FetchFailed("down".into()))
    }

    async fn review(&self, _request: &ReviewRequest) -> Result<String, EngineError> {
        Err(EngineError::FetchFailed("down".into()))
    }
}

#[tokio::test]
async fn failed_review_fetch_renders_the_fallback_text() {
    let cache = Arc::new(ReviewCache::open(":memory:", 64).unwrap());
    let (tx, mut rx) = mpsc::channel(16);
    let mut inspector = Inspector::new(cache, Arc::new(DownEvaluator), tx);

    inspector.select(player("a", "Player", "Aye", "RB"));
    let event = rx.recv().await.unwrap();
    inspector.handle_event(event);

    match inspector.state() {
        Inspection::Ready { review, .. } => assert_eq!(review, REVIEW_FALLBACK),
        other => panic!("expected Ready with fallback, got {other:?}"),
    }
}

// ===========================================================================
// Page navigation
// ===========================================================================

#[tokio::test]
async fn browser_applies_only_the_latest_navigation() {
    let api = Arc::new(InMemoryLeague::new());
    let eval = Arc::new(TestEvaluator::new(&[("Sam LaPorta", 70.0)]));
    let (tx, mut rx) = mpsc::channel(16);
    let mut browser = Browser::new(api, eval, LEAGUE, CURRENT_YEAR, tx);

    browser.open_team("owner-1");
    browser.open_team("owner-2");

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    browser.handle_event(first);
    browser.handle_event(second);

    match browser.state() {
        PageState::Team { team, report } => {
            assert_eq!(team.owner_id, "owner-2");
            assert_eq!(report.team_grade_display(), "70.00");
        }
        other => panic!("expected Team for owner-2, got {other:?}"),
    }
}

#[tokio::test]
async fn browser_surfaces_draft_not_found_as_page_error() {
    let api = Arc::new(InMemoryLeague::new());
    let eval = Arc::new(TestEvaluator::new(&[]));
    let (tx, mut rx) = mpsc::channel(16);
    let mut browser = Browser::new(api, eval, LEAGUE, CURRENT_YEAR, tx);

    browser.open_draft(2020);
    let event = rx.recv().await.unwrap();
    browser.handle_event(event);

    match browser.state() {
        PageState::Error { message } => assert_eq!(message, "Draft for year 2020 not found."),
        other => panic!("expected Error, got {other:?}"),
    }
}
