// League browser entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open the review cache
// 4. Build the league API and evaluation clients
// 5. Render the league overview, each team, and the current draft

use std::sync::Arc;

use anyhow::Context;
use chrono::Datelike;
use tracing::{info, warn};

use dynasty_desk::api::{LeagueApi, SleeperClient};
use dynasty_desk::config;
use dynasty_desk::eval::cache::ReviewCache;
use dynasty_desk::eval::client::EvalClient;
use dynasty_desk::eval::grade::grade_roster;
use dynasty_desk::protocol::{DraftSnapshot, TeamSnapshot};
use dynasty_desk::roster::draft::{assemble_draft, draft_year_links};
use dynasty_desk::roster::team::assemble_team;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file; the terminal is the render surface)
    init_tracing()?;
    info!("dynastydesk starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={} ({})",
        config.league.id,
        config.league.name.as_deref().unwrap_or("unnamed")
    );

    // 3. Open the review cache
    let cache_path = config.cache_db_path();
    let cache = Arc::new(
        ReviewCache::open(&cache_path, config.cache.capacity)
            .context("failed to open review cache")?,
    );
    info!("Review cache opened at {} ({} entries)", cache_path, cache.len()?);

    // 4. Build clients
    let api = SleeperClient::new(&config.api.base_url);
    let eval = EvalClient::from_config(&config);
    match &eval {
        EvalClient::Active(_) => info!("Evaluation client initialized"),
        EvalClient::Disabled => info!("Evaluation client disabled (no service URL)"),
    }

    let current_year = chrono::Utc::now().year();

    // 5. Render the league: overview, each team with its grade, the
    //    current-year draft. Failures are page-local, never fatal.
    let league_name = config.league.name.as_deref().unwrap_or("League");
    println!("League: {league_name}");
    println!();

    let users = api
        .users(&config.league.id)
        .await
        .context("failed to load league users")?;

    if users.is_empty() {
        println!("No teams found");
    }

    for user in &users {
        match assemble_team(&api, &config.league.id, &user.user_id).await {
            Ok(mut team) => {
                let report = grade_roster(&eval, &mut team.players).await;
                team.team_grade = report.team_grade;
                team.ungraded = report.ungraded;

                let snapshot = TeamSnapshot::from_team(&team, &report);
                println!("{}", snapshot.header);
                println!("  {}", snapshot.grade_line);
                for line in &snapshot.roster_lines {
                    println!("  {line}");
                }
                if !snapshot.pick_lines.is_empty() {
                    println!("  Draft Picks:");
                    for line in &snapshot.pick_lines {
                        println!("    {line}");
                    }
                }
                if !snapshot.transaction_lines.is_empty() {
                    println!("  Recent Transactions:");
                    for line in &snapshot.transaction_lines {
                        println!("    {line}");
                    }
                }
                println!();
            }
            Err(e) => {
                warn!(owner_id = %user.user_id, error = %e, "skipping team");
                println!("{}", e.user_message());
                println!();
            }
        }
    }

    match assemble_draft(&api, &config.league.id, current_year, current_year).await {
        Ok(session) => {
            let snapshot = DraftSnapshot::from_session(&session);
            println!("{}", snapshot.header);
            for line in &snapshot.pick_lines {
                println!("  {line}");
            }
            if !snapshot.rookie_lines.is_empty() {
                println!("  Available Rookies:");
                for line in &snapshot.rookie_lines {
                    println!("    {line}");
                }
            }
            let years = draft_year_links(current_year, config.league.origin_draft_year);
            let years: Vec<String> = years.iter().map(i32::to_string).collect();
            println!("  Other drafts: {}", years.join(", "));
        }
        Err(e) => {
            warn!(error = %e, "draft page unavailable");
            println!("{}", e.user_message());
        }
    }

    info!("dynastydesk finished");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which carries the
/// rendered output).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("dynastydesk.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dynasty_desk=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
