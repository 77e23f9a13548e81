use anyhow::Result;
use env_logger::Env;
use log::{error, info};

use tract_matcher::config::AppConfig;
use tract_matcher::db::{fetch_client_tracts, fetch_production_tracts, make_pool};
use tract_matcher::export::{export_to_csv, print_preview};
use tract_matcher::matching::composer::compose_rows;
use tract_matcher::matching::{MatchOutcome, match_tracts};
use tract_matcher::util::envfile::load_dotenv_if_present;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    load_dotenv_if_present()?;
    let cfg = AppConfig::from_env()?;
    cfg.validate()?;
    info!(
        "Matching client list against production tracts in {}/{} ({:?})",
        cfg.filter.state_abbr, cfg.filter.county, cfg.database
    );

    let pool = make_pool(&cfg.database).await?;
    let started = std::time::Instant::now();
    let clients = fetch_client_tracts(&pool).await?;
    let production = fetch_production_tracts(&pool, &cfg.filter).await?;
    info!(
        "Fetched {} client and {} production tract records in {:.1?}",
        clients.len(),
        production.len(),
        started.elapsed()
    );

    match match_tracts(&clients, &production) {
        MatchOutcome::NoCandidates | MatchOutcome::NoPositiveScores => {
            println!("No matches found.");
        }
        MatchOutcome::Matched(best) => {
            let rows = compose_rows(&clients, &production, &best);
            export_to_csv(&rows, &cfg.export.out_path)?;
            println!("Matches saved to {}", cfg.export.out_path);
            print_preview(&rows, cfg.export.preview_rows);
        }
    }
    Ok(())
}
