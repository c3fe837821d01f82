use anyhow::Context;
use chrono::Utc;
use housing_search::config::Settings;
use housing_search::grouping::group_by_recency;
use housing_search::search::{ChannelSink, FilterMachine, FilterState};
use housing_search::session::{render_groups, Command};
use housing_search::sources::{FileListingSource, HttpListingSource, ListingSource};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut settings = Settings::new()?;
    if let Some(query) = std::env::args().nth(1) {
        settings.query = query;
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🏠 Housing Search");
    info!("==========================================");

    let source: Box<dyn ListingSource> = match &settings.listings_url {
        Some(url) => Box::new(HttpListingSource::new(url)?),
        None => Box::new(FileListingSource::new(&settings.listings_path)),
    };
    info!("Using {} listing source", source.source_name());

    let (sink, mut commits) = ChannelSink::new();
    let mut machine = FilterMachine::with_debounce(&settings.query, sink, settings.debounce());

    show(source.as_ref(), machine.filters()).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match Command::parse(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Show) => show(source.as_ref(), machine.filters()).await,
                    Some(command) => command.apply(&mut machine),
                    None if line.trim().is_empty() => {}
                    None => warn!("Unknown command: {}", line.trim()),
                }
            }
            true = machine.settle_next(), if machine.has_pending() => {}
            Some(query) = commits.recv() => {
                println!("?{}", query);
                show(source.as_ref(), &FilterState::from_query_string(&query)).await;
            }
        }
    }

    machine.dispose();
    info!("👋 Done");
    Ok(())
}

async fn show(source: &dyn ListingSource, filters: &FilterState) {
    match source.fetch(filters).await {
        Ok(listings) => {
            let groups = group_by_recency(&listings, Utc::now());
            info!("✅ {} listings in {} groups", listings.len(), groups.len());
            print!("{}", render_groups(&groups));
        }
        Err(e) => warn!("Failed to fetch listings: {:#}", e),
    }
}
