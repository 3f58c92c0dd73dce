// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use catalog_client::app::{CatalogView, VERSION};
use catalog_client::models::search::ResultRecord;
use catalog_client::models::settings::ClientConfig;
use catalog_client::models::suggest::{Navigation, SuggestionGroup};
use catalog_client::models::version::VersionInfo;
use catalog_client::services::logging::init_logging;
use catalog_client::services::search::HttpSearchTransport;
use catalog_client::services::seen_store::{FileSeenStore, MemorySeenStore, SeenStore};
use catalog_client::services::suggest::HttpSuggestTransport;
use clap::{Parser, Subcommand};
use tracing::info;

type HttpView = CatalogView<HttpSearchTransport, HttpSuggestTransport>;

#[derive(Parser)]
#[command(name = "catalog-client", version, about = "Library catalog search client")]
struct Cli {
    /// Catalog base URL (falls back to CATALOG_BASE_URL)
    #[arg(long, env = "CATALOG_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Results requested per page
    #[arg(long, global = true)]
    page_size: Option<u64>,

    /// Skip results already shown on earlier pages
    #[arg(long, global = true)]
    dedup: bool,

    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Keyword search, optionally paging through more results
    Search {
        phrase: Vec<String>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Replay a fragment route such as "#Relevance/All/jazz"
    Route {
        fragment: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show typeahead suggestions for a prefix
    Suggest {
        prefix: String,
        /// Open the first suggestion
        #[arg(long)]
        select: bool,
    },
    /// Print version information as JSON
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        base_url,
        page_size,
        dedup,
        log_level,
        command,
    } = Cli::parse();
    init_logging(&log_level);

    if let Command::Version = command {
        let info = VersionInfo {
            client: "catalog-client".to_string(),
            version: VERSION.to_string(),
            search_endpoint: base_url,
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let config = load_config(base_url, page_size, dedup)?;
    let mut view = build_view(&config)?;

    match command {
        Command::Search { phrase, pages } => {
            view.submit_phrase(&phrase.join(" ")).await?;
            page_through(&mut view, pages).await;
            print_results(&view);
        }
        Command::Route { fragment, pages } => {
            let result = view.navigate(&fragment).await?;
            if result.search.is_some() {
                page_through(&mut view, pages).await;
                print_results(&view);
            } else if let Some((entity, id)) = view.current_item() {
                println!("Item view: {} {}", entity, id);
            } else {
                println!("No phrase in route; results toolbar hidden");
            }
        }
        Command::Suggest { prefix, select } => {
            let groups = view.suggest(&prefix).await;
            print_suggestions(&groups);
            if let Some(first) = groups.first().and_then(|g| g.items.first()).filter(|_| select) {
                match view.select_suggestion(first).await? {
                    Navigation::HashRoute(fragment) => println!("Navigated to {}", fragment),
                    Navigation::Redirect(path) => println!("Redirect to {}", path),
                }
            }
        }
        Command::Version => {}
    }

    Ok(())
}

/// Environment configuration with command-line overrides applied
fn load_config(base_url: Option<String>, page_size: Option<u64>, dedup: bool) -> Result<ClientConfig> {
    let base_url = base_url.context("No catalog base URL configured")?;
    let mut config =
        ClientConfig::from_env_with_base(base_url).context("Invalid catalog configuration")?;

    if let Some(size) = page_size.filter(|size| *size > 0) {
        config.page_size = size;
    }
    config.dedup |= dedup;
    Ok(config)
}

fn build_view(config: &ClientConfig) -> Result<HttpView> {
    let seen: Option<Box<dyn SeenStore>> = match (&config.seen_store_path, config.dedup) {
        (_, false) => None,
        (Some(path), true) => Some(Box::new(
            FileSeenStore::open(path).context("Failed to open seen-result store")?,
        )),
        (None, true) => Some(Box::new(MemorySeenStore::new())),
    };

    Ok(CatalogView::from_config(
        config,
        HttpSearchTransport::new(config)?,
        HttpSuggestTransport::new(config)?,
        seen,
    ))
}

async fn page_through(view: &mut HttpView, pages: u32) {
    for page in 1..pages {
        if view.load_more().await.is_none() {
            info!(page, "Reached the last page");
            break;
        }
    }
}

fn print_results(view: &HttpView) {
    for (index, record) in view.results().iter().enumerate() {
        print_record(index + 1, record);
    }
    println!();
    println!("{}", view.render_summary());
}

fn print_record(position: usize, record: &ResultRecord) {
    println!("{:>3}. {} / {}", position, record.title, record.author);
    if let Some(url) = &record.url {
        println!("     {}", url);
    }
    for location in record.locations.iter().chain(&record.held_items) {
        let status = location
            .circulation_status
            .as_ref()
            .map(|s| s.join(", "))
            .unwrap_or_default();
        println!("     @ {} {}", location.location, status);
    }
}

fn print_suggestions(groups: &[SuggestionGroup]) {
    if groups.is_empty() {
        println!("No suggestions");
        return;
    }
    for group in groups {
        println!("{}", group.header);
        for item in &group.items {
            let text = item.text(group.entity.display_key()).unwrap_or_default();
            println!("  {} ({})", text, item.id().unwrap_or("?"));
        }
    }
}
