//! Confluence quick search from the terminal.
//!
//! `confluence search "roadmap #docs +runbook"` runs a search and prints
//! the result rows; `cql` and `url` print what a query compiles to
//! without touching the network.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::Table;

use confluence_client::{ResultRow, Searcher, Settings};
use cql_shorthand::{build_browser_query, build_search_cql};

#[derive(Parser)]
#[command(name = "confluence")]
#[command(version)]
#[command(about = "Search Confluence with sigil shorthand (#space +label @who / \" . *)")]
struct Cli {
    /// Settings file; defaults to confluence-search/config.toml in the
    /// user config directory
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comma-separated default spaces, overriding the settings file
    #[arg(long, global = true, value_name = "KEYS")]
    spaces: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a search and print the result rows
    Search {
        /// Query text, sigils included
        #[arg(value_name = "QUERY", required = true)]
        query: Vec<String>,

        /// Result limit, overriding the settings file
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
    /// Print the CQL filter a query compiles to
    Cql {
        /// Query text, sigils included
        #[arg(value_name = "QUERY", required = true)]
        query: Vec<String>,
    },
    /// Print the web UI search URL a query compiles to
    Url {
        /// Query text, sigils included
        #[arg(value_name = "QUERY", required = true)]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(raw) = &cli.spaces {
        settings.default_spaces = Settings::parse_spaces(raw);
    }

    match cli.command {
        Command::Search { query, limit } => {
            if let Some(limit) = limit {
                settings.max_results = limit;
            }
            settings.validate()?;

            let searcher = Searcher::new(settings)?;
            let rows = searcher.search_once(&query.join(" ")).await?;
            print_rows(&rows);
        }
        Command::Cql { query } => {
            println!(
                "{}",
                build_search_cql(&query.join(" "), &settings.default_spaces)
            );
        }
        Command::Url { query } => {
            let browser_query = build_browser_query(&query.join(" "), &settings.default_spaces);
            println!("{}/wiki/search?{}", settings.base_url, browser_query);
        }
    }

    Ok(())
}

fn print_rows(rows: &[ResultRow]) {
    let mut table = Table::new();
    table.set_header(vec!["Title", "Details", "URL"]);
    for row in rows {
        table.add_row(vec![
            row.title.as_str(),
            row.subtitle.as_str(),
            row.url.as_deref().unwrap_or(""),
        ]);
    }
    println!("{table}");
}
