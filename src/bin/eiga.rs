//! Eiga CLI - browse the catalogue from a terminal
//!
//! Runs one catalogue session against a real backend: the filters come from a
//! URL query string, exactly as a bookmarked catalogue link would carry them.
//!
//! ```bash
//! eiga --query "mediaType=tv&genres=18&era=2010s" --pages 2
//! eiga --backend omdb --query "search=alien"
//! eiga --details /movie/272
//! ```

use clap::{Parser, ValueEnum};
use color_eyre::{
    eyre::{Result, eyre},
    install,
};
use eiga::prelude::*;
use eiga::sources::{OmdbSource, TmdbSource};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Tmdb,
    Omdb,
}

#[derive(Debug, Parser)]
#[command(name = "eiga", version, about = "Browse movies and tv shows")]
struct Cli {
    /// Metadata backend to query
    #[arg(long, value_enum, env = "EIGA_BACKEND", default_value = "tmdb")]
    backend: Backend,

    /// Catalogue filters as a URL query, e.g. "mediaType=tv&genres=18"
    #[arg(long, default_value = "")]
    query: String,

    /// Number of result pages to load
    #[arg(long, default_value_t = 1)]
    pages: u32,

    /// Show one item instead of a listing, e.g. /movie/272
    #[arg(long)]
    details: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    install()?;
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eiga=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let source: Arc<dyn Source> = match cli.backend {
        Backend::Tmdb => Arc::new(TmdbSource::from_config(&config)?),
        Backend::Omdb => Arc::new(OmdbSource::from_config(&config)?),
    };

    let session = Session::new(source, MemoryNavigator::with_query(RawQuery::parse(&cli.query)));

    if let Some(path) = cli.details.as_deref() {
        return show_details(&session, path).await;
    }

    show_listing(&session, cli.pages).await
}

async fn show_listing(session: &Session<MemoryNavigator>, pages: u32) -> Result<()> {
    session.sync().await;
    for _ in 1..pages {
        if !session.results().has_more() {
            break;
        }
        session.load_more().await;
    }

    let filter = session.state();
    let genres = session.genres().snapshot();
    let results = session.results().snapshot();

    if let Some(error) = results.error.as_deref().or(genres.error.as_deref()) {
        return Err(eyre!("{}", error));
    }

    println!(
        "{} | era: {} | genres: {}",
        filter.category.label(),
        filter.era.label(),
        describe_genres(&filter.genre_ids, &genres.genres),
    );
    println!(
        "page {} of {} ({} items)\n",
        results.current_page,
        results.total_pages,
        results.items.len()
    );

    for item in &results.items {
        let rating = item
            .vote_average
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>10}  {:<50} {:>4}  {}",
            item.id,
            item.title,
            item.year().unwrap_or("????"),
            rating
        );
    }

    Ok(())
}

async fn show_details(session: &Session<MemoryNavigator>, path: &str) -> Result<()> {
    if !session.open_path(path).await {
        return Err(eyre!("not a detail path: {} (expected /movie/<id> or /tv/<id>)", path));
    }

    let state = session.results().snapshot();
    let details = match (state.selected_media, state.error) {
        (Some(details), _) => details,
        (None, Some(error)) => return Err(eyre!("{}", error)),
        (None, None) => return Err(eyre!(eiga::FALLBACK_ERROR_MESSAGE)),
    };

    println!("{} ({})", details.title, details.year().unwrap_or("????"));
    if let Some(tagline) = &details.tagline {
        println!("{}", tagline);
    }
    if let Some(runtime) = details.runtime {
        println!("{} min", runtime);
    }
    if !details.genres.is_empty() {
        let names: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        println!("{}", names.join(", "));
    }
    if let Some(overview) = &details.overview {
        println!("\n{}", overview);
    }
    if !details.cast.is_empty() {
        println!("\nCast:");
        for member in details.cast.iter().take(10) {
            match &member.character {
                Some(character) => println!("  {} as {}", member.name, character),
                None => println!("  {}", member.name),
            }
        }
    }

    Ok(())
}

fn describe_genres(ids: &[u32], genres: &[Genre]) -> String {
    if ids.is_empty() {
        return "any".to_string();
    }
    ids.iter()
        .map(|id| {
            genres
                .iter()
                .find(|g| g.id == *id)
                .map(|g| g.name.clone())
                .unwrap_or_else(|| id.to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}
