use std::{
    io::{self, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use log::{info, warn};

use weboption::{Config, CourseListing, Scraper, Semester};

/// Scrape UTSC web-option courses and their lecture links as JSON.
#[derive(Parser)]
struct Args {
    /// Print the semesters that offered web-optioned courses and exit.
    #[arg(long)]
    list: bool,

    /// Only scrape this semester, e.g. "2022 winter".
    #[arg(long, value_name = "SEMESTER")]
    semester: Option<Semester>,

    /// Don't probe for lecture videos.
    #[arg(long)]
    no_links: bool,

    /// Config file, merged under `WEBOPTION_*` environment variables.
    #[arg(long, default_value = "weboption.toml")]
    config: String,
}

fn load_config(path: &str) -> Result<Config> {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("WEBOPTION_"))
        .extract()
        .context("Failed to load config")
}

/// Write the courses of one semester, including those read before a failure.
/// Returns whether the listing was complete.
fn write_listing(out: &mut impl Write, semester: &Semester, listing: &CourseListing) -> Result<bool> {
    info!(
        "{}: {} courses, {} rows skipped",
        semester,
        listing.courses.len(),
        listing.skipped
    );
    if let Some(error) = &listing.error {
        warn!("{}: listing incomplete: {}", semester, error.chain());
    }

    serde_json::to_writer_pretty(&mut *out, &listing.courses)?;
    writeln!(out)?;
    Ok(listing.error.is_none())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if args.no_links {
        config.probe_links = false;
    }

    let scraper = Scraper::from_config(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.list {
        for semester in scraper.semesters().await? {
            writeln!(out, "{semester}")?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(semester) = args.semester {
        let listing = scraper.scrape_semester(&semester).await;
        if !write_listing(&mut out, &semester, &listing)? {
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let semesters = scraper.scrape_all().await?;
    info!("scraped {} semesters", semesters.len());
    serde_json::to_writer_pretty(&mut out, &semesters)?;
    writeln!(out)?;
    Ok(ExitCode::SUCCESS)
}
