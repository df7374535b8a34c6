//! `filmot` command line: store credentials and search YouTube subtitles.

mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use filmot_client::Filmot;
use filmot_config::FilmotConfig;
use filmot_types::{Category, Country, Language, License, SearchRequest, parse_date};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "filmot", version)]
#[command(about = "Search YouTube subtitles through the Filmot API")]
struct Cli {
    /// Config file to use instead of ~/.config/filmot/config.json
    #[arg(long, global = true, env = "FILMOT_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the RapidAPI key in the config file
    SetKey {
        /// RapidAPI key for the Filmot archive
        key: String,
    },
    /// Search subtitles and print the matching moments
    Search(SearchArgs),
    /// List the values accepted by a filter
    List {
        #[arg(value_enum)]
        catalogue: Catalogue,
    },
    /// Print the config file location
    ConfigPath,
}

#[derive(Debug, clap::Args)]
struct SearchArgs {
    /// Text to find inside the subtitles; phrases are matched exactly
    query: String,
    /// Subtitle language code (see `filmot list languages`)
    #[arg(long)]
    lang: Option<Language>,
    /// Video category (see `filmot list categories`)
    #[arg(long)]
    category: Option<Category>,
    /// Category to exclude; repeatable
    #[arg(long = "exclude-category")]
    exclude_categories: Vec<Category>,
    /// 1 / standard, or 2 / cc for Creative Commons
    #[arg(long)]
    license: Option<License>,
    /// Channel country, by code or name (see `filmot list countries`)
    #[arg(long)]
    country: Option<Country>,
    #[arg(long)]
    min_views: Option<u64>,
    #[arg(long)]
    max_views: Option<u64>,
    #[arg(long)]
    min_likes: Option<u64>,
    #[arg(long)]
    channel_id: Option<String>,
    /// Filter on the video title
    #[arg(long)]
    title: Option<String>,
    /// Minimal video duration in seconds
    #[arg(long)]
    start_duration: Option<u32>,
    /// Maximal video duration in seconds
    #[arg(long)]
    end_duration: Option<u32>,
    /// Search manually written subtitles instead of automatic ones
    #[arg(long)]
    manual_subs: bool,
    /// Upload date lower bound (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,
    /// Upload date upper bound (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,
    /// Total videos to return
    #[arg(long, default_value_t = filmot_types::DEFAULT_LIMIT)]
    limit: usize,
    /// RapidAPI key for this run only
    #[arg(long, env = "FILMOT_RAPIDAPI_KEY", hide_env_values = true)]
    key: Option<String>,
    /// Print raw responses as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Catalogue {
    Categories,
    Countries,
    Languages,
}

impl SearchArgs {
    fn to_request(&self) -> Result<SearchRequest> {
        let mut request = SearchRequest::new(&self.query)?
            .manual_subs(self.manual_subs)
            .limit(self.limit);
        if let Some(lang) = self.lang {
            request = request.language(lang);
        }
        if let Some(category) = self.category {
            request = request.category(category);
        }
        for category in &self.exclude_categories {
            request = request.exclude_category(*category);
        }
        if let Some(license) = self.license {
            request = request.license(license);
        }
        if let Some(country) = self.country {
            request = request.country(country);
        }
        if let Some(views) = self.min_views {
            request = request.min_views(views);
        }
        if let Some(views) = self.max_views {
            request = request.max_views(views);
        }
        if let Some(likes) = self.min_likes {
            request = request.min_likes(likes);
        }
        if let Some(channel_id) = &self.channel_id {
            request = request.channel_id(channel_id);
        }
        if let Some(title) = &self.title {
            request = request.title(title);
        }
        if let Some(seconds) = self.start_duration {
            request = request.start_duration(seconds);
        }
        if let Some(seconds) = self.end_duration {
            request = request.end_duration(seconds);
        }
        if let Some(date) = self.start_date {
            request = request.start_date(date);
        }
        if let Some(date) = self.end_date {
            request = request.end_date(date);
        }
        // Catch bad ranges before any network call.
        request.to_params()?;
        Ok(request)
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries results; logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn config_path(cli: &Cli) -> Result<PathBuf> {
    cli.config
        .clone()
        .or_else(FilmotConfig::path)
        .context("cannot locate a home directory; pass --config")
}

fn set_key(path: &Path, key: &str) -> Result<()> {
    anyhow::ensure!(!key.trim().is_empty(), "the RapidAPI key must not be empty");

    let mut config = FilmotConfig::load_from(path)?;
    config.set_rapidapi_key(key);
    config.save_to(path)?;
    println!("Credentials set successfully!");
    tracing::debug!(path = %path.display(), "Stored RapidAPI key");
    Ok(())
}

async fn search(path: &Path, args: &SearchArgs) -> Result<()> {
    let request = args.to_request()?;
    let config = FilmotConfig::load_from(path)?;
    let client = Filmot::from_config(&config, args.key.as_deref())?;

    let responses = client
        .search(&request)
        .await
        .with_context(|| format!("search for '{}' failed", request.query()))?;

    let out = if args.json {
        serde_json::to_string_pretty(&responses)?
    } else {
        render::responses(&responses)
    };
    println!("{out}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match &cli.command {
        Commands::SetKey { key } => set_key(&config_path(&cli)?, key),
        Commands::Search(args) => search(&config_path(&cli)?, args).await,
        Commands::List { catalogue } => {
            println!("{}", render::catalogue(*catalogue));
            Ok(())
        }
        Commands::ConfigPath => {
            println!("{}", config_path(&cli)?.display());
            Ok(())
        }
    }
}
