use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use playlist_sync::config::Config;
use playlist_sync::http::HttpService;
use playlist_sync::ingest::{self, InputFormat, DEFAULT_SEPARATOR};
use playlist_sync::progress::set_log_only;
use playlist_sync::remote::Session;
use playlist_sync::{PlaylistSynchronizer, RawTrackRef, ResolutionCache, SyncOutcome};

#[derive(Parser)]
#[command(name = "playlist-sync")]
#[command(about = "Find (artist, title) pairs in a music catalog and mirror them into a playlist")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: ~/.config/playlist-sync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Resolution cache file
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Pre-issued access token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Hide progress bars and log periodic progress lines instead
    #[arg(long, global = true)]
    log_only: bool,

    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the input tracks and create or replace the named playlist
    Sync {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Track list file, or '-' for stdin
        #[arg(long, default_value = "-")]
        input: String,

        #[arg(long, value_enum, default_value = "lines")]
        format: InputFormat,

        /// Artist/title separator for line input
        #[arg(long, default_value = DEFAULT_SEPARATOR)]
        separator: String,
    },
    /// Resolve a single track through the cache and catalog
    Resolve {
        #[arg(long)]
        artist: String,

        #[arg(long, default_value = "")]
        title: String,
    },
    /// Report whether the configured session is authenticated
    CheckAuth,
}

fn init_logging(level: LevelFilter) {
    let mut clog = colog::default_builder();
    clog.filter(None, level);
    clog.init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    config.apply_env();
    if let Some(cache) = &args.cache {
        config.cache_path = cache.clone();
    }
    if let Some(base) = &args.api_base {
        config.api_base = base.clone();
    }
    if let Some(token) = &args.token {
        config.access_token = Some(token.clone());
    }
    Ok(config)
}

fn open_input(input: &str) -> Result<Box<dyn BufRead>> {
    if input == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        let file = File::open(input).with_context(|| format!("Failed to open input {}", input))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

fn require_auth(service: &HttpService) -> bool {
    if service.authenticated() {
        return true;
    }
    eprintln!("You need to authenticate first: set access_token in the config file or PLAYLIST_SYNC_TOKEN");
    false
}

fn run_sync(
    config: &Config,
    name: &str,
    description: &str,
    tracks: &[RawTrackRef],
) -> Result<()> {
    let service = HttpService::from_config(config);
    if !require_auth(&service) {
        return Ok(());
    }

    let start = Instant::now();
    let mut cache = ResolutionCache::open(&config.cache_path)
        .with_context(|| format!("Failed to open cache {}", config.cache_path.display()))?;

    let result = PlaylistSynchronizer::new(&service, &mut cache).sync(name, description, tracks);
    let closed = cache.close().context("Failed to close cache");
    let report = result.context("Playlist sync failed")?;
    closed?;

    println!("\n{:=<60}", "");
    match report.outcome {
        SyncOutcome::Created => println!("Created playlist '{}' ({})", name, report.playlist_key),
        SyncOutcome::Updated => println!("Updated playlist '{}' ({})", name, report.playlist_key),
    }
    println!(
        "  Found {} / {} tracks ({:.1}%)",
        report.placed,
        report.requested,
        report.match_rate()
    );
    for track in &report.unresolved {
        println!("  not found: {}", track);
    }
    println!("  Elapsed: {:.1?}", start.elapsed());
    println!("{:=<60}", "");
    Ok(())
}

fn run_resolve(config: &Config, artist: &str, title: &str) -> Result<()> {
    let service = HttpService::from_config(config);
    if !require_auth(&service) {
        return Ok(());
    }

    let mut cache = ResolutionCache::open(&config.cache_path)
        .with_context(|| format!("Failed to open cache {}", config.cache_path.display()))?;
    let track = RawTrackRef::new(artist, title);
    let result = PlaylistSynchronizer::new(&service, &mut cache).lookup(&track);
    let closed = cache.close().context("Failed to close cache");
    let found = result.context("Lookup failed")?;
    closed?;

    match found {
        Some(record) => println!("[{}] {} - {}", record.key, record.artist, record.name),
        None => println!("No match found for '{}'.", track),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);

    let config = load_config(&args)?;
    let level = if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        config.level_filter().context("Invalid log level")?
    };
    init_logging(level);
    config.validate().context("Invalid configuration")?;

    match args.command {
        Command::Sync {
            ref name,
            ref description,
            ref input,
            format,
            ref separator,
        } => {
            if separator.is_empty() {
                bail!("--separator must not be empty");
            }
            let reader = open_input(input)?;
            let tracks = ingest::read_pairs(reader, format, separator)
                .context("Failed to read track list")?;
            println!("Read {} tracks", tracks.len());
            run_sync(&config, name, description, &tracks)
        }
        Command::Resolve {
            ref artist,
            ref title,
        } => run_resolve(&config, artist, title),
        Command::CheckAuth => {
            let service = HttpService::from_config(&config);
            if service.authenticated() {
                println!("Authenticated.");
            } else {
                println!("Not authenticated.");
            }
            Ok(())
        }
    }
}
