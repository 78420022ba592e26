use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ghreport_client::GitHubClient;
use ghreport_config::{get_config_path, Config};
use ghreport_output::{format_profile, format_repositories};
use tracing::debug;
use tracing_subscriber::EnvFilter;

static PROFILING_ENABLED: AtomicBool = AtomicBool::new(false);

fn profile_start(name: &str) -> (Instant, &str) {
    (Instant::now(), name)
}

fn profile_end((start, name): (Instant, &str)) {
    if PROFILING_ENABLED.load(Ordering::Relaxed) {
        let elapsed = start.elapsed();
        eprintln!(
            "[profile] {:>8.2}ms  {}",
            elapsed.as_secs_f64() * 1000.0,
            name
        );
    }
}

const MAIN_HELP: &str = r#"ghreport looks up a GitHub user's public profile and repositories and
writes them to a plain-text report named after the user's login.

`ghreport report USERNAME` writes USERNAME.txt into the output directory.
`ghreport profile` and `ghreport repos` print the same sections to stdout
without writing anything.

Only the first page of repositories is listed, and requests are
unauthenticated, so GitHub's anonymous rate limits apply."#;

#[derive(Parser)]
#[command(name = "ghreport")]
#[command(about = MAIN_HELP)]
#[command(version)]
struct Cli {
    #[arg(long, global = true, env = "GHREPORT_CONFIG", help = "Path to config file")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log requests and other debug output to stderr")]
    verbose: bool,

    #[arg(long, global = true, help = "Print timing information for profiling")]
    profile: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Fetch a user's profile and repositories and write LOGIN.txt.")]
    Report {
        #[arg(help = "GitHub username")]
        username: String,
        #[arg(short, long, help = "Directory to write the report into (default: from config)")]
        output_dir: Option<PathBuf>,
    },

    #[command(about = "Print a user's profile.")]
    Profile {
        #[arg(help = "GitHub username")]
        username: String,
    },

    #[command(about = "Print a user's repositories.")]
    Repos {
        #[arg(help = "GitHub username")]
        username: String,
    },

    #[command(about = "Print config file location and contents.")]
    Config {
        #[arg(long, help = "Write a config file with the default settings if none exists")]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let total_start = profile_start("total");
    let cli = Cli::parse();

    if cli.profile {
        PROFILING_ENABLED.store(true, Ordering::Relaxed);
    }

    let config_path = cli.config.clone().unwrap_or_else(get_config_path);
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    init_logging(&config, cli.verbose);
    debug!("Using config {}", config_path.display());

    let result = match cli.command {
        Commands::Config { init } => handle_config(&config_path, init),
        Commands::Report {
            username,
            output_dir,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| config.output.directory.clone());
            handle_report(&config, &username, &output_dir).await
        }
        Commands::Profile { username } => handle_profile(&config, &username).await,
        Commands::Repos { username } => handle_repos(&config, &username).await,
    };

    profile_end(total_start);
    result
}

/// `-v` beats `RUST_LOG`, which beats the configured level.
fn log_directives(config: &Config, verbose: bool, rust_log: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| config.logging.level.clone())
}

fn init_logging(config: &Config, verbose: bool) {
    let directives = log_directives(config, verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_config(config_path: &Path, init: bool) -> Result<()> {
    if init {
        if config_path.exists() {
            bail!("Config file {} already exists", config_path.display());
        }
        Config::default()
            .save_to(config_path)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!("Wrote default config to {}", config_path.display());
        return Ok(());
    }

    println!("Config file: {}", config_path.display());
    println!();

    if config_path.exists() {
        println!("{}", std::fs::read_to_string(config_path)?);
    } else {
        println!("(file does not exist, using defaults)");
    }
    Ok(())
}

fn build_client(config: &Config) -> Result<GitHubClient> {
    GitHubClient::new(&config.api).context("Failed to set up GitHub client")
}

async fn handle_report(config: &Config, username: &str, output_dir: &Path) -> Result<()> {
    let client = build_client(config)?;

    let t = profile_start("fetch");
    let report = client.fetch_report(username).await?;
    profile_end(t);

    let t = profile_start("write");
    let path = ghreport_fs::write_report(output_dir, &report)
        .with_context(|| format!("Failed to write report for {}", username))?;
    profile_end(t);

    println!("{}", path.display());
    Ok(())
}

async fn handle_profile(config: &Config, username: &str) -> Result<()> {
    let client = build_client(config)?;

    let t = profile_start("fetch_profile");
    let profile = client.fetch_profile(username).await?;
    profile_end(t);

    println!("{}", format_profile(&profile));
    Ok(())
}

async fn handle_repos(config: &Config, username: &str) -> Result<()> {
    let client = build_client(config)?;

    let t = profile_start("fetch_repositories");
    let repositories = client.fetch_repositories(username).await?;
    profile_end(t);

    if repositories.is_empty() {
        println!("{} has no public repositories", username);
    } else {
        println!("{}", format_repositories(&repositories));
    }
    Ok(())
}
