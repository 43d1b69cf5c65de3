//! Tubegrab - download video or audio from a URL
//!
//! Command-line front end: collects the URL and format, dispatches the
//! pipeline onto a worker task and renders its status events.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use tubegrab::cli::{parse_batch_file, Args, Commands};
use tubegrab::config::Config;
use tubegrab::display::Spinner;
use tubegrab::error::GrabError;
use tubegrab::jobs::JobRunner;
use tubegrab::pipeline::Pipeline;
use tubegrab::request::Request;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;
    info!("Starting Tubegrab");

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    let runner = JobRunner::new(Arc::new(Pipeline::new(config.clone())));

    match args.command {
        Commands::Download { url, format, output_dir } => {
            let request = validate_input(&url, &format, output_dir)?;
            run_job(&runner, request, args.json).await?;
        }
        Commands::Batch { input, format, output_dir } => {
            let content = std::fs::read_to_string(&input)?;
            let urls = parse_batch_file(&content);
            info!("Found {} URLs in {}", urls.len(), input.display());

            let mut failed = 0usize;
            for url in &urls {
                let result = match validate_input(url, &format, output_dir.clone()) {
                    Ok(request) => run_job(&runner, request, args.json).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    warn!("Failed to process {}: {}", url, e);
                    failed += 1;
                }
            }

            info!("Batch finished: {} succeeded, {} failed", urls.len() - failed, failed);
            if failed > 0 {
                anyhow::bail!("{} of {} downloads failed", failed, urls.len());
            }
        }
        Commands::Info { url } => {
            let metadata = runner.pipeline().fetcher().probe(&url).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                println!("Title:    {}", metadata.title);
                println!("ID:       {}", metadata.id);
                if let Some(uploader) = &metadata.uploader {
                    println!("Uploader: {}", uploader);
                }
                if let Some(duration) = metadata.duration {
                    println!("Duration: {}", format_duration(duration as u64));
                }
                if let Some(ext) = &metadata.ext {
                    println!("Format:   {}", ext);
                }
                if let Some(filename) = &metadata.filename {
                    println!("Filename: {}", filename);
                }
                if let Some(page) = &metadata.webpage_url {
                    println!("Page:     {}", page);
                }
            }
        }
        Commands::Check => {
            let pipeline = runner.pipeline();
            let mut missing = Vec::new();

            match pipeline.fetcher().get_version_info().await {
                Ok(version) => println!("fetch tool:     {}", version),
                Err(e) => {
                    println!("fetch tool:     unavailable ({})", e);
                    missing.push(config.fetcher.binary_path.clone());
                }
            }
            match pipeline.media().get_version_info().await {
                Ok(version) => println!("transcode tool: {}", version),
                Err(e) => {
                    println!("transcode tool: unavailable ({})", e);
                    missing.push(config.media.binary_path.clone());
                }
            }

            if !missing.is_empty() {
                anyhow::bail!("missing tools: {}", missing.join(", "));
            }
        }
        Commands::InitConfig { path } => {
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            Config::default().save_to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    info!("Tubegrab completed successfully");
    Ok(())
}

/// Check the raw inputs the way the form did before ever starting a download
fn validate_input(url: &str, format: &str, output_dir: Option<PathBuf>) -> Result<Request> {
    Request::parse(url, format, output_dir.as_deref()).map_err(|e| {
        let message = match &e {
            GrabError::InvalidRequest(_) => "Please enter a valid URL!",
            GrabError::UnsupportedFormat(_) => "Please select a valid format!",
            _ => tubegrab::error::USER_FACING_ERROR,
        };
        eprintln!("{}", message);
        anyhow::Error::new(e)
    })
}

/// Run one request on a worker task and render its events until it ends
async fn run_job(runner: &JobRunner, request: Request, json: bool) -> Result<PathBuf> {
    let mut job = runner.spawn(request);
    let mut spinner = if json { None } else { Some(Spinner::new()) };

    while let Some(event) = job.next_event().await {
        match spinner.as_mut() {
            Some(spinner) => spinner.apply(&event),
            None => println!("{}", serde_json::to_string(&event)?),
        }
    }

    Ok(job.wait().await?)
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".tubegrab").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "tubegrab.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("tubegrab.log").display());

    Ok(())
}

/// Format duration in seconds to human readable string
fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
