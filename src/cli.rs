use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print status events as JSON lines instead of a spinner
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a single URL
    Download {
        /// Source URL
        #[arg(short, long)]
        url: String,

        /// Output format: mp3 (audio only) or mp4 (video with audio)
        #[arg(short, long, default_value = "mp3")]
        format: String,

        /// Directory to save into (must exist; defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Download every URL listed in a file, one per line
    Batch {
        /// File with one URL per line; blank lines and lines starting with '#' are skipped
        #[arg(short, long)]
        input: PathBuf,

        /// Output format: mp3 (audio only) or mp4 (video with audio)
        #[arg(short, long, default_value = "mp3")]
        format: String,

        /// Directory to save into (must exist; defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Show metadata for a URL without downloading it
    Info {
        /// Source URL
        #[arg(short, long)]
        url: String,
    },

    /// Check that yt-dlp and ffmpeg can be run
    Check,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "config.toml")]
        path: PathBuf,
    },
}

/// URLs from a batch file, in order
pub fn parse_batch_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
