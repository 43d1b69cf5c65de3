use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, GrabError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Path to the fetch tool binary (e.g., yt-dlp)
    pub binary_path: String,
    /// Suppress the fetch tool's own console output
    pub quiet: bool,
    /// Only fetch the single item a URL points to, never a whole playlist
    pub no_playlist: bool,
    /// Additional arguments passed verbatim before the URL
    /// Common options: ["--cookies-from-browser", "firefox"], ["--limit-rate", "2M"]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Audio encoder used for audio-only requests
    pub audio_codec: String,
    /// Target audio bitrate (ffmpeg syntax, e.g. "192k")
    pub audio_bitrate: String,
    /// Extension of the converted audio file
    pub audio_extension: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            binary_path: "yt-dlp".to_string(),
            quiet: false,
            no_playlist: true,
            extra_args: vec![
                // Example options users can customize:
                // "--cookies-from-browser".to_string(), "firefox".to_string(),
                // "--limit-rate".to_string(), "2M".to_string(),
            ],
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            audio_codec: "libmp3lame".to_string(),
            audio_bitrate: "192k".to_string(),
            audio_extension: "mp3".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GrabError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GrabError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| GrabError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
