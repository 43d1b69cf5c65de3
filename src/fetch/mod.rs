// Fetch tool abstraction
//
// The fetch tool resolves a locator to a media stream and writes it to disk.
// `ytdlp` is the only backend; the trait exists so the pipeline can run
// against anything that produces an `Artifact`.

pub mod commands;
pub mod ytdlp;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use commands::*;
pub use ytdlp::*;

use crate::config::FetcherConfig;
use crate::error::Result;
use crate::request::OutputKind;

/// Format selector for audio-only requests
pub const AUDIO_ONLY_FORMAT: &str = "bestaudio/best";
/// Format selector for video requests; falls back to the best single stream
pub const AUDIO_VIDEO_FORMAT: &str = "bestvideo+bestaudio/best";
/// Output file name template, relative to the destination directory
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// What to ask the fetch tool for and where to put it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchProfile {
    pub format: String,
    pub output_template: PathBuf,
}

impl FetchProfile {
    pub fn for_kind(kind: OutputKind, destination: &Path) -> Self {
        let format = match kind {
            OutputKind::AudioOnly => AUDIO_ONLY_FORMAT,
            OutputKind::AudioVideo => AUDIO_VIDEO_FORMAT,
        };

        Self {
            format: format.to_string(),
            output_template: destination.join(OUTPUT_TEMPLATE),
        }
    }
}

/// A file written by the fetch step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    /// Container extension without the dot; empty when the file has none
    pub extension: String,
}

impl Artifact {
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Self { path, extension }
    }
}

/// Source metadata as reported by the fetch tool, without downloading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub ext: Option<String>,
    /// File name the tool would write, resolved against its output template
    #[serde(default, rename = "_filename")]
    pub filename: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
    /// Canonical page the locator resolved to
    #[serde(default)]
    pub webpage_url: Option<String>,
}

/// Main trait for fetch operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FetcherTrait: Send + Sync {
    /// Download `locator` according to `profile` and report the file written
    async fn fetch(&self, locator: &str, profile: &FetchProfile) -> Result<Artifact>;

    /// Query metadata for `locator` without downloading
    async fn probe(&self, locator: &str) -> Result<MediaInfo>;

    /// Check if the fetch tool is available
    async fn check_availability(&self) -> Result<()>;

    /// Get fetch tool version information
    async fn get_version_info(&self) -> Result<String>;
}

/// Factory for creating fetcher instances
pub struct FetcherFactory;

impl FetcherFactory {
    /// Create the default fetcher implementation (yt-dlp based)
    pub fn create_fetcher(config: FetcherConfig) -> Box<dyn FetcherTrait> {
        Box::new(ytdlp::YtDlpFetcher::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_selection() {
        let dir = Path::new("/tmp/out");

        let audio = FetchProfile::for_kind(OutputKind::AudioOnly, dir);
        assert_eq!(audio.format, "bestaudio/best");
        assert_eq!(audio.output_template, Path::new("/tmp/out/%(title)s.%(ext)s"));

        let video = FetchProfile::for_kind(OutputKind::AudioVideo, dir);
        assert_eq!(video.format, "bestvideo+bestaudio/best");
    }

    #[test]
    fn test_artifact_extension() {
        let artifact = Artifact::from_path("/tmp/out/My Song.WEBM");
        assert_eq!(artifact.extension, "webm");

        let bare = Artifact::from_path("/tmp/out/noext");
        assert_eq!(bare.extension, "");
    }

    #[test]
    fn test_media_info_accepts_ytdlp_filename_key() {
        let json = r#"{
            "id": "abc",
            "title": "Song",
            "ext": "webm",
            "filename": "Song.webm",
            "_filename": "Song.webm",
            "duration": 12.5,
            "webpage_url": "https://example.com/watch?v=abc"
        }"#;
        let info: MediaInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.filename.as_deref(), Some("Song.webm"));
        assert_eq!(info.duration, Some(12.5));
        assert!(info.uploader.is_none());
        assert_eq!(info.webpage_url.as_deref(), Some("https://example.com/watch?v=abc"));
    }
}
