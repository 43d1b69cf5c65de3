use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, debug};

use crate::config::FetcherConfig;
use crate::error::{Result, GrabError};
use crate::process::ToolFailure;
use super::{Artifact, FetchCommandBuilder, FetchProfile, FetcherTrait, MediaInfo, parse_final_path};

/// yt-dlp backed fetcher
pub struct YtDlpFetcher {
    config: FetcherConfig,
    command_builder: FetchCommandBuilder,
}

impl YtDlpFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        let command_builder = FetchCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

fn fetch_error(failure: ToolFailure) -> GrabError {
    match failure {
        ToolFailure::Spawn(e) => GrabError::Fetch(format!("Fetch tool not found: {}", e)),
        other => GrabError::Fetch(format!("yt-dlp {}", other)),
    }
}

#[async_trait]
impl FetcherTrait for YtDlpFetcher {
    async fn fetch(&self, locator: &str, profile: &FetchProfile) -> Result<Artifact> {
        info!("Downloading {} with format '{}'", locator, profile.format);

        let command = self.command_builder.download(
            locator,
            profile,
            self.config.quiet,
            self.config.no_playlist,
            &self.config.extra_args,
        );

        let output = command.into_tool().execute().await.map_err(fetch_error)?;

        for line in output.stdout.lines() {
            debug!("yt-dlp: {}", line);
        }
        // Warnings (throttling, format fallbacks) arrive on stderr even on success
        for line in output.stderr.lines() {
            debug!("yt-dlp stderr: {}", line);
        }

        let path = parse_final_path(&output.stdout).ok_or_else(|| {
            GrabError::Fetch("yt-dlp finished without reporting an output file".to_string())
        })?;

        let artifact = Artifact::from_path(PathBuf::from(path));
        if !artifact.path.is_file() {
            return Err(GrabError::Fetch(format!(
                "yt-dlp reported {} but no such file exists",
                artifact.path.display()
            )));
        }

        info!("Download completed: {}", artifact.path.display());
        Ok(artifact)
    }

    async fn probe(&self, locator: &str) -> Result<MediaInfo> {
        debug!("Probing metadata for {}", locator);

        let command = self.command_builder.probe(
            locator,
            self.config.no_playlist,
            &self.config.extra_args,
        );
        let output = command.into_tool().execute().await.map_err(fetch_error)?;

        Ok(serde_json::from_str(&output.stdout)?)
    }

    async fn check_availability(&self) -> Result<()> {
        self.command_builder
            .version_check()
            .into_tool()
            .execute()
            .await
            .map_err(fetch_error)?;

        info!("Fetch tool is available");
        Ok(())
    }

    async fn get_version_info(&self) -> Result<String> {
        let output = self.command_builder
            .version_check()
            .into_tool()
            .execute()
            .await
            .map_err(fetch_error)?;

        let version = output.stdout.lines().next().unwrap_or("Unknown version").trim();
        Ok(format!("yt-dlp {}", version))
    }
}
