use async_trait::async_trait;
use std::path::Path;
use tracing::{info, debug};

use crate::config::MediaConfig;
use crate::error::{Result, GrabError};
use crate::process::ToolFailure;
use super::{MediaProcessorTrait, MediaCommandBuilder};

/// Concrete implementation of media processor (FFmpeg-based)
pub struct MediaProcessorImpl {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl MediaProcessorImpl {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

fn convert_error(failure: ToolFailure) -> GrabError {
    match failure {
        ToolFailure::Spawn(e) => GrabError::Convert(format!("Media processor not found: {}", e)),
        other => GrabError::Convert(format!("ffmpeg {}", other)),
    }
}

#[async_trait]
impl MediaProcessorTrait for MediaProcessorImpl {
    async fn convert_to_audio(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        info!("Converting {} to {} ({} @ {})",
              input_path.display(), output_path.display(),
              self.config.audio_codec, self.config.audio_bitrate);

        let command = self.command_builder.convert_to_audio(
            input_path,
            output_path,
            &self.config.audio_codec,
            &self.config.audio_bitrate,
        );

        command.into_tool().execute().await.map_err(convert_error)?;

        info!("Audio conversion completed");
        Ok(())
    }

    fn audio_extension(&self) -> String {
        self.config.audio_extension.clone()
    }

    async fn check_availability(&self) -> Result<()> {
        self.command_builder
            .version_check()
            .into_tool()
            .execute()
            .await
            .map_err(convert_error)?;

        info!("Media processor is available");
        Ok(())
    }

    async fn get_version_info(&self) -> Result<String> {
        debug!("Getting media processor version information");

        let output = self.command_builder
            .version_check()
            .into_tool()
            .execute()
            .await
            .map_err(convert_error)?;

        // First line carries the version, e.g. "ffmpeg version 6.1.1 ..."
        let first_line = output.stdout.lines().next().unwrap_or("Unknown version");
        Ok(first_line.to_string())
    }
}
