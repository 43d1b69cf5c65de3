// Media processing (transcode tool) abstraction
//
// - Processor: ffmpeg-backed implementation of the trait below
// - Commands: ffmpeg argument builders

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Main trait for media processing operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessorTrait: Send + Sync {
    /// Strip video streams and encode the audio of `input_path` into `output_path`
    async fn convert_to_audio(&self, input_path: &Path, output_path: &Path) -> Result<()>;

    /// Extension (without dot) of files produced by `convert_to_audio`
    fn audio_extension(&self) -> String;

    /// Check if media processor is available
    async fn check_availability(&self) -> Result<()>;

    /// Get media processor version information
    async fn get_version_info(&self) -> Result<String>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (FFmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessorTrait> {
        Box::new(processor::MediaProcessorImpl::new(config))
    }
}
