use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{GrabError, Result, USER_FACING_ERROR};
use crate::fetch::{Artifact, FetchProfile, FetcherFactory, FetcherTrait};
use crate::media::{MediaProcessorFactory, MediaProcessorTrait};
use crate::request::{OutputKind, Request};
use crate::status::StatusEvent;

/// Receives status events for one run
pub type StatusCallback<'a> = dyn FnMut(StatusEvent) + Send + 'a;

/// Fetch-and-convert pipeline. Holds no per-run state, so one instance can
/// serve any number of runs.
pub struct Pipeline {
    fetcher: Box<dyn FetcherTrait>,
    media: Box<dyn MediaProcessorTrait>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            fetcher: FetcherFactory::create_fetcher(config.fetcher),
            media: MediaProcessorFactory::create_processor(config.media),
        }
    }

    pub fn with_tools(fetcher: Box<dyn FetcherTrait>, media: Box<dyn MediaProcessorTrait>) -> Self {
        Self { fetcher, media }
    }

    pub fn fetcher(&self) -> &dyn FetcherTrait {
        self.fetcher.as_ref()
    }

    pub fn media(&self) -> &dyn MediaProcessorTrait {
        self.media.as_ref()
    }

    /// Validate raw inputs, then run. Invalid inputs are rejected before
    /// any event is emitted or any tool is invoked.
    pub async fn submit(
        &self,
        locator: &str,
        kind: &str,
        destination: Option<&Path>,
        on_status: &mut StatusCallback<'_>,
    ) -> Result<PathBuf> {
        let request = Request::parse(locator, kind, destination)?;
        self.run(&request, on_status).await
    }

    /// Run one request. Exactly one terminal event (Completed or Failed) is
    /// emitted; the detailed error is returned, the event only carries the
    /// generic user-facing message.
    pub async fn run(
        &self,
        request: &Request,
        on_status: &mut StatusCallback<'_>,
    ) -> Result<PathBuf> {
        on_status(StatusEvent::Started);

        match self.execute(request, on_status).await {
            Ok(final_path) => {
                info!("Request for {} completed: {}", request.locator(), final_path.display());
                on_status(StatusEvent::Completed(final_path.clone()));
                Ok(final_path)
            }
            Err(e) => {
                error!("Request for {} ({}) failed: {}", request.locator(), request.kind(), e);
                on_status(StatusEvent::Failed(USER_FACING_ERROR.to_string()));
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        request: &Request,
        on_status: &mut StatusCallback<'_>,
    ) -> Result<PathBuf> {
        let destination = request.destination();
        ensure_directory(destination).await?;

        on_status(StatusEvent::Downloading);
        info!("Downloading {} from: {}", request.kind(), request.locator());

        let profile = FetchProfile::for_kind(request.kind(), destination);
        let artifact = self.fetcher.fetch(request.locator(), &profile).await?;

        match request.kind() {
            OutputKind::AudioVideo => Ok(artifact.path),
            OutputKind::AudioOnly => self.convert_to_audio(artifact, on_status).await,
        }
    }

    async fn convert_to_audio(
        &self,
        artifact: Artifact,
        on_status: &mut StatusCallback<'_>,
    ) -> Result<PathBuf> {
        let target_extension = self.media.audio_extension();
        if artifact.extension.eq_ignore_ascii_case(&target_extension) {
            info!(
                "{} is already {}; skipping conversion",
                artifact.path.display(),
                target_extension
            );
            return Ok(artifact.path);
        }

        let audio_path = artifact.path.with_extension(&target_extension);

        on_status(StatusEvent::Converting);
        info!("Converting {} to {}...", artifact.path.display(), target_extension);
        self.media.convert_to_audio(&artifact.path, &audio_path).await?;

        // The converted file exists at this point; a leftover source is only worth a warning.
        if let Err(e) = fs::remove_file(&artifact.path).await {
            let err = GrabError::Cleanup(format!("{}: {}", artifact.path.display(), e));
            warn!("{}", err);
        }

        Ok(audio_path)
    }
}

async fn ensure_directory(path: &Path) -> Result<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(GrabError::Directory(format!("{} is not a directory", path.display()))),
        Err(e) => Err(GrabError::Directory(format!("{}: {}", path.display(), e))),
    }
}
