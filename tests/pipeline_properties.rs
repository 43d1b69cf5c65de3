use assert_fs::prelude::*;
use assert_fs::TempDir;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tubegrab::error::{GrabError, Result, USER_FACING_ERROR};
use tubegrab::fetch::{Artifact, FetchProfile, FetcherTrait, MediaInfo};
use tubegrab::jobs::JobRunner;
use tubegrab::media::MediaProcessorTrait;
use tubegrab::pipeline::Pipeline;
use tubegrab::request::{OutputKind, Request};
use tubegrab::status::StatusEvent;

/// Writes `<title>.<ext>` into the template's directory, or fails
struct FakeFetcher {
    title: String,
    audio_ext: String,
    video_ext: String,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl FakeFetcher {
    fn new(calls: Arc<AtomicUsize>) -> Self {
        Self {
            title: "Never Gonna".to_string(),
            audio_ext: "webm".to_string(),
            video_ext: "mkv".to_string(),
            fail: false,
            calls,
        }
    }
}

#[async_trait]
impl FetcherTrait for FakeFetcher {
    async fn fetch(&self, _locator: &str, profile: &FetchProfile) -> Result<Artifact> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GrabError::Fetch("ERROR: Unsupported URL".to_string()));
        }
        let ext = if profile.format.starts_with("bestvideo") {
            &self.video_ext
        } else {
            &self.audio_ext
        };
        let dir = profile.output_template.parent().unwrap_or(Path::new("."));
        let path = dir.join(format!("{}.{}", self.title, ext));
        std::fs::write(&path, b"media")?;
        Ok(Artifact::from_path(path))
    }

    async fn probe(&self, _locator: &str) -> Result<MediaInfo> {
        Err(GrabError::Fetch("not supported by fake".to_string()))
    }

    async fn check_availability(&self) -> Result<()> {
        Ok(())
    }

    async fn get_version_info(&self) -> Result<String> {
        Ok("fake".to_string())
    }
}

/// Copies input to output, or fails like a non-zero ffmpeg exit
struct FakeMedia {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl MediaProcessorTrait for FakeMedia {
    async fn convert_to_audio(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GrabError::Convert("ffmpeg exited with status 1".to_string()));
        }
        std::fs::copy(input_path, output_path)?;
        Ok(())
    }

    fn audio_extension(&self) -> String {
        "mp3".to_string()
    }

    async fn check_availability(&self) -> Result<()> {
        Ok(())
    }

    async fn get_version_info(&self) -> Result<String> {
        Ok("fake".to_string())
    }
}

struct Harness {
    pipeline: Pipeline,
    fetch_calls: Arc<AtomicUsize>,
    convert_calls: Arc<AtomicUsize>,
}

fn harness(fetch_fails: bool, convert_fails: bool) -> Harness {
    let fetch_calls = Arc::new(AtomicUsize::new(0));
    let convert_calls = Arc::new(AtomicUsize::new(0));
    let mut fetcher = FakeFetcher::new(fetch_calls.clone());
    fetcher.fail = fetch_fails;
    let media = FakeMedia { fail: convert_fails, calls: convert_calls.clone() };

    Harness {
        pipeline: Pipeline::with_tools(Box::new(fetcher), Box::new(media)),
        fetch_calls,
        convert_calls,
    }
}

async fn run(pipeline: &Pipeline, request: &Request) -> (Result<PathBuf>, Vec<StatusEvent>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let mut on_status = move |event: StatusEvent| sink.lock().unwrap().push(event);
    let result = pipeline.run(request, &mut on_status).await;
    let events = events.lock().unwrap().clone();
    (result, events)
}

fn terminal_count(events: &[StatusEvent]) -> usize {
    events.iter().filter(|e| e.is_terminal()).count()
}

fn request(kind: OutputKind, dir: &TempDir) -> Request {
    let locator = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    Request::new(locator, kind, Some(dir.path().to_path_buf())).unwrap()
}

#[tokio::test]
async fn audio_only_leaves_only_the_converted_file() {
    let dir = TempDir::new().unwrap();
    let h = harness(false, false);

    let (result, events) = run(&h.pipeline, &request(OutputKind::AudioOnly, &dir)).await;
    let final_path = result.unwrap();

    assert_eq!(terminal_count(&events), 1);
    assert_eq!(events.last(), Some(&StatusEvent::Completed(final_path.clone())));
    assert_eq!(final_path.extension().unwrap(), "mp3");
    assert!(dir.child("Never Gonna.mp3").path().exists());
    assert!(!dir.child("Never Gonna.webm").path().exists());
    assert_eq!(h.convert_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn audio_video_completes_with_existing_file() {
    let dir = TempDir::new().unwrap();
    let h = harness(false, false);

    let (result, events) = run(&h.pipeline, &request(OutputKind::AudioVideo, &dir)).await;
    let final_path = result.unwrap();

    assert_eq!(terminal_count(&events), 1);
    assert!(final_path.starts_with(dir.path()));
    assert!(final_path.exists());
    assert_eq!(h.convert_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fetch_failure_emits_one_failed_and_leaves_nothing() {
    let dir = TempDir::new().unwrap();
    let h = harness(true, false);

    let (result, events) = run(&h.pipeline, &request(OutputKind::AudioOnly, &dir)).await;

    assert!(matches!(result, Err(GrabError::Fetch(_))));
    assert_eq!(terminal_count(&events), 1);
    assert_eq!(events.last(), Some(&StatusEvent::Failed(USER_FACING_ERROR.to_string())));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(h.convert_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn convert_failure_keeps_the_fetched_file() {
    let dir = TempDir::new().unwrap();
    let h = harness(false, true);

    let (result, events) = run(&h.pipeline, &request(OutputKind::AudioOnly, &dir)).await;

    assert!(matches!(result, Err(GrabError::Convert(_))));
    assert_eq!(terminal_count(&events), 1);
    assert!(events.contains(&StatusEvent::Converting));
    assert!(dir.child("Never Gonna.webm").path().exists());
}

#[tokio::test]
async fn repeated_runs_are_independent() {
    let dir = TempDir::new().unwrap();
    let h = harness(false, false);
    let request = request(OutputKind::AudioOnly, &dir);

    let (first, first_events) = run(&h.pipeline, &request).await;
    let (second, second_events) = run(&h.pipeline, &request).await;

    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(first_events, second_events);
    assert_eq!(h.fetch_calls.load(Ordering::SeqCst), 2);
    assert!(dir.child("Never Gonna.mp3").path().exists());
}

#[tokio::test]
async fn invalid_input_never_reaches_the_tools() {
    let h = harness(false, false);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let mut on_status = move |event: StatusEvent| sink.lock().unwrap().push(event);

    let empty = h.pipeline.submit("", "mp3", None, &mut on_status).await;
    assert!(matches!(empty, Err(GrabError::InvalidRequest(_))));

    let flac = h.pipeline.submit("https://example.com/v", "FLAC", None, &mut on_status).await;
    assert!(matches!(flac, Err(GrabError::UnsupportedFormat(_))));

    assert!(events.lock().unwrap().is_empty());
    assert_eq!(h.fetch_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.convert_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn worker_jobs_deliver_events_over_the_channel() {
    let dir = TempDir::new().unwrap();
    let h = harness(false, false);
    let runner = JobRunner::new(Arc::new(h.pipeline));

    let mut job = runner.spawn(request(OutputKind::AudioOnly, &dir));
    let mut statuses = Vec::new();
    while let Some(event) = job.next_event().await {
        statuses.push(event.status);
    }

    assert_eq!(statuses.first(), Some(&StatusEvent::Started));
    assert_eq!(terminal_count(&statuses), 1);
    assert!(job.wait().await.unwrap().exists());
}
