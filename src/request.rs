use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{GrabError, Result};

/// What the caller wants to end up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputKind {
    /// Best audio stream, transcoded to an audio file
    AudioOnly,
    /// Best combined video and audio, kept in the container the fetch tool produced
    AudioVideo,
}

impl FromStr for OutputKind {
    type Err = GrabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mp3" | "audio" => Ok(OutputKind::AudioOnly),
            "mp4" | "video" => Ok(OutputKind::AudioVideo),
            _ => Err(GrabError::UnsupportedFormat(format!(
                "'{}'. Valid formats: mp3, mp4",
                s
            ))),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::AudioOnly => write!(f, "MP3"),
            OutputKind::AudioVideo => write!(f, "MP4"),
        }
    }
}

/// A single download request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    locator: String,
    kind: OutputKind,
    destination: PathBuf,
}

impl Request {
    /// Build a request; `destination` defaults to the current directory.
    pub fn new<S: Into<String>>(
        locator: S,
        kind: OutputKind,
        destination: Option<PathBuf>,
    ) -> Result<Self> {
        let locator = locator.into().trim().to_string();
        if locator.is_empty() {
            return Err(GrabError::InvalidRequest("locator must not be empty".to_string()));
        }

        Ok(Self {
            locator,
            kind,
            destination: destination.unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    /// Build a request from raw front-end strings
    pub fn parse(locator: &str, kind: &str, destination: Option<&Path>) -> Result<Self> {
        let kind = kind.parse::<OutputKind>()?;
        Self::new(locator, kind, destination.map(Path::to_path_buf))
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}
