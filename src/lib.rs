//! Tubegrab - download video or audio from a URL
//!
//! Retrieval is delegated to yt-dlp and audio conversion to ffmpeg. The crate
//! wires the two together into a pipeline that reports its progress through
//! status events.

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod fetch;
pub mod jobs;
pub mod media;
pub mod pipeline;
pub mod process;
pub mod request;
pub mod status;
