use std::path::Path;

use crate::process::ToolCommand;
use super::FetchProfile;

/// Prefix that marks the line carrying the final file path in yt-dlp's stdout
pub const OUTPUT_MARKER: &str = "TUBEGRAB_OUTPUT|";

/// yt-dlp command line under construction
#[derive(Debug, Clone)]
pub struct FetchCommand {
    inner: ToolCommand,
}

impl FetchCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            inner: ToolCommand::new(binary_path, description),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.inner = self.inner.arg(arg);
        self
    }

    pub fn format<S: Into<String>>(self, selector: S) -> Self {
        self.arg("-f").arg(selector)
    }

    pub fn output_template<P: AsRef<Path>>(self, template: P) -> Self {
        self.arg("-o").arg(template.as_ref().to_string_lossy().to_string())
    }

    /// Print the final path once the file has been moved into place.
    /// `after_move` runs after merging and post-processing, so it names the
    /// file that is actually on disk.
    pub fn print_final_path(self) -> Self {
        self.arg("--print")
            .arg(format!("after_move:{}%(filepath)s", OUTPUT_MARKER))
            .arg("--no-simulate")
    }

    pub fn no_playlist(self, enabled: bool) -> Self {
        if enabled { self.arg("--no-playlist") } else { self }
    }

    pub fn verbosity(self, quiet: bool) -> Self {
        if quiet { self.arg("--quiet") } else { self.arg("--no-quiet") }
    }

    pub fn locator<S: Into<String>>(self, locator: S) -> Self {
        // `--` stops a locator starting with '-' being read as an option
        self.arg("--").arg(locator)
    }

    pub fn args(&self) -> &[String] {
        &self.inner.args
    }

    pub fn into_tool(self) -> ToolCommand {
        self.inner
    }
}

/// Builder for the yt-dlp invocations the fetcher needs
pub struct FetchCommandBuilder {
    binary_path: String,
}

impl FetchCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build download command
    pub fn download(
        &self,
        locator: &str,
        profile: &FetchProfile,
        quiet: bool,
        no_playlist: bool,
        extra_args: &[String],
    ) -> FetchCommand {
        let mut cmd = FetchCommand::new(&self.binary_path, "Download")
            .no_playlist(no_playlist)
            .format(&profile.format)
            .output_template(&profile.output_template)
            .print_final_path()
            .verbosity(quiet);

        for option in extra_args {
            cmd = cmd.arg(option);
        }

        cmd.locator(locator)
    }

    /// Build metadata probe command (single JSON document on stdout)
    pub fn probe(&self, locator: &str, no_playlist: bool, extra_args: &[String]) -> FetchCommand {
        let mut cmd = FetchCommand::new(&self.binary_path, "Metadata probe")
            .arg("-J")
            .no_playlist(no_playlist);

        for option in extra_args {
            cmd = cmd.arg(option);
        }

        cmd.locator(locator)
    }

    /// Build version check command
    pub fn version_check(&self) -> FetchCommand {
        FetchCommand::new(&self.binary_path, "Version check")
            .arg("--version")
    }
}

/// Find the final path printed by `print_final_path`. The last marked line wins.
pub fn parse_final_path(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .rev()
        .filter_map(|line| line.trim_end_matches('\r').strip_prefix(OUTPUT_MARKER))
        .map(str::trim)
        .find(|path| !path.is_empty())
}
