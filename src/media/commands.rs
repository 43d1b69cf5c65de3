use std::path::Path;

use crate::process::ToolCommand;

/// ffmpeg command line under construction
#[derive(Debug, Clone)]
pub struct MediaCommand {
    inner: ToolCommand,
}

impl MediaCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            inner: ToolCommand::new(binary_path, description),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.inner = self.inner.arg(arg);
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Disable video
    pub fn no_video(self) -> Self {
        self.arg("-vn")
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Set audio bitrate
    pub fn audio_bitrate<S: Into<String>>(self, bitrate: S) -> Self {
        self.arg("-b:a").arg(bitrate)
    }

    /// Only print errors
    pub fn quiet(self) -> Self {
        self.arg("-hide_banner").arg("-loglevel").arg("error")
    }

    pub fn args(&self) -> &[String] {
        &self.inner.args
    }

    pub fn into_tool(self) -> ToolCommand {
        self.inner
    }
}

/// Builder for the ffmpeg invocations the pipeline needs
pub struct MediaCommandBuilder {
    binary_path: String,
}

impl MediaCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build audio conversion command
    pub fn convert_to_audio<P: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: P,
        codec: &str,
        bitrate: &str,
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Audio conversion")
            .quiet()
            .overwrite()
            .input(input_path)
            .no_video()
            .audio_codec(codec)
            .audio_bitrate(bitrate)
            .output(output_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check")
            .arg("-version")
    }
}
