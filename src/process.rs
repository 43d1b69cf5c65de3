use std::fmt;
use tokio::process::Command;
use tracing::debug;

/// A fully built external tool invocation
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

/// Captured output of a successful invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug)]
pub enum ToolFailure {
    /// The binary could not be started at all (missing, not executable)
    Spawn(std::io::Error),
    /// The process ran and exited unsuccessfully
    Exit { code: Option<i32>, stderr: String },
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolFailure::Spawn(e) => write!(f, "failed to start: {}", e),
            ToolFailure::Exit { code: Some(code), stderr } => {
                write!(f, "exited with status {}: {}", code, stderr.trim())
            }
            ToolFailure::Exit { code: None, stderr } => {
                write!(f, "terminated by signal: {}", stderr.trim())
            }
        }
    }
}

impl ToolCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Run to completion and capture both output streams
    pub async fn execute(&self) -> std::result::Result<ToolOutput, ToolFailure> {
        debug!("Executing {}: {} {:?}", self.description, self.binary_path, self.args);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(ToolFailure::Spawn)?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ToolFailure::Exit {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_spawn_failure() {
        let cmd = ToolCommand::new("tubegrab-no-such-binary-xyz", "Missing tool");
        let err = cmd.execute().await.unwrap_err();
        assert!(matches!(err, ToolFailure::Spawn(_)));
    }

    #[tokio::test]
    async fn test_non_zero_exit_reports_code_and_stderr() {
        let cmd = ToolCommand::new("sh", "Failing tool")
            .arg("-c")
            .arg("echo broken >&2; exit 3");
        match cmd.execute().await.unwrap_err() {
            ToolFailure::Exit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr.trim(), "broken");
            }
            other => panic!("unexpected failure: {}", other),
        }
    }

    #[tokio::test]
    async fn test_stdout_is_captured() {
        let cmd = ToolCommand::new("sh", "Echo").args(["-c", "echo hello"]);
        let output = cmd.execute().await.unwrap();
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_failure_display() {
        let failure = ToolFailure::Exit { code: Some(1), stderr: "no such file\n".into() };
        assert_eq!(failure.to_string(), "exited with status 1: no such file");
    }
}
