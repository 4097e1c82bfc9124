use std::ffi::OsStr;
use std::future::Future;
use std::path::Path;

use log::{debug, trace};
use tokio::process::Command;

use crate::types::ToolError;

/// The two operations the pipeline needs from an external coverage tool
pub trait CoverageTool {
    /// Write an annotated copy of `artifact` into `annotate_dir` and return
    /// the textual report (whose first line is the coverage summary)
    fn annotate(
        &self,
        annotate_dir: &Path,
        artifact: &Path,
    ) -> impl Future<Output = Result<String, ToolError>> + Send;

    /// Merge `new` (and `prior`, if any) into a single artifact at `output`
    fn merge(
        &self,
        output: &Path,
        prior: Option<&Path>,
        new: &Path,
    ) -> impl Future<Output = Result<(), ToolError>> + Send;
}

/// `verilator_coverage`-compatible tool run as a child process
#[derive(Debug, Clone)]
pub struct ProcessTool {
    cmd: String,
}

impl ProcessTool {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    /// Run the tool to completion and return its stdout. No timeout is applied.
    async fn run(&self, args: &[&OsStr]) -> Result<String, ToolError> {
        let rendered = std::iter::once(self.cmd.as_str())
            .chain(args.iter().map(|a| a.to_str().unwrap_or("<non-utf8>")))
            .collect::<Vec<_>>()
            .join(" ");
        debug!("Running: {rendered}");

        let output = Command::new(&self.cmd)
            .args(args)
            .output()
            .await
            .map_err(|source| ToolError::Spawn {
                cmd: rendered.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolError::Failed {
                cmd: rendered,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!("{stdout}");
        Ok(stdout)
    }
}

impl CoverageTool for ProcessTool {
    async fn annotate(&self, annotate_dir: &Path, artifact: &Path) -> Result<String, ToolError> {
        self.run(&[
            OsStr::new("--annotate"),
            annotate_dir.as_os_str(),
            artifact.as_os_str(),
        ])
        .await
    }

    async fn merge(&self, output: &Path, prior: Option<&Path>, new: &Path) -> Result<(), ToolError> {
        let mut args = vec![OsStr::new("-write"), output.as_os_str()];
        if let Some(prior) = prior {
            args.push(prior.as_os_str());
        }
        args.push(new.as_os_str());
        self.run(&args).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let tool = ProcessTool::new("covtrend-definitely-not-installed");
        let err = tool
            .annotate(Path::new("annotated"), Path::new("coverage.dat"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_a_failure() {
        let tool = ProcessTool::new("false");
        let err = tool
            .merge(Path::new("out.dat"), None, Path::new("new.dat"))
            .await
            .unwrap_err();
        match err {
            ToolError::Failed { cmd, .. } => assert_eq!(cmd, "false -write out.dat new.dat"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
