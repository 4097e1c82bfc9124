//! In-process stand-in for the coverage tool, used by the test suites.
//!
//! Artifacts are plain text files listing one covered line number per line.
//! Merging takes the union of the inputs, so merged coverage can never drop
//! below either input.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::merge::ArtifactLayout;
use crate::core::tool::CoverageTool;
use crate::types::ToolError;

#[derive(Debug)]
pub struct FakeTool {
    total_lines: u64,
    fail_merge: bool,
    fail_annotate: bool,
    garbled_reports: bool,
    annotate_dirs: Mutex<Vec<PathBuf>>,
}

impl FakeTool {
    pub fn new(total_lines: u64) -> Self {
        Self {
            total_lines,
            fail_merge: false,
            fail_annotate: false,
            garbled_reports: false,
            annotate_dirs: Mutex::new(Vec::new()),
        }
    }

    /// Make every merge exit non-zero
    pub fn failing_merge(mut self) -> Self {
        self.fail_merge = true;
        self
    }

    /// Make every annotation exit non-zero after touching its scratch directory
    pub fn failing_annotate(mut self) -> Self {
        self.fail_annotate = true;
        self
    }

    /// Make annotation succeed but print a summary that cannot be parsed
    pub fn garbled_reports(mut self) -> Self {
        self.garbled_reports = true;
        self
    }

    /// Scratch directories handed to `annotate` so far
    pub fn annotate_dirs(&self) -> Vec<PathBuf> {
        self.annotate_dirs
            .lock()
            .map(|dirs| dirs.clone())
            .unwrap_or_default()
    }

    /// Write the raw artifact for entry `id` where the layout expects it
    pub fn write_raw(&self, layout: &ArtifactLayout, id: u64, lines: &[u64]) -> std::io::Result<()> {
        let path = layout.raw_artifact(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_lines(&path, lines.iter().copied())
    }

    pub fn report(&self, covered: u64) -> String {
        let percentage = 100.0 * covered as f64 / self.total_lines as f64;
        format!(
            "Total coverage ({covered}/{}) {percentage:.2}%\nSee lines with '%00' in annotated/\n",
            self.total_lines
        )
    }
}

fn read_lines(path: &Path) -> Result<BTreeSet<u64>, ToolError> {
    if !path.exists() {
        return Err(ToolError::MissingArtifact(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?
        .lines()
        .filter_map(|l| l.trim().parse().ok())
        .collect())
}

fn write_lines(path: &Path, lines: impl Iterator<Item = u64>) -> std::io::Result<()> {
    let body: String = lines.map(|l| format!("{l}\n")).collect();
    fs::write(path, body)
}

impl CoverageTool for FakeTool {
    async fn annotate(&self, annotate_dir: &Path, artifact: &Path) -> Result<String, ToolError> {
        if let Ok(mut dirs) = self.annotate_dirs.lock() {
            dirs.push(annotate_dir.to_path_buf());
        }
        let covered = read_lines(artifact)?;
        fs::write(annotate_dir.join("annotated.txt"), format!("{covered:?}"))?;
        if self.fail_annotate {
            return Err(ToolError::Failed {
                cmd: format!("fake --annotate {}", annotate_dir.display()),
                status: "exit status: 1".to_string(),
                stderr: "annotation refused".to_string(),
            });
        }
        if self.garbled_reports {
            return Ok("%Error: coverage summary unavailable\n".to_string());
        }
        Ok(self.report(covered.len() as u64))
    }

    async fn merge(&self, output: &Path, prior: Option<&Path>, new: &Path) -> Result<(), ToolError> {
        if self.fail_merge {
            return Err(ToolError::Failed {
                cmd: format!("fake -write {}", output.display()),
                status: "exit status: 1".to_string(),
                stderr: "merge refused".to_string(),
            });
        }
        let mut merged = read_lines(new)?;
        if let Some(prior) = prior {
            merged.extend(read_lines(prior)?);
        }
        write_lines(output, merged.into_iter())?;
        Ok(())
    }
}
