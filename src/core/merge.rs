use std::path::{Path, PathBuf};

use log::debug;

use crate::core::extract::parse_summary;
use crate::core::tool::CoverageTool;
use crate::types::{CoverageSample, StepError, TestEntry, ToolError};

/// Where a run's coverage artifacts live
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    run_dir: PathBuf,
    raw_template: String,
}

impl ArtifactLayout {
    pub fn new(run_dir: impl Into<PathBuf>, raw_template: impl Into<String>) -> Self {
        Self {
            run_dir: run_dir.into(),
            raw_template: raw_template.into(),
        }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Artifact as produced by the coverage replay
    pub fn raw_artifact(&self, id: u64) -> PathBuf {
        self.run_dir
            .join(self.raw_template.replace("{id}", &id.to_string()))
    }

    /// Stable location of one test's own coverage
    pub fn test_artifact(&self, id: u64) -> PathBuf {
        self.run_dir.join(format!("coverage_{id}.dat"))
    }

    /// Stable location of the coverage of all tests up to and including `id`
    pub fn merged_artifact(&self, id: u64) -> PathBuf {
        self.run_dir.join(format!("merged_coverage_{id}.dat"))
    }
}

/// Accumulator threaded through a run: the merge result of the previous entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeChain {
    prior: Option<PathBuf>,
}

impl MergeChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prior(&self) -> Option<&Path> {
        self.prior.as_deref()
    }
}

/// Coverage of a single entry on its own and merged with everything before it
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStep {
    pub standalone: CoverageSample,
    pub cumulative: CoverageSample,
}

/// Move the raw artifact of `id` to its stable path. Already staged
/// artifacts are left alone so a run can be analyzed again.
pub async fn stage_artifact(layout: &ArtifactLayout, id: u64) -> Result<PathBuf, StepError> {
    let stable = layout.test_artifact(id);
    if tokio::fs::try_exists(&stable).await? {
        return Ok(stable);
    }
    let raw = layout.raw_artifact(id);
    if !tokio::fs::try_exists(&raw).await? {
        return Err(ToolError::MissingArtifact(raw).into());
    }
    debug!("Staging {} -> {}", raw.display(), stable.display());
    tokio::fs::rename(&raw, &stable).await?;
    Ok(stable)
}

/// Annotate `artifact` into a scratch directory and extract its summary.
/// The scratch directory is removed on every exit path when it drops.
pub async fn annotated_sample<T: CoverageTool>(
    tool: &T,
    artifact: &Path,
) -> Result<CoverageSample, StepError> {
    let scratch = tempfile::tempdir()?;
    let report = tool.annotate(scratch.path(), artifact).await?;
    Ok(parse_summary(&report)?)
}

/// Fold one entry into the chain, returning its samples and the next chain state
pub async fn merge_step<T: CoverageTool>(
    tool: &T,
    layout: &ArtifactLayout,
    chain: MergeChain,
    entry: &TestEntry,
) -> Result<(MergeStep, MergeChain), StepError> {
    let test_artifact = stage_artifact(layout, entry.id).await?;
    let standalone = annotated_sample(tool, &test_artifact).await?;

    let merged = layout.merged_artifact(entry.id);
    tool.merge(&merged, chain.prior(), &test_artifact).await?;
    let cumulative = annotated_sample(tool, &merged).await?;

    Ok((
        MergeStep {
            standalone,
            cumulative,
        },
        MergeChain {
            prior: Some(merged),
        },
    ))
}
