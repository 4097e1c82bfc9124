use std::path::PathBuf;

use thiserror::Error;

/// A coverage report whose summary line does not have the expected shape
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Malformed coverage summary ({reason}): {line:?}")]
pub struct ParseError {
    pub reason: String,
    pub line: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>, line: &str) -> Self {
        Self {
            reason: reason.into(),
            line: line.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to launch `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{cmd}` exited with {status}: {stderr}")]
    Failed {
        cmd: String,
        status: String,
        stderr: String,
    },
    #[error("Coverage artifact not found: {0}")]
    MissingArtifact(PathBuf),
    #[error("Tool I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("Sample size {0} is outside the supported range of 2..=25 runs")]
    UnsupportedSampleSize(usize),
    #[error("Run series is empty")]
    EmptySeries,
    #[error("Run series has {times} times but {coverage} coverage values")]
    LengthMismatch { times: usize, coverage: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NamingError {
    #[error("No runs in group")]
    NoRuns,
    #[error("Runs do not share a configuration suffix: expected {expected:?}, found {found:?}")]
    GroupMismatch { expected: String, found: String },
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "Entry {id} discovered after {discovered_after}s precedes the previous entry at {previous}s"
    )]
    OutOfOrder {
        id: u64,
        discovered_after: f64,
        previous: f64,
    },
    #[error("Malformed audit CSV {path} at line {line}: {reason}")]
    Csv {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Reasons why a single entry could not be aggregated
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of one run, tagged with where it happened
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Run {run}: {source}")]
    Metadata {
        run: PathBuf,
        #[source]
        source: MetadataError,
    },
    #[error("Run {run}, entry {entry}: {source}")]
    Entry {
        run: PathBuf,
        entry: u64,
        #[source]
        source: StepError,
    },
    #[error("Run {run}: failed to write audit CSV: {source}")]
    Audit {
        run: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Run {run} has no entries")]
    NoEntries { run: PathBuf },
}

/// Failure of a whole campaign (group of repeated runs)
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("Campaign {dir} has both a config.json and *.out run directories")]
    AmbiguousLayout { dir: PathBuf },
    #[error("Campaign {dir} contains no runs")]
    NoRuns { dir: PathBuf },
    #[error("Campaign {dir} interrupted before all runs were processed")]
    Interrupted { dir: PathBuf },
    #[error("Invalid glob for {dir}: {source}")]
    Pattern {
        dir: PathBuf,
        #[source]
        source: glob::PatternError,
    },
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("Campaign {dir}: {source}")]
    Stats {
        dir: PathBuf,
        #[source]
        source: StatsError,
    },
    #[error("Campaign {dir}: {source}")]
    Naming {
        dir: PathBuf,
        #[source]
        source: NamingError,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Campaign(#[from] CampaignError),
    #[error("{0}")]
    Custom(String),
}

pub type AppResult<T> = Result<T, AppError>;
