use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::types::config::OrderPolicy;
use crate::types::{
    COVERAGE_CSV_HEADER, CoverageSample, EntryRecord, MetadataError, RunSeries, TestEntry,
};

pub const CONFIG_FILE: &str = "config.json";
pub const ENTRIES_FILE: &str = "entries.json";
pub const LATEST_FILE: &str = "latest.json";

#[derive(Debug, Deserialize)]
struct LatestRecord {
    discovered_after: f64,
}

/// Everything the fuzzer left behind in a run directory that the pipeline reads
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub dir: PathBuf,
    /// Fuzzer configuration descriptor, kept opaque
    pub config: serde_json::Value,
    pub entries: Vec<TestEntry>,
    /// Time at which the run stopped, if recorded
    pub latest: Option<f64>,
}

impl RunMetadata {
    pub fn load(dir: &Path, order: OrderPolicy) -> Result<Self, MetadataError> {
        let config: serde_json::Value = read_json(&dir.join(CONFIG_FILE))?;
        let records: Vec<EntryRecord> = read_json(&dir.join(ENTRIES_FILE))?;
        let mut entries: Vec<TestEntry> = records.into_iter().map(|r| r.entry).collect();

        let latest_path = dir.join(LATEST_FILE);
        let latest = if latest_path.is_file() {
            Some(read_json::<LatestRecord>(&latest_path)?.discovered_after)
        } else {
            None
        };

        match order {
            OrderPolicy::Reject => check_order(&entries)?,
            OrderPolicy::Sort => {
                if check_order(&entries).is_err() {
                    warn!("Sorting out-of-order entries in {}", dir.display());
                    entries.sort_by(|a, b| a.discovered_after.total_cmp(&b.discovered_after));
                }
            }
        }

        if let Some(seed) = config.get("seed") {
            debug!("Run {} uses seed {seed}", dir.display());
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            config,
            entries,
            latest,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, MetadataError> {
    let contents = fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| MetadataError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Entries must be in non-decreasing discovery order; ties are allowed
pub fn check_order(entries: &[TestEntry]) -> Result<(), MetadataError> {
    for pair in entries.windows(2) {
        if pair[1].discovered_after < pair[0].discovered_after {
            return Err(MetadataError::OutOfOrder {
                id: pair[1].id,
                discovered_after: pair[1].discovered_after,
                previous: pair[0].discovered_after,
            });
        }
    }
    Ok(())
}

/// Read the rows of an audit CSV written by a previous analysis
pub fn read_coverage_csv(path: &Path) -> Result<Vec<(u64, CoverageSample)>, MetadataError> {
    let contents = fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_error = |line: usize, reason: String| MetadataError::Csv {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut lines = contents.lines().enumerate();
    match lines.next() {
        Some((_, header)) if header.trim() == COVERAGE_CSV_HEADER => {}
        _ => return Err(csv_error(1, "missing header".to_string())),
    }

    let mut rows = Vec::new();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(csv_error(index + 1, format!("expected 4 fields, found {}", fields.len())));
        }
        let id: u64 = fields[0]
            .parse()
            .map_err(|_| csv_error(index + 1, format!("invalid test id {:?}", fields[0])))?;
        let lines_covered: u64 = fields[1]
            .parse()
            .map_err(|_| csv_error(index + 1, format!("invalid covered count {:?}", fields[1])))?;
        let total_lines: u64 = fields[2]
            .parse()
            .map_err(|_| csv_error(index + 1, format!("invalid total {:?}", fields[2])))?;
        let percentage: f64 = fields[3]
            .parse()
            .map_err(|_| csv_error(index + 1, format!("invalid percentage {:?}", fields[3])))?;
        let sample = CoverageSample {
            lines_covered,
            total_lines,
            percentage,
        };
        if let Some(reason) = sample.inconsistency() {
            return Err(csv_error(index + 1, reason));
        }
        rows.push((id, sample));
    }
    Ok(rows)
}

/// Rebuild a cumulative series from a previously written audit CSV,
/// taking discovery times from the run's entries
pub fn series_from_csv(metadata: &RunMetadata, csv_path: &Path) -> Result<RunSeries, MetadataError> {
    let times: HashMap<u64, f64> = metadata
        .entries
        .iter()
        .map(|e| (e.id, e.discovered_after))
        .collect();

    let mut series = RunSeries::new();
    for (id, sample) in read_coverage_csv(csv_path)? {
        let time = times.get(&id).ok_or_else(|| MetadataError::Csv {
            path: csv_path.to_path_buf(),
            line: series.len() + 2,
            reason: format!("test id {id} is not listed in {ENTRIES_FILE}"),
        })?;
        series.push(*time, sample.percentage);
    }
    if let Some(latest) = metadata.latest {
        series.carry_forward(latest);
    }
    Ok(series)
}
