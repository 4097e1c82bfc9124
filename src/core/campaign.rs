use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::core::aggregate::{CUMULATIVE_CSV, aggregate_run};
use crate::core::metadata::{CONFIG_FILE, RunMetadata, series_from_csv};
use crate::core::naming::{RUN_DIR_SUFFIX, campaign_name};
use crate::core::resample::align;
use crate::core::stats::{confidence, mean_curve};
use crate::core::tool::CoverageTool;
use crate::types::config::OrderPolicy;
use crate::types::{CampaignError, CampaignResult, RunError, RunSeries, StatsError};

/// Where cumulative series come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSource {
    /// Walk the merge chain with the coverage tool
    Tool,
    /// Reuse the cumulative audit CSV of an earlier analysis
    AuditCsv,
}

#[derive(Debug, Clone)]
pub struct CampaignOptions {
    pub raw_template: String,
    pub order: OrderPolicy,
    pub source: SeriesSource,
    pub show_progress: bool,
}

/// Run directories of a campaign.
///
/// A directory holding `config.json` is a campaign of one run; otherwise
/// every `*.out` subdirectory is a repeated run of the same configuration.
pub fn discover_runs(dir: &Path) -> Result<Vec<PathBuf>, CampaignError> {
    let pattern = format!(
        "{}/*{RUN_DIR_SUFFIX}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let paths = glob::glob(&pattern).map_err(|source| CampaignError::Pattern {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut runs = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_dir() => runs.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable run directory: {e}"),
        }
    }
    runs.sort();

    if dir.join(CONFIG_FILE).is_file() {
        if !runs.is_empty() {
            return Err(CampaignError::AmbiguousLayout {
                dir: dir.to_path_buf(),
            });
        }
        return Ok(vec![dir.to_path_buf()]);
    }
    if runs.is_empty() {
        return Err(CampaignError::NoRuns {
            dir: dir.to_path_buf(),
        });
    }
    Ok(runs)
}

async fn run_series<T: CoverageTool>(
    tool: &T,
    run_dir: &Path,
    options: &CampaignOptions,
) -> Result<RunSeries, RunError> {
    match options.source {
        SeriesSource::Tool => aggregate_run(
            tool,
            run_dir,
            &options.raw_template,
            options.order,
            options.show_progress,
        )
        .await
        .map(|run| run.cumulative),
        SeriesSource::AuditCsv => {
            let to_run_error = |source| RunError::Metadata {
                run: run_dir.to_path_buf(),
                source,
            };
            let metadata = RunMetadata::load(run_dir, options.order).map_err(to_run_error)?;
            let series =
                series_from_csv(&metadata, &run_dir.join(CUMULATIVE_CSV)).map_err(to_run_error)?;
            if series.is_empty() {
                return Err(RunError::NoEntries {
                    run: run_dir.to_path_buf(),
                });
            }
            Ok(series)
        }
    }
}

/// Analyze every run of a campaign and reduce them to one confidence curve.
///
/// Runs are processed one after another. Any failing run fails the whole
/// campaign; `running` is only checked between runs. A campaign of a single
/// run reports its curve without confidence bounds.
pub async fn analyze_campaign<T: CoverageTool>(
    tool: &T,
    dir: &Path,
    options: &CampaignOptions,
    running: &AtomicBool,
) -> Result<CampaignResult, CampaignError> {
    let runs = discover_runs(dir)?;
    let name = campaign_name(&runs).map_err(|source| CampaignError::Naming {
        dir: dir.to_path_buf(),
        source,
    })?;
    info!("Campaign {name}: {} run(s)", runs.len());

    let mut group = Vec::with_capacity(runs.len());
    for run_dir in &runs {
        if !running.load(Ordering::SeqCst) {
            return Err(CampaignError::Interrupted {
                dir: dir.to_path_buf(),
            });
        }
        group.push(run_series(tool, run_dir, options).await?);
    }

    let to_stats_error = |source| CampaignError::Stats {
        dir: dir.to_path_buf(),
        source,
    };
    let matrix = align(&group).map_err(to_stats_error)?;
    if matrix.runs() == 1 {
        warn!(
            "Campaign {name}: {}; reporting its curve without confidence bounds",
            StatsError::UnsupportedSampleSize(1)
        );
        return Ok(mean_curve(&matrix, name));
    }
    confidence(&matrix, name).map_err(to_stats_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn single_run_directory_is_its_own_campaign() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "{}").unwrap();
        assert_eq!(discover_runs(tmp.path()).unwrap(), vec![tmp.path().to_path_buf()]);
    }

    #[test]
    fn out_directories_are_sorted_runs() {
        let tmp = tempdir().unwrap();
        for name in ["1.cfg.out", "0.cfg.out", "notes"] {
            fs::create_dir(tmp.path().join(name)).unwrap();
        }
        fs::write(tmp.path().join("stray.out"), "").unwrap();
        assert_eq!(
            discover_runs(tmp.path()).unwrap(),
            vec![tmp.path().join("0.cfg.out"), tmp.path().join("1.cfg.out")]
        );
    }

    #[test]
    fn config_and_run_directories_together_are_ambiguous() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "{}").unwrap();
        fs::create_dir(tmp.path().join("0.cfg.out")).unwrap();
        assert!(matches!(
            discover_runs(tmp.path()).unwrap_err(),
            CampaignError::AmbiguousLayout { .. }
        ));
    }

    #[test]
    fn empty_directory_has_no_runs() {
        let tmp = tempdir().unwrap();
        assert!(matches!(
            discover_runs(tmp.path()).unwrap_err(),
            CampaignError::NoRuns { .. }
        ));
    }
}
