use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use crate::core::merge::{ArtifactLayout, MergeChain, merge_step};
use crate::core::metadata::RunMetadata;
use crate::core::tool::CoverageTool;
use crate::types::config::OrderPolicy;
use crate::types::{COVERAGE_CSV_HEADER, CoverageSample, RunError, RunSeries, TestEntry};

/// Audit trail of each test's own coverage
pub const PER_TEST_CSV: &str = "vlt_cov.csv";
/// Audit trail of the coverage accumulated up to each test
pub const CUMULATIVE_CSV: &str = "vlt_cum_cov.csv";

/// Samples recorded for one entry while walking a run
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCoverage {
    pub entry: TestEntry,
    pub standalone: CoverageSample,
    pub cumulative: CoverageSample,
}

/// Result of walking every entry of a run
#[derive(Debug, Clone, Default)]
pub struct AggregatedRun {
    pub entries: Vec<EntryCoverage>,
    /// Cumulative coverage keyed by discovery time, with the carried tail if any
    pub cumulative: RunSeries,
}

impl AggregatedRun {
    fn per_test_csv(&self) -> String {
        self.csv(|e| &e.standalone)
    }

    fn cumulative_csv(&self) -> String {
        self.csv(|e| &e.cumulative)
    }

    fn csv(&self, pick: impl Fn(&EntryCoverage) -> &CoverageSample) -> String {
        let mut out = String::from(COVERAGE_CSV_HEADER);
        out.push('\n');
        for e in &self.entries {
            out.push_str(&pick(e).csv_row(e.entry.id));
            out.push('\n');
        }
        out
    }
}

pub fn entry_progress(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("  {bar:40} {pos}/{len} entries {msg}") {
        bar.set_style(style);
    }
    bar
}

/// Drive the merge chain across `entries` in the order given.
///
/// `latest` is the time the run stopped; if it is past the last entry the
/// last cumulative value is carried forward to it.
pub async fn aggregate_entries<T: CoverageTool>(
    tool: &T,
    layout: &ArtifactLayout,
    entries: &[TestEntry],
    latest: Option<f64>,
    progress: &ProgressBar,
) -> Result<AggregatedRun, RunError> {
    let mut run = AggregatedRun::default();
    let mut chain = MergeChain::new();

    for entry in entries {
        progress.set_message(format!("test {}", entry.id));
        let (step, next) = merge_step(tool, layout, chain, entry)
            .await
            .map_err(|source| RunError::Entry {
                run: layout.run_dir().to_path_buf(),
                entry: entry.id,
                source,
            })?;
        chain = next;

        debug!(
            "Entry {} at {}s: {:.2}% alone, {:.2}% cumulative",
            entry.id, entry.discovered_after, step.standalone.percentage, step.cumulative.percentage
        );
        run.cumulative
            .push(entry.discovered_after, step.cumulative.percentage);
        run.entries.push(EntryCoverage {
            entry: entry.clone(),
            standalone: step.standalone,
            cumulative: step.cumulative,
        });
        progress.inc(1);
    }

    if !run.cumulative.is_non_decreasing() {
        warn!(
            "Cumulative coverage of {} decreases; the merge tool may not be monotone",
            layout.run_dir().display()
        );
    }
    if let Some(latest) = latest {
        if run.cumulative.carry_forward(latest) {
            debug!(
                "{}: coverage held flat until the run stopped at {latest}s",
                layout.run_dir().display()
            );
        }
    }
    Ok(run)
}

fn partial_path(run_dir: &Path, name: &str) -> PathBuf {
    run_dir.join(format!(".{name}.partial"))
}

/// Write both audit CSVs of a run. Both bodies land under temporary names
/// before either is renamed into place, so a failed write leaves the
/// previous pair untouched.
pub async fn write_audit_csvs(run_dir: &Path, run: &AggregatedRun) -> std::io::Result<()> {
    let files = [
        (PER_TEST_CSV, run.per_test_csv()),
        (CUMULATIVE_CSV, run.cumulative_csv()),
    ];
    for (name, body) in &files {
        let partial = partial_path(run_dir, name);
        if let Err(e) = tokio::fs::write(&partial, body).await {
            for (name, _) in &files {
                let _ = tokio::fs::remove_file(partial_path(run_dir, name)).await;
            }
            return Err(e);
        }
    }
    for (name, _) in &files {
        tokio::fs::rename(partial_path(run_dir, name), run_dir.join(name)).await?;
    }
    Ok(())
}

/// Aggregate one run directory end to end: load its metadata, walk the
/// merge chain and write the audit CSVs. Returns the cumulative series.
pub async fn aggregate_run<T: CoverageTool>(
    tool: &T,
    run_dir: &Path,
    raw_template: &str,
    order: OrderPolicy,
    show_progress: bool,
) -> Result<AggregatedRun, RunError> {
    let metadata = RunMetadata::load(run_dir, order).map_err(|source| RunError::Metadata {
        run: run_dir.to_path_buf(),
        source,
    })?;
    if metadata.entries.is_empty() {
        return Err(RunError::NoEntries {
            run: run_dir.to_path_buf(),
        });
    }

    info!(
        "Processing {} ({} entries)",
        run_dir.display(),
        metadata.entries.len()
    );
    let progress = if show_progress {
        entry_progress(metadata.entries.len())
    } else {
        ProgressBar::hidden()
    };

    let layout = ArtifactLayout::new(run_dir, raw_template);
    let result =
        aggregate_entries(tool, &layout, &metadata.entries, metadata.latest, &progress).await;
    progress.finish_and_clear();
    let run = result?;

    write_audit_csvs(run_dir, &run)
        .await
        .map_err(|source| RunError::Audit {
            run: run_dir.to_path_buf(),
            source,
        })?;

    if let Some(last) = run.cumulative.last_coverage() {
        info!("{}: final cumulative coverage {last:.2}%", run_dir.display());
    }
    Ok(run)
}
