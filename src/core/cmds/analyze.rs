use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{error, info, warn};

use crate::core::campaign::{CampaignOptions, SeriesSource, analyze_campaign};
use crate::core::cli::AnalyzeArgs;
use crate::core::report::{ReportFormat, render};
use crate::core::tool::ProcessTool;
use crate::types::config::{OrderPolicy, config};
use crate::types::{AppError, AppResult};

/// Outcome of an analyze invocation across all requested campaigns
#[derive(Debug, Default)]
pub struct AnalyzeSummary {
    pub analyzed: usize,
    pub failed: usize,
    pub interrupted: bool,
}

pub async fn execute_analyze(
    args: AnalyzeArgs,
    running: Arc<AtomicBool>,
) -> AppResult<AnalyzeSummary> {
    let format = ReportFormat::from_str(&args.format)
        .map_err(|_| AppError::Custom(format!("Unknown output format: {}", args.format)))?;
    let cli_order = args
        .order
        .as_deref()
        .map(|o| {
            OrderPolicy::from_str(o)
                .map_err(|_| AppError::Custom(format!("Unknown entry order policy: {o}")))
        })
        .transpose()?;

    let tool = ProcessTool::new(config().resolve_tool_cmd(args.tool_cmd.as_deref()));
    let options = CampaignOptions {
        raw_template: config().layout().raw_artifact().to_string(),
        order: config().resolve_order(cli_order),
        source: if args.from_csv {
            SeriesSource::AuditCsv
        } else {
            SeriesSource::Tool
        },
        show_progress: !args.quiet,
    };
    if options.source == SeriesSource::Tool {
        info!("Using coverage tool: {}", tool.cmd());
    }

    let mut summary = AnalyzeSummary::default();
    let mut results = Vec::new();
    for dir in &args.dirs {
        if !running.load(Ordering::SeqCst) {
            warn!("Analysis interrupted, stopping...");
            summary.interrupted = true;
            break;
        }
        let dir = PathBuf::from(dir);
        match analyze_campaign(&tool, &dir, &options, &running).await {
            Ok(result) => {
                summary.analyzed += 1;
                results.push(result);
            }
            Err(e) => {
                error!("{e}");
                summary.failed += 1;
            }
        }
    }
    if !running.load(Ordering::SeqCst) {
        summary.interrupted = true;
    }

    if let Some(document) = render(&results, format)? {
        match &args.output {
            Some(path) => {
                tokio::fs::write(path, document).await?;
                info!("Wrote {} campaign(s) to {path}", results.len());
            }
            None => print!("{document}"),
        }
    }

    if summary.failed > 0 {
        warn!(
            "{} of {} campaign(s) failed",
            summary.failed,
            summary.failed + summary.analyzed
        );
    }
    Ok(summary)
}
