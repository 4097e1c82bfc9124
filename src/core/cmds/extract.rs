use std::path::PathBuf;
use std::str::FromStr;

use log::info;

use crate::core::cli::ExtractArgs;
use crate::core::merge::annotated_sample;
use crate::core::report::ReportFormat;
use crate::core::tool::ProcessTool;
use crate::types::config::config;
use crate::types::{AppError, AppResult, COVERAGE_CSV_HEADER, StepError};

pub async fn execute_extract(args: ExtractArgs) -> AppResult<()> {
    let format = ReportFormat::from_str(&args.format)
        .map_err(|_| AppError::Custom(format!("Unknown output format: {}", args.format)))?;
    let tool = ProcessTool::new(config().resolve_tool_cmd(args.tool_cmd.as_deref()));
    let file = PathBuf::from(&args.file);

    let sample = annotated_sample(&tool, &file).await.map_err(|e| match e {
        StepError::Parse(e) => AppError::Parse(e),
        StepError::Tool(e) => AppError::Tool(e),
        StepError::Io(e) => AppError::Io(e),
    })?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&sample)?),
        ReportFormat::Csv => {
            println!("{COVERAGE_CSV_HEADER}");
            println!("{}", sample.csv_row(0));
        }
        ReportFormat::Table => {
            info!("File: {}", file.display());
            info!(
                "  Lines covered: {} / {} ({:.2}%)",
                sample.lines_covered, sample.total_lines, sample.percentage
            );
        }
    }
    Ok(())
}
