use log::info;
use strum::{Display, EnumString};

use crate::types::CampaignResult;

pub const RESULT_CSV_HEADER: &str = "Campaign,Time-(s),Mean-Coverage-(%),Half-Width-(%)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Long-form CSV with one row per campaign and time point
pub fn results_csv(results: &[CampaignResult]) -> String {
    let mut out = String::from(RESULT_CSV_HEADER);
    out.push('\n');
    for result in results {
        for (i, (time, mean)) in result.time_axis.iter().zip(&result.means).enumerate() {
            let half_width = result
                .half_widths
                .as_ref()
                .and_then(|h| h.get(i))
                .map(|h| format!("{h:.4}"))
                .unwrap_or_default();
            out.push_str(&format!(
                "{},{time},{mean:.4},{half_width}\n",
                result.name
            ));
        }
    }
    out
}

pub fn results_json(results: &[CampaignResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

/// Render results in `format`; `None` means the format logs instead of
/// producing a document
pub fn render(results: &[CampaignResult], format: ReportFormat) -> serde_json::Result<Option<String>> {
    match format {
        ReportFormat::Json => results_json(results).map(Some),
        ReportFormat::Csv => Ok(Some(results_csv(results))),
        ReportFormat::Table => {
            print_table_format(results);
            Ok(None)
        }
    }
}

fn print_table_format(results: &[CampaignResult]) {
    for result in results {
        info!("");
        info!("Campaign: {}", result.name);
        let (Some(time), Some(mean)) = (result.time_axis.last(), result.means.last()) else {
            info!("  No data points");
            continue;
        };
        info!("  Time points: {}", result.time_axis.len());
        match &result.half_widths {
            Some(half_widths) => {
                let last = half_widths.last().copied().unwrap_or(0.0);
                info!("  Final coverage at {time:.1}s: {mean:.2}% ± {last:.2}%");
                if let Some(widest) = half_widths.iter().copied().reduce(f64::max) {
                    info!("  Widest 95% half-width: {widest:.2}%");
                }
            }
            None => {
                info!("  Final coverage at {time:.1}s: {mean:.2}%");
                info!("  Single run: no confidence bounds");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn result() -> CampaignResult {
        CampaignResult {
            time_axis: vec![1.0, 2.5],
            means: vec![55.0, 70.125],
            half_widths: Some(vec![0.0, 1.5]),
            name: "rfuzz".to_string(),
        }
    }

    #[test]
    fn csv_has_one_row_per_point() {
        assert_eq!(
            results_csv(&[result()]),
            format!("{RESULT_CSV_HEADER}\nrfuzz,1,55.0000,0.0000\nrfuzz,2.5,70.1250,1.5000\n")
        );
    }

    #[test]
    fn csv_leaves_bounds_empty_for_single_run() {
        let solo = CampaignResult {
            half_widths: None,
            ..result()
        };
        assert_eq!(
            results_csv(&[solo]),
            format!("{RESULT_CSV_HEADER}\nrfuzz,1,55.0000,\nrfuzz,2.5,70.1250,\n")
        );
    }

    #[test]
    fn json_keeps_field_names() {
        let json = results_json(&[result()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "rfuzz");
        assert_eq!(value[0]["half_widths"][1], 1.5);

        let solo = CampaignResult {
            half_widths: None,
            ..result()
        };
        let value: serde_json::Value =
            serde_json::from_str(&results_json(&[solo]).unwrap()).unwrap();
        assert!(value[0]["half_widths"].is_null());
    }

    #[test]
    fn format_names_parse() {
        assert_eq!(ReportFormat::from_str("JSON").unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::Csv.to_string(), "csv");
        assert!(ReportFormat::from_str("sarif").is_err());
    }

    #[test]
    fn table_format_produces_no_document() {
        assert_eq!(render(&[result()], ReportFormat::Table).unwrap(), None);
    }
}
