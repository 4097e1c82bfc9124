use serde::Serialize;

/// Header shared by the per-test and cumulative audit CSVs
pub const COVERAGE_CSV_HEADER: &str = "Test-ID,Lines-Covered,Total-Lines,Line-Coverage-(%)";

/// Line coverage summary taken from one coverage report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageSample {
    pub lines_covered: u64,
    pub total_lines: u64,
    /// As printed by the coverage tool, not recomputed
    pub percentage: f64,
}

/// Largest gap between a printed percentage and the one implied by the
/// line counts, for percentages printed with two decimals
pub const PERCENTAGE_TOLERANCE: f64 = 0.005 + 1e-9;

impl CoverageSample {
    /// Reason the sample is inconsistent, if it is.
    ///
    /// The line counts must describe a non-empty design with no more lines
    /// covered than exist, and the percentage must lie in [0, 100] and agree
    /// with `100 * covered / total` up to rounding.
    pub fn inconsistency(&self) -> Option<String> {
        if self.total_lines == 0 {
            return Some("total line count is zero".to_string());
        }
        if self.lines_covered > self.total_lines {
            return Some("covered line count exceeds total".to_string());
        }
        if !(0.0..=100.0).contains(&self.percentage) {
            return Some(format!("percentage {} is outside [0, 100]", self.percentage));
        }
        let implied = 100.0 * self.lines_covered as f64 / self.total_lines as f64;
        if (self.percentage - implied).abs() > PERCENTAGE_TOLERANCE {
            return Some(format!(
                "percentage {} disagrees with {}/{} ({implied:.4})",
                self.percentage, self.lines_covered, self.total_lines
            ));
        }
        None
    }

    /// Audit CSV row for this sample
    pub fn csv_row(&self, test_id: u64) -> String {
        format!(
            "{},{},{},{:.2}",
            test_id, self.lines_covered, self.total_lines, self.percentage
        )
    }
}
