use crate::types::{CoverageSample, ParseError};

/// Parse the summary at the top of an annotated coverage report.
///
/// Only the first line is inspected. It is expected to look like
/// `Total coverage (1234/2000) 61.70%`: the third token holds the
/// covered/total ratio in parentheses and the fourth the percentage.
pub fn parse_summary(report: &str) -> Result<CoverageSample, ParseError> {
    let first_line = report.lines().next().unwrap_or("");
    let tokens: Vec<&str> = first_line.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(ParseError::new(
            format!("expected at least 4 tokens, found {}", tokens.len()),
            first_line,
        ));
    }

    let ratio = tokens[2].trim_start_matches('(').trim_end_matches(')');
    let (covered, total) = ratio
        .split_once('/')
        .ok_or_else(|| ParseError::new("ratio is not of the form (covered/total)", first_line))?;

    let lines_covered: u64 = covered
        .parse()
        .map_err(|_| ParseError::new(format!("invalid covered count {covered:?}"), first_line))?;
    let total_lines: u64 = total
        .parse()
        .map_err(|_| ParseError::new(format!("invalid total count {total:?}"), first_line))?;
    let percent = tokens[3].trim_end_matches('%');
    let percentage: f64 = percent
        .parse()
        .map_err(|_| ParseError::new(format!("invalid percentage {percent:?}"), first_line))?;

    let sample = CoverageSample {
        lines_covered,
        total_lines,
        percentage,
    };
    match sample.inconsistency() {
        Some(reason) => Err(ParseError::new(reason, first_line)),
        None => Ok(sample),
    }
}
