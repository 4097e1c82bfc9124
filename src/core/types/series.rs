use serde::Serialize;

use crate::types::StatsError;

/// Coverage percentages of one run keyed by discovery time
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSeries {
    pub times: Vec<f64>,
    pub coverage: Vec<f64>,
}

impl RunSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(times: Vec<f64>, coverage: Vec<f64>) -> Result<Self, StatsError> {
        if times.len() != coverage.len() {
            return Err(StatsError::LengthMismatch {
                times: times.len(),
                coverage: coverage.len(),
            });
        }
        Ok(Self { times, coverage })
    }

    pub fn push(&mut self, time: f64, coverage: f64) {
        self.times.push(time);
        self.coverage.push(coverage);
    }

    /// Extend the last known coverage flat up to `final_time` if the run
    /// kept going after its last discovery. Returns whether a point was added.
    pub fn carry_forward(&mut self, final_time: f64) -> bool {
        match (self.times.last(), self.coverage.last()) {
            (Some(&last_time), Some(&last_cov)) if final_time > last_time => {
                self.push(final_time, last_cov);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn last_coverage(&self) -> Option<f64> {
        self.coverage.last().copied()
    }

    /// True if coverage never drops in processing order
    pub fn is_non_decreasing(&self) -> bool {
        self.coverage.windows(2).all(|w| w[0] <= w[1])
    }
}

/// Runs of one group resampled onto a shared time axis (rows = runs).
/// Every row has exactly one value per axis point.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedMatrix {
    time_axis: Vec<f64>,
    rows: Vec<Vec<f64>>,
}

impl AlignedMatrix {
    pub fn new(time_axis: Vec<f64>, rows: Vec<Vec<f64>>) -> Result<Self, StatsError> {
        if let Some(row) = rows.iter().find(|row| row.len() != time_axis.len()) {
            return Err(StatsError::LengthMismatch {
                times: time_axis.len(),
                coverage: row.len(),
            });
        }
        Ok(Self { time_axis, rows })
    }

    pub fn time_axis(&self) -> &[f64] {
        &self.time_axis
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn runs(&self) -> usize {
        self.rows.len()
    }

    pub fn points(&self) -> usize {
        self.time_axis.len()
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index).copied())
    }
}

/// Coverage-vs-time curve of one campaign with its confidence bounds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignResult {
    pub time_axis: Vec<f64>,
    pub means: Vec<f64>,
    /// 95% half-widths per point; `None` for a campaign of a single run
    pub half_widths: Option<Vec<f64>>,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carry_forward_only_extends_past_last_time() {
        let mut series = RunSeries::from_points(vec![1.0, 3.0], vec![50.0, 80.0]).unwrap();
        assert!(!series.carry_forward(3.0));
        assert!(series.carry_forward(10.0));
        assert_eq!(series.times, vec![1.0, 3.0, 10.0]);
        assert_eq!(series.coverage, vec![50.0, 80.0, 80.0]);
    }

    #[test]
    fn carry_forward_on_empty_series_is_noop() {
        let mut series = RunSeries::new();
        assert!(!series.carry_forward(5.0));
        assert!(series.is_empty());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = RunSeries::from_points(vec![1.0], vec![]).unwrap_err();
        assert_eq!(
            err,
            StatsError::LengthMismatch {
                times: 1,
                coverage: 0
            }
        );
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let err = AlignedMatrix::new(vec![1.0, 2.0], vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            StatsError::LengthMismatch {
                times: 2,
                coverage: 1
            }
        );
        let matrix = AlignedMatrix::new(vec![1.0], vec![vec![4.0], vec![6.0]]).unwrap();
        assert_eq!(matrix.column(0).collect::<Vec<_>>(), vec![4.0, 6.0]);
        assert_eq!(matrix.column(1).count(), 0);
    }
}
