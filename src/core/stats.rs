use crate::types::{AlignedMatrix, CampaignResult, StatsError};

/// Two-sided 95% Student-t critical values, indexed by `runs - 2`.
/// The first entry (12.7062) is the value for one degree of freedom.
pub const T_CRITICAL_95: [f64; 24] = [
    12.7062, 4.3027, 3.1824, 2.7764, 2.5706, 2.4469, 2.3646, 2.3060, 2.2622, 2.2281, 2.2010,
    2.1788, 2.1604, 2.1448, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069,
    2.0639,
];

pub const MIN_RUNS: usize = 2;
pub const MAX_RUNS: usize = MIN_RUNS + T_CRITICAL_95.len() - 1;

/// Critical value for a group of `runs` repeated trials
pub fn t_critical(runs: usize) -> Result<f64, StatsError> {
    runs.checked_sub(MIN_RUNS)
        .and_then(|index| T_CRITICAL_95.get(index).copied())
        .ok_or(StatsError::UnsupportedSampleSize(runs))
}

/// Mean and standard error (population deviation over sqrt(n)) of one column
pub fn mean_and_stderr(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt() / n.sqrt())
}

/// Per-point mean and standard error of an aligned group
pub fn column_stats(matrix: &AlignedMatrix) -> Result<Vec<(f64, f64)>, StatsError> {
    if matrix.runs() < MIN_RUNS {
        return Err(StatsError::UnsupportedSampleSize(matrix.runs()));
    }
    Ok((0..matrix.points())
        .map(|i| mean_and_stderr(&matrix.column(i).collect::<Vec<_>>()))
        .collect())
}

/// Reduce an aligned group to its mean curve and 95% confidence half-widths
pub fn confidence(matrix: &AlignedMatrix, name: String) -> Result<CampaignResult, StatsError> {
    let t = t_critical(matrix.runs())?;
    let (means, half_widths) = column_stats(matrix)?
        .into_iter()
        .map(|(mean, stderr)| (mean, stderr * t))
        .unzip();
    Ok(CampaignResult {
        time_axis: matrix.time_axis().to_vec(),
        means,
        half_widths: Some(half_widths),
        name,
    })
}

/// Mean curve of an aligned group without confidence bounds, for groups
/// too small to estimate them
pub fn mean_curve(matrix: &AlignedMatrix, name: String) -> CampaignResult {
    let means = (0..matrix.points())
        .map(|i| mean_and_stderr(&matrix.column(i).collect::<Vec<_>>()).0)
        .collect();
    CampaignResult {
        time_axis: matrix.time_axis().to_vec(),
        means,
        half_widths: None,
        name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> AlignedMatrix {
        let points = rows.first().map(Vec::len).unwrap_or(0);
        AlignedMatrix::new((0..points).map(|i| i as f64).collect(), rows).unwrap()
    }

    #[test]
    fn table_covers_two_to_twenty_five_runs() {
        assert_eq!(MAX_RUNS, 25);
        assert_eq!(t_critical(2).unwrap(), 12.7062);
        assert_eq!(t_critical(24).unwrap(), 2.069);
        assert_eq!(t_critical(25).unwrap(), 2.0639);
        assert_eq!(t_critical(1), Err(StatsError::UnsupportedSampleSize(1)));
        assert_eq!(t_critical(0), Err(StatsError::UnsupportedSampleSize(0)));
        assert_eq!(t_critical(26), Err(StatsError::UnsupportedSampleSize(26)));
    }

    #[test]
    fn critical_values_decrease_with_sample_size() {
        assert!(T_CRITICAL_95.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn identical_rows_have_zero_error() {
        for runs in [2, 5, 25] {
            let m = matrix(vec![vec![10.0, 20.0, 35.5]; runs]);
            let result = confidence(&m, "same".into()).unwrap();
            assert_eq!(result.means, vec![10.0, 20.0, 35.5]);
            assert!(result.half_widths.unwrap().iter().all(|&h| h == 0.0));
        }
    }

    #[test]
    fn uses_population_deviation() {
        // values 50 and 60: mean 55, population std 5, stderr 5/sqrt(2)
        let (mean, stderr) = mean_and_stderr(&[50.0, 60.0]);
        assert_eq!(mean, 55.0);
        assert!((stderr - 5.0 / 2f64.sqrt()).abs() < 1e-12);

        let result = confidence(&matrix(vec![vec![50.0], vec![60.0]]), "pair".into()).unwrap();
        let half_widths = result.half_widths.unwrap();
        assert!((half_widths[0] - 5.0 / 2f64.sqrt() * 12.7062).abs() < 1e-9);
    }

    #[test]
    fn rejects_unsupported_group_sizes() {
        let single = matrix(vec![vec![1.0, 2.0]]);
        assert_eq!(
            confidence(&single, "one".into()).unwrap_err(),
            StatsError::UnsupportedSampleSize(1)
        );
        let many = matrix(vec![vec![1.0]; 26]);
        assert_eq!(
            confidence(&many, "many".into()).unwrap_err(),
            StatsError::UnsupportedSampleSize(26)
        );
    }

    #[test]
    fn mean_curve_of_single_run_is_the_run() {
        let result = mean_curve(&matrix(vec![vec![10.0, 42.5]]), "solo".into());
        assert_eq!(result.means, vec![10.0, 42.5]);
        assert_eq!(result.time_axis, vec![0.0, 1.0]);
        assert_eq!(result.half_widths, None);
    }
}
