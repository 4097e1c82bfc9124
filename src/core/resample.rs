use crate::types::{AlignedMatrix, RunSeries, StatsError};

/// Sorted union of every run's discovery times. Duplicates are kept, so a
/// time seen in two runs appears twice on the axis.
pub fn shared_time_axis(group: &[RunSeries]) -> Vec<f64> {
    let mut axis: Vec<f64> = group.iter().flat_map(|s| s.times.iter().copied()).collect();
    axis.sort_by(f64::total_cmp);
    axis
}

/// Piecewise-linear interpolation of `series` at `x`, flat outside the
/// recorded range. At tied times the last tied sample wins.
pub fn interpolate(series: &RunSeries, x: f64) -> Result<f64, StatsError> {
    let (times, coverage) = (&series.times, &series.coverage);
    if times.len() != coverage.len() {
        return Err(StatsError::LengthMismatch {
            times: times.len(),
            coverage: coverage.len(),
        });
    }
    let (Some(&first), Some(&last)) = (coverage.first(), coverage.last()) else {
        return Err(StatsError::EmptySeries);
    };

    // index of the first recorded time strictly after x
    let upper = times.partition_point(|&t| t <= x);
    if upper == 0 {
        return Ok(first);
    }
    if upper == times.len() {
        return Ok(last);
    }
    let lower = upper - 1;
    let (x0, x1) = (times[lower], times[upper]);
    let (y0, y1) = (coverage[lower], coverage[upper]);
    Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

/// Resample every run of a group onto the group's shared time axis
pub fn align(group: &[RunSeries]) -> Result<AlignedMatrix, StatsError> {
    if group.is_empty() || group.iter().any(RunSeries::is_empty) {
        return Err(StatsError::EmptySeries);
    }
    let time_axis = shared_time_axis(group);
    let rows = group
        .iter()
        .map(|series| {
            time_axis
                .iter()
                .map(|&x| interpolate(series, x))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    AlignedMatrix::new(time_axis, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn series(times: &[f64], coverage: &[f64]) -> RunSeries {
        RunSeries::from_points(times.to_vec(), coverage.to_vec()).unwrap()
    }

    #[test]
    fn holds_boundaries_flat_and_interpolates_inside() {
        let s = series(&[2.0, 5.0, 9.0], &[10.0, 40.0, 40.0]);
        assert_eq!(interpolate(&s, 0.0).unwrap(), 10.0);
        assert_eq!(interpolate(&s, 15.0).unwrap(), 40.0);
        assert_eq!(interpolate(&s, 7.0).unwrap(), 40.0);
        assert_eq!(interpolate(&s, 3.5).unwrap(), 25.0);
        assert_eq!(interpolate(&s, 2.0).unwrap(), 10.0);
        assert_eq!(interpolate(&s, 9.0).unwrap(), 40.0);
    }

    #[test]
    fn single_point_series_is_constant() {
        let s = series(&[4.0], &[12.5]);
        for x in [0.0, 4.0, 100.0] {
            assert_eq!(interpolate(&s, x).unwrap(), 12.5);
        }
    }

    #[test]
    fn tied_times_take_the_last_sample() {
        let s = series(&[1.0, 2.0, 2.0, 4.0], &[10.0, 20.0, 30.0, 50.0]);
        assert_eq!(interpolate(&s, 2.0).unwrap(), 30.0);
        assert_eq!(interpolate(&s, 3.0).unwrap(), 40.0);
        assert_eq!(interpolate(&s, 1.5).unwrap(), 15.0);
    }

    #[test]
    fn empty_series_is_an_error() {
        assert_eq!(
            interpolate(&RunSeries::new(), 1.0).unwrap_err(),
            StatsError::EmptySeries
        );
        assert_eq!(
            align(&[RunSeries::new()]).unwrap_err(),
            StatsError::EmptySeries
        );
        assert_eq!(align(&[]).unwrap_err(), StatsError::EmptySeries);
    }

    #[test]
    fn one_empty_run_fails_the_group() {
        let full = series(&[1.0, 2.0], &[10.0, 20.0]);
        assert_eq!(
            align(&[full, RunSeries::new()]).unwrap_err(),
            StatsError::EmptySeries
        );
    }

    #[test]
    fn aligns_two_runs_on_union_axis() {
        let a = series(&[1.0, 3.0], &[50.0, 80.0]);
        let b = series(&[2.0, 4.0], &[60.0, 90.0]);
        let matrix = align(&[a, b]).unwrap();
        assert_eq!(matrix.time_axis(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(matrix.rows()[0], vec![50.0, 65.0, 80.0, 80.0]);
        assert_eq!(matrix.rows()[1], vec![60.0, 60.0, 75.0, 90.0]);
    }

    #[test]
    fn axis_keeps_times_shared_by_runs() {
        let a = series(&[1.0, 3.0], &[0.0, 1.0]);
        let b = series(&[3.0], &[5.0]);
        assert_eq!(shared_time_axis(&[a, b]), vec![1.0, 3.0, 3.0]);
    }
}
