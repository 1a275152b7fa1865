use cubik::time_series::TimeSeriesPoint;

/// Compute X (attempts) and Y (seconds) bounds for the solve chart
pub fn compute_chart_params(points: &[TimeSeriesPoint]) -> (f64, f64) {
    let slowest = points.iter().map(|p| p.seconds).fold(0.0, f64::max);

    let mut attempts = match points.last() {
        Some(p) => p.attempt,
        None => 1.0,
    };
    if attempts < 1.0 {
        attempts = 1.0;
    }

    (attempts, slowest.ceil().max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
