use crate::record::AttemptRecord;

/// One plotted solve: attempt number (1-based) against its time in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub attempt: f64,
    pub seconds: f64,
}

impl TimeSeriesPoint {
    pub fn new(attempt: f64, seconds: f64) -> Self {
        Self { attempt, seconds }
    }
}

impl From<(f64, f64)> for TimeSeriesPoint {
    fn from(v: (f64, f64)) -> Self {
        TimeSeriesPoint {
            attempt: v.0,
            seconds: v.1,
        }
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.attempt, p.seconds)
    }
}

/// Plot points for a session; DNFs leave a gap at their attempt number
pub fn solve_series(records: &[AttemptRecord]) -> Vec<TimeSeriesPoint> {
    records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            record
                .effective_centis()
                .map(|c| TimeSeriesPoint::new((idx + 1) as f64, c as f64 / 100.0))
        })
        .collect()
}
