use crate::record::{format_centis, AttemptRecord};
use std::fmt;

/// Trimmed rolling average over the most recent attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Average {
    Time(u64),
    Dnf,
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Average::Time(centis) => write!(f, "{}", format_centis(*centis)),
            Average::Dnf => write!(f, "DNF"),
        }
    }
}

/// Summary of one session, all times in centiseconds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub count: usize,
    pub dnf_count: usize,
    pub best: Option<u64>,
    pub worst: Option<u64>,
    pub mean: Option<u64>,
    pub std_dev: Option<f64>,
    pub ao5: Option<Average>,
    pub ao12: Option<Average>,
}

impl SessionStats {
    pub fn from_records(records: &[AttemptRecord]) -> Self {
        let times: Vec<u64> = records
            .iter()
            .filter_map(AttemptRecord::effective_centis)
            .collect();

        Self {
            count: records.len(),
            dnf_count: records.len() - times.len(),
            best: times.iter().min().copied(),
            worst: times.iter().max().copied(),
            mean: mean_centis(&times),
            std_dev: std_dev_seconds(&times),
            ao5: average_of(records, 5),
            ao12: average_of(records, 12),
        }
    }
}

fn mean_centis(times: &[u64]) -> Option<u64> {
    match times.len() {
        0 => None,
        n => Some((times.iter().sum::<u64>() + n as u64 / 2) / n as u64),
    }
}

/// Population standard deviation, in seconds
fn std_dev_seconds(times: &[u64]) -> Option<f64> {
    if times.is_empty() {
        return None;
    }
    let secs: Vec<f64> = times.iter().map(|c| *c as f64 / 100.0).collect();
    let mean = secs.iter().sum::<f64>() / secs.len() as f64;
    let variance = secs
        .iter()
        .map(|v| {
            let diff = mean - v;
            diff * diff
        })
        .sum::<f64>()
        / secs.len() as f64;
    Some(variance.sqrt())
}

/// Average of the last `n` attempts with the best and worst dropped.
///
/// A DNF ranks as the worst result; two or more DNFs make the whole
/// average a DNF. `None` until `n` attempts exist.
pub fn average_of(records: &[AttemptRecord], n: usize) -> Option<Average> {
    if n < 3 || records.len() < n {
        return None;
    }

    let mut window: Vec<Option<u64>> = records[records.len() - n..]
        .iter()
        .map(AttemptRecord::effective_centis)
        .collect();

    if window.iter().filter(|t| t.is_none()).count() >= 2 {
        return Some(Average::Dnf);
    }

    window.sort_by_key(|t| t.unwrap_or(u64::MAX));
    let counted: Vec<u64> = window[1..n - 1].iter().flatten().copied().collect();
    let total: u64 = counted.iter().sum();
    let len = counted.len() as u64;
    Some(Average::Time((total + len / 2) / len))
}
