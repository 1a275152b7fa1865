use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed time added by a penalty, in centiseconds
pub const PENALTY_CENTIS: u64 = 200;

/// Annotation on a finished attempt
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Status {
    #[default]
    #[serde(rename = "", alias = "None")]
    #[strum(to_string = "")]
    None,
    #[serde(rename = "+2")]
    #[strum(to_string = "+2")]
    Penalty,
    #[serde(rename = "DNF")]
    #[strum(to_string = "DNF")]
    DidNotFinish,
}

/// Edit applied to one record of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    AddPenalty,
    MarkDnf,
    Delete,
}

/// Whether a second +2 on the same record adds another two seconds
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PenaltyPolicy {
    #[default]
    Cumulative,
    Once,
}

/// One timed attempt as persisted in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Seconds with two fractional digits, penalty included
    pub time: String,
    pub scramble: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Local>>,
}

impl AttemptRecord {
    pub fn new(time: impl Into<String>, scramble: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            scramble: scramble.into(),
            status: Status::None,
            recorded_at: None,
        }
    }

    pub fn finished(elapsed: Duration, scramble: impl Into<String>) -> Self {
        Self {
            time: format_duration(elapsed),
            scramble: scramble.into(),
            status: Status::None,
            recorded_at: Some(Local::now()),
        }
    }

    pub fn centis(&self) -> Option<u64> {
        parse_centis(&self.time)
    }

    pub fn is_dnf(&self) -> bool {
        self.status == Status::DidNotFinish
    }

    /// Time that counts for statistics; `None` for a DNF or an unreadable time
    pub fn effective_centis(&self) -> Option<u64> {
        if self.is_dnf() {
            None
        } else {
            self.centis()
        }
    }

    /// Applies +2 or DNF. Returns false when nothing changed.
    pub fn annotate(&mut self, annotation: Annotation, policy: PenaltyPolicy) -> bool {
        match annotation {
            Annotation::AddPenalty => {
                if policy == PenaltyPolicy::Once && self.status == Status::Penalty {
                    return false;
                }
                let Some(centis) = self.centis() else {
                    return false;
                };
                self.time = format_centis(centis + PENALTY_CENTIS);
                self.status = Status::Penalty;
                true
            }
            Annotation::MarkDnf => {
                self.status = Status::DidNotFinish;
                true
            }
            Annotation::Delete => false,
        }
    }

    /// List line: time followed by the status marker, if any
    pub fn summary(&self) -> String {
        match self.status {
            Status::None => self.time.clone(),
            status => format!("{} {}", self.time, status),
        }
    }
}

/// Rounds to the nearest centisecond
pub fn duration_to_centis(d: Duration) -> u64 {
    ((d.as_millis() + 5) / 10) as u64
}

pub fn format_centis(centis: u64) -> String {
    format!("{}.{:02}", centis / 100, centis % 100)
}

pub fn format_duration(d: Duration) -> String {
    format_centis(duration_to_centis(d))
}

pub fn parse_centis(time: &str) -> Option<u64> {
    let secs: f64 = time.trim().parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some((secs * 100.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_duration(Duration::from_millis(5_000)), "5.00");
        assert_eq!(format_duration(Duration::from_millis(5_004)), "5.00");
        assert_eq!(format_duration(Duration::from_millis(5_005)), "5.01");
        assert_eq!(format_duration(Duration::from_millis(61_239)), "61.24");
        assert_eq!(format_duration(Duration::ZERO), "0.00");
    }

    #[test]
    fn parses_time_strings() {
        assert_eq!(parse_centis("10.00"), Some(1_000));
        assert_eq!(parse_centis("7.5"), Some(750));
        assert_eq!(parse_centis(" 0.01 "), Some(1));
        assert_eq!(parse_centis("abc"), None);
        assert_eq!(parse_centis("-1.00"), None);
        assert_eq!(parse_centis("NaN"), None);
    }

    #[test]
    fn penalty_is_cumulative_by_default() {
        let mut record = AttemptRecord::new("10.00", "R U");
        assert!(record.annotate(Annotation::AddPenalty, PenaltyPolicy::Cumulative));
        assert_eq!(record.time, "12.00");
        assert_eq!(record.status, Status::Penalty);

        assert!(record.annotate(Annotation::AddPenalty, PenaltyPolicy::Cumulative));
        assert_eq!(record.time, "14.00");
    }

    #[test]
    fn penalty_once_ignores_second_application() {
        let mut record = AttemptRecord::new("10.00", "R U");
        assert!(record.annotate(Annotation::AddPenalty, PenaltyPolicy::Once));
        assert!(!record.annotate(Annotation::AddPenalty, PenaltyPolicy::Once));
        assert_eq!(record.time, "12.00");
    }

    #[test]
    fn dnf_keeps_time() {
        let mut record = AttemptRecord::new("9.87", "F2");
        assert!(record.annotate(Annotation::MarkDnf, PenaltyPolicy::Cumulative));
        assert_eq!(record.time, "9.87");
        assert!(record.is_dnf());
        assert_eq!(record.effective_centis(), None);
        assert_eq!(record.summary(), "9.87 DNF");
    }

    #[test]
    fn status_uses_legacy_wire_strings() {
        let record = AttemptRecord::new("1.00", "U");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"time":"1.00","scramble":"U","status":""}"#);

        let legacy: Vec<AttemptRecord> = serde_json::from_str(
            r#"[{"time":"3.10","scramble":"R","status":"+2"},
                {"time":"4.00","scramble":"L","status":"DNF"},
                {"time":"5.00","scramble":"B","status":"None"},
                {"time":"6.00","scramble":"D"}]"#,
        )
        .unwrap();
        assert_eq!(legacy[0].status, Status::Penalty);
        assert_eq!(legacy[1].status, Status::DidNotFinish);
        assert_eq!(legacy[2].status, Status::None);
        assert_eq!(legacy[3].status, Status::None);
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::None.to_string(), "");
        assert_eq!(Status::Penalty.to_string(), "+2");
        assert_eq!(Status::DidNotFinish.to_string(), "DNF");
        assert_eq!(PenaltyPolicy::Once.to_string(), "once");
    }
}
