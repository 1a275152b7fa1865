use crate::record::AttemptRecord;
use std::io::Write;

/// Writes one session as CSV: index, time, status, scramble, recorded_at
pub fn write_csv<W: Write>(records: &[AttemptRecord], out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["index", "time", "status", "scramble", "recorded_at"])?;

    for (idx, record) in records.iter().enumerate() {
        let recorded_at = record
            .recorded_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default();
        writer.write_record([
            (idx + 1).to_string(),
            record.time.clone(),
            record.status.to_string(),
            record.scramble.clone(),
            recorded_at,
        ])?;
    }

    writer.flush()?;
    Ok(())
}
