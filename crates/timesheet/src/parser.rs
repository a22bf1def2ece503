//! Presence CSV parsing.
//!
//! The log is plain CSV with rows `user_id,date,start,end` (date as
//! `YYYY-MM-DD`, times as `HH:MM:SS`). Exports carry header and footer
//! rows with a different field count; those are ignored. A 4-field row
//! whose fields do not all coerce is dropped whole, so no partial values
//! from a bad row ever reach the dataset.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use common::{Dataset, Error, PresenceRecord, Result, UserId};
use tracing::debug;

/// Read and parse the presence log at `path`.
///
/// Open and read failures are hard errors; malformed rows are not. An
/// open failure reports the offending path.
pub fn load(path: &Path) -> Result<Dataset> {
    let file = File::open(path)
        .map_err(|e| Error::Data(format!("cannot open {}: {}", path.display(), e)))?;
    let dataset = parse_reader(BufReader::new(file))?;
    debug!("parsed {} users from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Parse presence rows from any buffered reader.
///
/// Rows are read as bytes and decoded lossily, so undecodable bytes
/// spoil only their own row, never the parse. A later row for the same
/// (user, date) pair overwrites the earlier one.
pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<Dataset> {
    let mut dataset = Dataset::new();
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = String::from_utf8_lossy(&buf);
        let row: Vec<&str> = line.trim_end().split(',').collect();
        if row.len() != 4 {
            continue;
        }
        match coerce_row(&row) {
            Some((user_id, date, record)) => {
                dataset.entry(user_id).or_default().insert(date, record);
            }
            None => debug!("problem with line {}, skipping row", line_no),
        }
    }
    Ok(dataset)
}

/// Coerce one 4-field row; `None` when any field fails to parse.
fn coerce_row(row: &[&str]) -> Option<(UserId, NaiveDate, PresenceRecord)> {
    let user_id: UserId = row[0].parse().ok()?;
    let date = NaiveDate::parse_from_str(row[1], "%Y-%m-%d").ok()?;
    let start = NaiveTime::parse_from_str(row[2], "%H:%M:%S").ok()?;
    let end = NaiveTime::parse_from_str(row[3], "%H:%M:%S").ok()?;
    Some((user_id, date, PresenceRecord { start, end }))
}
