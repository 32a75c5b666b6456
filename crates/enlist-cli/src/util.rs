use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use std::io::BufRead;

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn format_timestamp_date(ts: i64) -> String {
    match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(dt) => dt.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        None => ts.to_string(),
    }
}

/// One entry per line; blank lines and `#` comments are skipped.
pub fn read_email_list(reader: impl BufRead) -> Result<Vec<String>> {
    let mut emails = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        emails.push(line);
    }
    Ok(emails)
}
