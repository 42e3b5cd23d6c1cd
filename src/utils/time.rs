// src/utils/time.rs

//! Relative time formatting for activity entries.

use chrono::{DateTime, Datelike, Utc};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Describe how long ago `timestamp` was, in Indonesian.
///
/// Unparseable timestamps are returned unchanged. Anything older than 30 days
/// is shown as a short date.
pub fn time_ago(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(timestamp.trim()) else {
        return timestamp.to_string();
    };
    let then = then.with_timezone(&Utc);

    let mins = (now - then).num_minutes().max(0);
    if mins < 1 {
        return "Baru saja".to_string();
    }
    if mins < 60 {
        return format!("{mins} menit lalu");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours} jam lalu");
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{days} hari lalu");
    }
    format!(
        "{} {} {}",
        then.day(),
        MONTHS[then.month0() as usize],
        then.year()
    )
}
