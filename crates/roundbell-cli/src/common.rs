//! Helpers shared by the subcommands.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use roundbell_core::{AppConfig, AppState, SqliteStore, SystemClock, WorkoutRecord};

/// Open the application over the configured SQLite file.
pub fn open_app(config: &AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let store = SqliteStore::open(&config.database_path()?)?;
    Ok(AppState::open(store, Arc::new(SystemClock))?)
}

/// Parse a duration in seconds: `90`, `90s`, `3m` or `1m30s`.
pub fn parse_duration_secs(s: &str) -> Result<u32, String> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err("empty duration".into());
    }

    let mut total: u32 = 0;
    let mut num = String::new();
    for c in s.chars() {
        match c {
            '0'..='9' => num.push(c),
            'm' | 's' => {
                let value: u32 = num.parse().map_err(|_| format!("invalid duration '{s}'"))?;
                let unit = if c == 'm' { 60 } else { 1 };
                total = value
                    .checked_mul(unit)
                    .and_then(|v| total.checked_add(v))
                    .ok_or_else(|| format!("duration '{s}' is too large"))?;
                num.clear();
            }
            _ => return Err(format!("invalid duration '{s}' (use 90, 90s, 3m or 1m30s)")),
        }
    }

    // bare trailing number counts as seconds
    if !num.is_empty() {
        let value: u32 = num.parse().map_err(|_| format!("invalid duration '{s}'"))?;
        total = total
            .checked_add(value)
            .ok_or_else(|| format!("duration '{s}' is too large"))?;
    }
    Ok(total)
}

/// `m:ss` countdown display.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `Xm Ys` total-time display.
pub fn format_duration(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

/// `Today`, `Yesterday`, or `Mon DD, YYYY` relative to `now`.
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let day = date.date_naive();
    let today = now.date_naive();
    if day == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else {
        date.format("%b %d, %Y").to_string()
    }
}

/// One human-readable history line.
pub fn describe(record: &WorkoutRecord) -> String {
    let date = record
        .date_time()
        .map(|d| format_date(&d.with_timezone(&Local), &Local::now()))
        .unwrap_or_else(|| "?".to_string());
    let mut line = format!(
        "{}  {}  {}/{} rounds  {}  ({} / {})",
        record.id,
        date,
        record.completed_rounds,
        record.total_rounds,
        format_duration(record.total_time),
        format_clock(record.round_duration),
        format_clock(record.break_duration),
    );
    if let Some(difficulty) = record.difficulty {
        line.push_str(&format!("  [{difficulty}]"));
    }
    if let Some(notes) = &record.notes {
        line.push_str(&format!("  \"{notes}\""));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn parses_all_duration_forms() {
        assert_eq!(parse_duration_secs("90"), Ok(90));
        assert_eq!(parse_duration_secs("90s"), Ok(90));
        assert_eq!(parse_duration_secs("3m"), Ok(180));
        assert_eq!(parse_duration_secs("1m30s"), Ok(90));
        assert_eq!(parse_duration_secs("1m30"), Ok(90));
        assert_eq!(parse_duration_secs(" 2M "), Ok(120));
        assert_eq!(parse_duration_secs("0s"), Ok(0));
    }

    #[test]
    fn rejects_bad_durations() {
        assert!(parse_duration_secs("").is_err());
        assert!(parse_duration_secs("abc").is_err());
        assert!(parse_duration_secs("1h").is_err());
        assert!(parse_duration_secs("m").is_err());
        assert!(parse_duration_secs("99999999999").is_err());
    }

    #[test]
    fn formats_times() {
        assert_eq!(format_clock(180), "3:00");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_duration(125), "2m 5s");
    }

    #[test]
    fn formats_relative_dates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let earlier_today = Utc.with_ymd_and_hms(2024, 3, 10, 1, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 3, 9, 23, 0, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap();
        assert_eq!(format_date(&earlier_today, &now), "Today");
        assert_eq!(format_date(&yesterday, &now), "Yesterday");
        assert_eq!(format_date(&older, &now), "Jan 05, 2024");
    }
}
