use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Printable width of a string that may contain ANSI color escapes.
pub fn plain_len(s: &str) -> usize {
    let mut n = 0;
    let mut esc = false;
    for c in s.chars() {
        match (esc, c) {
            (true, 'm') => esc = false,
            (true, _) => {}
            (false, '\x1B') => esc = true,
            (false, _) => n += 1,
        }
    }
    n
}

/// Calendar date of a stored timestamp as `YYYY-MM-DD`. Understands RFC 3339
/// (REST) and SQLite's `datetime()` text; anything else is shown unchanged.
pub fn short_date(ts: &str) -> String {
    let ts = ts.trim();
    let date = DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(ts, "%Y-%m-%d"));

    match date {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => ts.to_string(),
    }
}
