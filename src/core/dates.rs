use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, NaiveDateTime};

use crate::models::DateWindow;

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Parse an upstream date string down to its calendar day
///
/// Accepts plain `YYYY-MM-DD`, RFC 3339 timestamps (converted to local
/// time first) and naive date-times.
/// Anything else yields `None`, which callers treat as "no date".
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    // Offset timestamps land on the service's local calendar, like `today`
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Local).date_naive());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
}

/// Inclusive `[start, end]` days covered by a window, or `None` for `All`
pub fn window_bounds(window: DateWindow, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match window {
        DateWindow::All => None,
        DateWindow::Next7Days => {
            let end = today.checked_add_days(Days::new(7))?;
            Some((today, end))
        }
        DateWindow::ThisMonth => month_bounds(today.with_day(1)?),
        DateWindow::NextMonth => {
            let first = today.with_day(1)?.checked_add_months(Months::new(1))?;
            month_bounds(first)
        }
    }
}

fn month_bounds(first: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

/// Decide whether a listing's date range should be shown for a window
///
/// A listing without dates is always available. One that ended before
/// `today` is hidden for every window except `All`. With both dates the
/// ranges must overlap; a start alone is a single-day event; an end alone
/// means the listing runs until that day.
pub fn matches_date_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    window: DateWindow,
    today: NaiveDate,
) -> bool {
    if window == DateWindow::All {
        return true;
    }

    if start.is_none() && end.is_none() {
        return true;
    }

    if matches!(end, Some(end) if end < today) {
        return false;
    }

    let Some((window_start, window_end)) = window_bounds(window, today) else {
        return true;
    };

    match (start, end) {
        (Some(start), Some(end)) => start <= window_end && end >= window_start,
        (Some(start), None) => start >= window_start && start <= window_end,
        (None, Some(end)) => end >= window_start,
        (None, None) => true,
    }
}
