use chrono::{Datelike, Local, NaiveDate};

/// `"<base> MM-DD-YYYY"` for the given day.
pub fn meeting_title_for(base: &str, date: NaiveDate) -> String {
    format!(
        "{} {:02}-{:02}-{}",
        base.trim(),
        date.month(),
        date.day(),
        date.year()
    )
}

/// Title used when a meeting is started or created without one.
pub fn default_meeting_title(base: &str) -> String {
    meeting_title_for(base, Local::now().date_naive())
}

/// Returns the caller's title unless it is missing or blank.
pub fn title_or_default(title: Option<&str>, base: &str) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => default_meeting_title(base),
    }
}
