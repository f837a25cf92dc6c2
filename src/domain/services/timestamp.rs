// src/domain/services/timestamp.rs
use chrono::{DateTime, Utc};

/// Format a creation timestamp for display.
///
/// With `smart` set, timestamps falling on the same UTC calendar day as
/// `now` render as a short relative expression ("5 minutes ago"); anything
/// older renders as an absolute date. Pure: the current time is an input,
/// never read from the environment.
pub fn format_created_at(created_at: DateTime<Utc>, now: DateTime<Utc>, smart: bool) -> String {
    if smart && created_at.date_naive() == now.date_naive() {
        return relative(created_at, now);
    }
    created_at.format("%b %-d, %Y").to_string()
}

fn relative(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    let seconds = elapsed.num_seconds().max(0);

    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} minute{} ago", minutes, plural(minutes));
    }
    let hours = minutes / 60;
    format!("{} hour{} ago", hours, plural(hours))
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
