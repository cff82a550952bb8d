use chrono::{DateTime, Duration, Utc};

/// Short "updated" label relative to `now`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed < Duration::minutes(1) {
        "just now".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed < Duration::days(7) {
        format!("{}d ago", elapsed.num_days())
    } else {
        then.format("%b %d").to_string()
    }
}

/// Clock time of an epoch-millis message timestamp, empty when unset.
pub fn clock_time(timestamp_millis: i64) -> String {
    if timestamp_millis <= 0 {
        return String::new();
    }
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_default()
}
