use chrono::{Duration, NaiveTime};

/// Hour at which the first default period starts.
const FIRST_PERIOD_HOUR: u32 = 9;

/// Formats a time as HH:MM
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Default label for a 1-based period: period 1 is "09:00-10:00",
/// period 2 is "10:00-11:00", and so on in one-hour steps.
pub fn default_period_label(period: u32) -> String {
    let hour = (FIRST_PERIOD_HOUR + period.saturating_sub(1)) % 24;
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(start) => {
            let end = start + Duration::hours(1);
            format!("{}-{}", format_time(start), format_time(end))
        }
        None => format!("Period {}", period),
    }
}

/// Default labels for `count` periods
pub fn default_time_slots(count: u32) -> Vec<String> {
    (1..=count).map(default_period_label).collect()
}

/// Fills in labels for the periods the caller did not name.
///
/// Labels given by the caller are kept (trimmed) in order; blank entries and
/// any missing tail get the default label for that period. Extra labels
/// beyond `count` are dropped.
pub fn complete_time_slots(count: u32, provided: &[String]) -> Vec<String> {
    (1..=count)
        .map(|period| {
            provided
                .get(period as usize - 1)
                .map(|label| label.trim())
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| default_period_label(period))
        })
        .collect()
}
