use chrono::{Days, NaiveDate};

/// This is the standard way of converting a date to a history key in waterlog.
pub fn date_to_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Returns the 7 calendar days ending at `today` inclusive, in ascending order.
/// Days are produced with calendar arithmetic rather than fixed 24h offsets, so
/// the window stays correct across daylight-saving transitions.
pub fn week_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..7u64)
        .rev()
        .map(|i| {
            today
                .checked_sub_days(Days::new(i))
                .expect("Start of time should never happen")
        })
        .collect()
}
