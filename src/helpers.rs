use chrono::NaiveDateTime;

/// Calendar format used by the `cd` column of the close-approach feed.
pub const CD_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Format shared by every writer for `datetime_utc`.
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse `"YYYY-Mon-DD hh:mm"` (e.g. `2000-Jan-01 00:00`) → naive UTC timestamp
pub fn cd_to_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), CD_FORMAT).ok()
}

/// Render a timestamp as `"YYYY-MM-DD hh:mm"`
pub fn datetime_to_str(dt: &NaiveDateTime) -> String {
    dt.format(OUTPUT_FORMAT).to_string()
}

/// Inverse of [`datetime_to_str`]
pub fn str_to_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), OUTPUT_FORMAT).ok()
}
