//! Parsing of exiftool probe output and formatting of UTC offsets.

use chrono::FixedOffset;
use regex::Regex;
use std::sync::LazyLock;

// `YYYY:MM:DD HH:MM:SS[.fff][±HH:MM]`, anywhere in exiftool's text output.
static SUBSEC_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}:\d{2}:\d{2}) (\d{2}:\d{2}:\d{2}(?:\.\d+)?)([+\-]\d{2}:\d{2})?")
        .expect("static regex is valid")
});

/// A capture time as read back from the file's own `SubSecDateTimeOriginal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedTime {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM:SS` with the fraction exactly as exiftool printed it.
    pub time: String,
    /// `±HH:MM`, when the tag carried one.
    pub offset: Option<String>,
}

impl ProbedTime {
    /// Renders `YYYY-MM-DD HH:MM:SS[.fff]±HH:MM`, using `fallback_offset`
    /// when the probe did not report an offset.
    pub fn to_local_string(&self, fallback_offset: &str) -> String {
        let offset = self.offset.as_deref().unwrap_or(fallback_offset);
        format!("{} {}{}", self.date, self.time, offset)
    }
}

/// Finds the first EXIF-style date-time in `output`.
///
/// exiftool prints `Date/Time Original              : 2023:08:01 10:15:30.500+02:00`;
/// only the value part is matched so the label layout does not matter.
pub fn parse_probe_output(output: &str) -> Option<ProbedTime> {
    let caps = SUBSEC_DATETIME.captures(output)?;
    Some(ProbedTime {
        date: caps.get(1)?.as_str().replace(':', "-"),
        time: caps.get(2)?.as_str().to_string(),
        offset: caps.get(3).map(|m| m.as_str().to_string()),
    })
}

/// Converts a fractional hour count (`9.0`, `-5.5`, `5.75`) to a fixed offset,
/// rounded to the minute. `None` if it is not finite or not below 24 hours.
pub fn offset_from_hours(hours: f64) -> Option<FixedOffset> {
    if !hours.is_finite() || hours.abs() >= 24.0 {
        return None;
    }
    let minutes = (hours * 60.0).round() as i32;
    FixedOffset::east_opt(minutes * 60)
}

/// Formats an offset as `±HH:MM`.
pub fn format_offset(offset: FixedOffset) -> String {
    let total_minutes = offset.local_minus_utc() / 60;
    let sign = if total_minutes < 0 { '-' } else { '+' };
    let total_minutes = total_minutes.abs();
    format!("{sign}{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}
