//! Choosing between the file's own offset and the configured default.

use super::parsing::{format_offset, parse_probe_output};
use crate::tool::TimeZoneProbe;
use chrono::{DateTime, FixedOffset, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the local timestamp was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum TimestampSource {
    /// Date, time and offset all read back from the file.
    Probed,
    /// Date and time from the file, offset from configuration.
    ProbedWithDefaultOffset,
    /// Sidecar UTC instant shifted by the configured offset.
    DefaultOffset,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalTimestamp {
    /// `YYYY-MM-DD HH:MM:SS[.fff]±HH:MM`
    pub value: String,
    pub source: TimestampSource,
}

/// `YYYY-MM-DD HH:MM:SS±HH:MM` for `instant` seen at `offset`.
pub fn format_with_offset(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    format!(
        "{}{}",
        instant.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S"),
        format_offset(offset)
    )
}

/// Resolves the local timestamp for `path`.
///
/// Prefers the file's existing `SubSecDateTimeOriginal`. When the probe fails
/// or prints nothing parseable, falls back to `taken_utc` at `default_offset`.
/// Never fails.
pub fn resolve_local_timestamp<P: TimeZoneProbe + ?Sized>(
    probe: &mut P,
    path: &Path,
    taken_utc: DateTime<Utc>,
    default_offset: FixedOffset,
) -> LocalTimestamp {
    match probe.probe_subsec_original(path) {
        Ok(output) => {
            debug!("SubSecDateTimeOriginal probe for {}: {}", path.display(), output.trim());
            if let Some(probed) = parse_probe_output(&output) {
                let source = if probed.offset.is_some() {
                    TimestampSource::Probed
                } else {
                    TimestampSource::ProbedWithDefaultOffset
                };
                let value = probed.to_local_string(&format_offset(default_offset));
                debug!("Using probed time {value} for {}", path.display());
                return LocalTimestamp { value, source };
            }
            warn!(
                "No SubSecDateTimeOriginal in {}, using default offset",
                path.display()
            );
        }
        Err(e) => {
            warn!(
                "Failed to probe {}, using default offset: {e}",
                path.display()
            );
        }
    }

    let value = format_with_offset(taken_utc, default_offset);
    debug!("Using default offset time {value} for {}", path.display());
    LocalTimestamp {
        value,
        source: TimestampSource::DefaultOffset,
    }
}
