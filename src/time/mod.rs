//! Working out the local timestamp string written into the time tags.
mod logic;
pub mod parsing;

pub use logic::{LocalTimestamp, TimestampSource, format_with_offset, resolve_local_timestamp};
pub use parsing::{ProbedTime, format_offset, offset_from_hours, parse_probe_output};
