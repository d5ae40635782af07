//! Building the set of tags written into a media file.
pub mod logic;
pub mod structs;

pub use logic::{build_write_tags, classification_time_tags};
pub use structs::{TagValue, WriteTags};
