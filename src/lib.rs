//! # Takeout Meta
//!
//! Put the metadata from Google Takeout JSON sidecars back into the photos and
//! videos they describe.
//!
//! A Takeout export ships every media file with a `.json` sidecar holding the
//! capture time, description and location. This crate reads that sidecar and
//! writes the values into the file with `exiftool`:
//!
//! - **Capture time**: written to the SubSec, EXIF and QuickTime date tags. The
//!   offset comes from the file's own `SubSecDateTimeOriginal` when it has one,
//!   otherwise from a configured default.
//! - **Description**: copied to `Description`, `Caption-Abstract` and `ImageDescription`.
//! - **GPS**: altitude, latitude and longitude, when all three are known.
//! - **File times**: access and modification time are set to the capture instant.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use takeout_meta::{MediaFile, MigrationContext, apply_meta_file};
//!
//! #[tokio::main]
//! async fn main() -> color_eyre::Result<()> {
//!     let mut ctx = MigrationContext::builder().default_offset_hours(1.0).build()?;
//!
//!     let media_file = MediaFile::new("Takeout/IMG_0001.jpg", "Takeout/IMG_0001.jpg.json")
//!         .expect("jpg is a media file");
//!     if let Err(e) = apply_meta_file(&media_file, &mut ctx).await {
//!         eprintln!("Skipped: {e}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod applier;
pub mod batch;
pub mod error;
pub mod media;
pub mod sidecar;
pub mod tags;
pub mod time;
pub mod tool;
pub mod utils;

pub use applier::{DEFAULT_OFFSET_HOURS, MigrationContext, WRITE_ARGS, apply_meta_file};
pub use batch::{Summary, process_dir};
pub use error::{ApplyMetaError, TakeoutMetaError};
pub use media::{MediaFile, MetaType};
pub use sidecar::{GoogleMetadata, find_sidecar, read_sidecar};
pub use tool::{TagWriter, TimeZoneProbe};
