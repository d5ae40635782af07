//! The two places the pipeline talks to exiftool, behind traits so tests can
//! substitute fakes for the real process.
mod process;

pub use process::{ExifToolProbe, write_args};

use crate::tags::WriteTags;
use std::path::Path;
use std::process::ExitStatus;
use thiserror::Error;

/// Reads the file's existing `SubSecDateTimeOriginal`.
pub trait TimeZoneProbe {
    /// Returns the text output of `exiftool -SubSecDateTimeOriginal <path>`.
    fn probe_subsec_original(&mut self, path: &Path) -> Result<String, ProbeError>;
}

/// Writes a tag set into a file.
pub trait TagWriter {
    fn write_tags(
        &mut self,
        path: &Path,
        tags: &WriteTags,
        extra_args: &[&str],
    ) -> Result<(), TagWriteError>;
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Could not run exiftool: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("exiftool exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

#[derive(Error, Debug)]
pub enum TagWriteError {
    #[error(transparent)]
    ExifTool(#[from] exiftool::ExifToolError),

    #[error("{0}")]
    Message(String),
}
