use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use thiserror::Error;

static WRONG_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Not a valid (?<current>\w+) \(looks more like a (?<actual>\w+)\)")
        .expect("static regex is valid")
});

/// The outcome of applying a sidecar to a single media file.
///
/// Every variant is recoverable at the batch level: a caller processing many
/// files logs or handles the error and moves on to the next file.
#[derive(Error, Debug)]
pub enum ApplyMetaError {
    /// A required sidecar field is absent or unusable. The file should be skipped.
    #[error("{} is missing sidecar field `{field}`", .path.display())]
    MissingMeta { path: PathBuf, field: String },

    /// The file content does not match its extension, e.g. a PNG named `.jpg`.
    /// `current` and `actual` are lower-cased and dot-prefixed (`.jpg`, `.png`).
    #[error("{} has extension {current} but looks like {actual}", .path.display())]
    WrongExtension {
        path: PathBuf,
        current: String,
        actual: String,
    },

    #[error("exiftool failed on {}: {message}", .path.display())]
    ExifTool { path: PathBuf, message: String },

    #[error("could not read sidecar {}", .path.display())]
    Sidecar {
        path: PathBuf,
        #[source]
        source: crate::sidecar::SidecarError,
    },
}

impl ApplyMetaError {
    /// Maps a failure message from the tag-writing step to a typed error.
    ///
    /// Messages like `Not a valid JPEG (looks more like a PNG)` become
    /// [`ApplyMetaError::WrongExtension`], anything else [`ApplyMetaError::ExifTool`].
    pub fn from_write_failure(path: PathBuf, message: String) -> Self {
        if let Some(caps) = WRONG_EXTENSION.captures(&message)
            && let (Some(current), Some(actual)) = (caps.name("current"), caps.name("actual"))
        {
            return Self::WrongExtension {
                current: format!(".{}", current.as_str().to_lowercase()),
                actual: format!(".{}", actual.as_str().to_lowercase()),
                path,
            };
        }
        Self::ExifTool { path, message }
    }
}

/// Errors raised while setting up the pipeline or driving a batch.
#[derive(Error, Debug)]
pub enum TakeoutMetaError {
    #[error("Exiftool failed to start")]
    Exiftool(#[from] exiftool::ExifToolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Default offset of {0} hours is not a valid UTC offset")]
    InvalidOffset(f64),
}
