use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which embedded-tag vocabulary exiftool should target for a file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MetaType {
    /// Still images carrying EXIF/XMP/IPTC blocks.
    Exif,
    /// MP4/MOV style containers with QuickTime atoms.
    QuickTime,
    /// Formats exiftool can't hold capture times for; only generic tags are written.
    None,
}

impl MetaType {
    /// Classifies a file extension (without the dot, any case).
    ///
    /// Returns `None` when the extension is not a media type handled here.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" | "heic" | "heif" | "png" | "tif" | "tiff" | "webp"
            | "dng" | "avif" => Some(Self::Exif),
            "mp4" | "m4v" | "mov" | "qt" | "3gp" | "3g2" => Some(Self::QuickTime),
            "gif" | "bmp" | "avi" | "mkv" | "wmv" | "mpg" | "mpeg" | "mts" | "m2ts" | "webm" => {
                Some(Self::None)
            }
            _ => None,
        }
    }
}

/// A media file paired with its Takeout sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub json_path: PathBuf,
    pub meta_type: MetaType,
}

impl MediaFile {
    /// Builds a `MediaFile`, classifying it by extension.
    /// Returns `None` for files that are not recognised media.
    pub fn new(path: impl Into<PathBuf>, json_path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let meta_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MetaType::from_extension)?;
        Some(Self {
            path,
            json_path: json_path.into(),
            meta_type,
        })
    }

    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Renames the file on disk to `extension` (with or without leading dot) and
    /// returns the reclassified file. The sidecar path is kept as is.
    pub fn with_extension(&self, extension: &str) -> std::io::Result<Self> {
        let extension = extension.trim_start_matches('.');
        let new_path = self.path.with_extension(extension);
        let meta_type = MetaType::from_extension(extension).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unsupported media extension: .{extension}"),
            )
        })?;
        if new_path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", new_path.display()),
            ));
        }
        std::fs::rename(&self.path, &new_path)?;
        Ok(Self {
            path: new_path,
            json_path: self.json_path.clone(),
            meta_type,
        })
    }
}

/// True when the path has an extension that [`MetaType::from_extension`] recognises.
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(MetaType::from_extension)
        .is_some()
}
