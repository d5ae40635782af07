//! Google Takeout JSON sidecars: the serde model, reading, and locating them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Takeout truncates the sidecar name to this many characters before `.json`.
const MAX_SIDECAR_STEM_LEN: usize = 46;

#[derive(Error, Debug)]
pub enum SidecarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The subset of a Takeout sidecar this crate reads. Other keys (`title`,
/// `creationTime`, `imageViews`, ...) are ignored.
///
/// ```json
/// {
///   "description": "",
///   "photoTakenTime": { "timestamp": "1476983598" },
///   "geoData": { "latitude": 0.0, "longitude": 0.0, "altitude": 0.0 }
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoogleMetadata {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo_taken_time: Option<GoogleTimestamp>,
    #[serde(default)]
    pub geo_data: Option<GeoData>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct GoogleTimestamp {
    #[serde(default)]
    pub timestamp: Option<TimestampValue>,
}

/// Takeout writes Unix seconds as a string; some re-exported sidecars use a number.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TimestampValue {
    Text(String),
    Number(i64),
    Float(f64),
}

impl TimestampValue {
    /// Whole seconds. Text is read up to the first non-digit (`"1690877730.0"`
    /// is `1690877730`), fractions are dropped.
    pub fn as_seconds(&self) -> Option<i64> {
        match self {
            Self::Text(text) => leading_integer(text),
            Self::Number(secs) => Some(*secs),
            Self::Float(secs) if secs.is_finite() => Some(secs.trunc() as i64),
            Self::Float(_) => None,
        }
    }
}

/// Optional sign and leading ASCII digits after any whitespace. `None` without digits.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct GeoData {
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl GoogleMetadata {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Raw `photoTakenTime.timestamp`, if the field is present at all.
    pub fn photo_taken_timestamp(&self) -> Option<&TimestampValue> {
        self.photo_taken_time.as_ref()?.timestamp.as_ref()
    }

    /// The UTC capture instant, `None` if the timestamp is absent or has no leading integer.
    pub fn photo_taken_utc(&self) -> Option<DateTime<Utc>> {
        let secs = self.photo_taken_timestamp()?.as_seconds()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// `(altitude, latitude, longitude)` when all three axes are present.
    pub fn gps(&self) -> Option<(f64, f64, f64)> {
        let geo = self.geo_data.as_ref()?;
        Some((geo.altitude?, geo.latitude?, geo.longitude?))
    }
}

pub async fn read_sidecar(path: &Path) -> Result<GoogleMetadata, SidecarError> {
    let json = tokio::fs::read_to_string(path).await?;
    Ok(GoogleMetadata::from_json(&json)?)
}

/// Locates the sidecar Takeout wrote for `media_path`.
///
/// Covers the plain `<file>.json` name, the newer `.supplemental-metadata.json`
/// name (also truncated), numbered duplicates like `IMG(1).jpg` whose counter
/// moves behind the extension, and the old `<stem>.json` layout.
pub fn find_sidecar(media_path: &Path) -> Option<PathBuf> {
    sidecar_candidates(media_path)
        .into_iter()
        .find(|candidate| candidate.is_file())
}

fn sidecar_candidates(media_path: &Path) -> Vec<PathBuf> {
    let Some(file_name) = media_path.file_name().map(|n| n.to_string_lossy().into_owned())
    else {
        return Vec::new();
    };
    let supplemental = format!("{file_name}.supplemental-metadata");

    let mut names = vec![
        format!("{file_name}.json"),
        format!("{supplemental}.json"),
        format!("{}.json", truncate(&supplemental, MAX_SIDECAR_STEM_LEN)),
    ];

    // `IMG(1).jpg` -> `IMG.jpg(1).json`
    if let Some(stem) = media_path.file_stem().map(|s| s.to_string_lossy())
        && let Some(open) = stem.rfind('(')
        && stem.ends_with(')')
    {
        let (clean_stem, counter) = stem.split_at(open);
        let clean_name = match media_path.extension() {
            Some(ext) => format!("{clean_stem}.{}", ext.to_string_lossy()),
            None => clean_stem.to_string(),
        };
        let clean_supplemental = format!("{clean_name}.supplemental-metadata");
        names.push(format!("{clean_name}{counter}.json"));
        names.push(format!(
            "{}{counter}.json",
            truncate(&clean_supplemental, MAX_SIDECAR_STEM_LEN)
        ));
    }

    if let Some(stem) = media_path.file_stem() {
        names.push(format!("{}.json", stem.to_string_lossy()));
    }

    names.dedup();
    names
        .into_iter()
        .map(|name| media_path.with_file_name(name))
        .collect()
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
