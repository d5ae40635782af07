use crate::error::{ApplyMetaError, TakeoutMetaError};
use crate::media::MediaFile;
use crate::sidecar::read_sidecar;
use crate::tags::build_write_tags;
use crate::time::{offset_from_hours, resolve_local_timestamp};
use crate::tool::{ExifToolProbe, TagWriter, TimeZoneProbe};
use crate::utils::set_file_times;
use bon::bon;
use chrono::FixedOffset;
use exiftool::ExifTool;
use log::info;
use std::path::PathBuf;

/// Offset used when a file carries no offset of its own (JST).
pub const DEFAULT_OFFSET_HOURS: f64 = 9.0;

/// Flags passed with every write: no `_original` backup, QuickTime times in
/// UTC, and support for files over 4 GB.
pub const WRITE_ARGS: [&str; 5] = [
    "-overwrite_original",
    "-api",
    "quicktimeutc",
    "-api",
    "largefilesupport=1",
];

/// Everything [`apply_meta_file`] needs besides the file itself.
///
/// Holds a persistent exiftool process, so create it once and reuse it for a
/// whole batch:
/// ```rust,no_run
/// # use takeout_meta::{MigrationContext, TakeoutMetaError};
/// # fn main() -> Result<(), TakeoutMetaError> {
/// let ctx = MigrationContext::builder()
///     .default_offset_hours(-5.0)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct MigrationContext<W = ExifTool, P = ExifToolProbe> {
    pub writer: W,
    pub probe: P,
    pub default_offset: FixedOffset,
}

#[bon]
impl MigrationContext {
    /// Starts exiftool and validates the default offset.
    ///
    /// # Builder Arguments
    ///
    /// * `exiftool_path: Option<PathBuf>` - A specific `exiftool` executable. If `None`, `exiftool` is searched for in `PATH`.
    /// * `default_offset_hours: f64` - (Default: `9.0`) Offset applied when a file has no timezone of its own. Fractions are allowed (`5.5` is `+05:30`).
    ///
    /// # Errors
    ///
    /// * [`TakeoutMetaError::Exiftool`] if `exiftool` can't be started.
    /// * [`TakeoutMetaError::InvalidOffset`] if the offset is 24 hours or more.
    #[builder]
    pub fn new(
        exiftool_path: Option<PathBuf>,
        #[builder(default = DEFAULT_OFFSET_HOURS)] default_offset_hours: f64,
    ) -> Result<Self, TakeoutMetaError> {
        let default_offset = offset_from_hours(default_offset_hours)
            .ok_or(TakeoutMetaError::InvalidOffset(default_offset_hours))?;
        let (writer, probe) = match exiftool_path {
            Some(path) => (
                ExifTool::with_executable(&path)?,
                ExifToolProbe::with_executable(&path),
            ),
            None => (ExifTool::new()?, ExifToolProbe::new()),
        };
        Ok(Self {
            writer,
            probe,
            default_offset,
        })
    }
}

impl<W: TagWriter, P: TimeZoneProbe> MigrationContext<W, P> {
    pub fn with_tools(writer: W, probe: P, default_offset: FixedOffset) -> Self {
        Self {
            writer,
            probe,
            default_offset,
        }
    }
}

/// Stamps the capture time, description and GPS from `media_file`'s sidecar onto
/// the file, then sets its access and modification times to the capture instant.
///
/// # Errors
///
/// * [`ApplyMetaError::Sidecar`]: the sidecar can't be read or isn't JSON.
/// * [`ApplyMetaError::MissingMeta`]: no usable `photoTakenTime.timestamp`. Nothing is written.
/// * [`ApplyMetaError::WrongExtension`]: exiftool says the content is another format.
/// * [`ApplyMetaError::ExifTool`]: any other failure while writing.
pub async fn apply_meta_file<W: TagWriter, P: TimeZoneProbe>(
    media_file: &MediaFile,
    ctx: &mut MigrationContext<W, P>,
) -> Result<(), ApplyMetaError> {
    let path = &media_file.path;

    let meta = read_sidecar(&media_file.json_path)
        .await
        .map_err(|source| ApplyMetaError::Sidecar {
            path: media_file.json_path.clone(),
            source,
        })?;

    let taken_utc = meta
        .photo_taken_utc()
        .ok_or_else(|| ApplyMetaError::MissingMeta {
            path: path.clone(),
            field: "photoTakenTime".to_string(),
        })?;

    let local = resolve_local_timestamp(&mut ctx.probe, path, taken_utc, ctx.default_offset);
    let tags = build_write_tags(&meta, media_file.meta_type, &local.value);

    ctx.writer
        .write_tags(path, &tags, &WRITE_ARGS)
        .map_err(|e| ApplyMetaError::from_write_failure(path.clone(), e.to_string()))?;
    set_file_times(path, taken_utc)
        .map_err(|e| ApplyMetaError::from_write_failure(path.clone(), e.to_string()))?;

    info!(
        "Applied {} tags to {} (taken {})",
        tags.len(),
        path.display(),
        local.value
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MetaType;
    use crate::tags::{TagValue, WriteTags};
    use crate::tool::{ProbeError, TagWriteError};
    use chrono::{DateTime, TimeZone, Utc};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeWriter {
        calls: Vec<(PathBuf, WriteTags, Vec<String>)>,
        fail_with: Option<String>,
    }

    impl TagWriter for FakeWriter {
        fn write_tags(
            &mut self,
            path: &Path,
            tags: &WriteTags,
            extra_args: &[&str],
        ) -> Result<(), TagWriteError> {
            self.calls.push((
                path.to_path_buf(),
                tags.clone(),
                extra_args.iter().map(|a| a.to_string()).collect(),
            ));
            match &self.fail_with {
                Some(message) => Err(TagWriteError::Message(message.clone())),
                None => Ok(()),
            }
        }
    }

    struct FakeProbe(Option<String>);

    impl TimeZoneProbe for FakeProbe {
        fn probe_subsec_original(&mut self, _path: &Path) -> Result<String, ProbeError> {
            self.0
                .clone()
                .ok_or_else(|| ProbeError::Spawn(std::io::Error::other("no exiftool")))
        }
    }

    fn context(probe_output: Option<&str>) -> MigrationContext<FakeWriter, FakeProbe> {
        MigrationContext::with_tools(
            FakeWriter::default(),
            FakeProbe(probe_output.map(str::to_string)),
            FixedOffset::east_opt(9 * 3600).unwrap(),
        )
    }

    /// Writes a media file and its sidecar into a fresh temp dir.
    fn setup(file_name: &str, sidecar: &str) -> (TempDir, MediaFile) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name);
        let json_path = dir.path().join(format!("{file_name}.json"));
        fs::write(&path, b"media bytes").unwrap();
        fs::write(&json_path, sidecar).unwrap();
        let media_file = MediaFile::new(path, json_path).unwrap();
        (dir, media_file)
    }

    const SIDECAR: &str = r#"{
        "description": "Harbour at dusk",
        "photoTakenTime": { "timestamp": "1690877730" },
        "geoData": { "latitude": 35.6895, "longitude": 139.6917, "altitude": 40.5 }
    }"#;

    fn taken() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 8, 1, 8, 15, 30).unwrap()
    }

    #[tokio::test]
    async fn test_missing_timestamp_writes_nothing() {
        let (_dir, media_file) = setup("a.jpg", r#"{ "description": "no time" }"#);
        let mut ctx = context(None);

        let result = apply_meta_file(&media_file, &mut ctx).await;

        assert!(matches!(
            result,
            Err(ApplyMetaError::MissingMeta { ref field, .. }) if field == "photoTakenTime"
        ));
        assert!(ctx.writer.calls.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_sidecar() {
        let (_dir, media_file) = setup("a.jpg", "not json at all");
        let mut ctx = context(None);

        let result = apply_meta_file(&media_file, &mut ctx).await;

        assert!(matches!(result, Err(ApplyMetaError::Sidecar { .. })));
        assert!(ctx.writer.calls.is_empty());
    }

    #[tokio::test]
    async fn test_success_with_probed_offset() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, media_file) = setup("IMG_0001.jpg", SIDECAR);
        let mut ctx = context(Some(
            "Date/Time Original              : 2023:08:01 10:15:30.500+02:00\n",
        ));

        apply_meta_file(&media_file, &mut ctx).await?;

        assert_eq!(ctx.writer.calls.len(), 1);
        let (path, tags, args) = &ctx.writer.calls[0];
        assert_eq!(path, &media_file.path);
        assert_eq!(args, &WRITE_ARGS);

        let local = TagValue::from("2023-08-01 10:15:30.500+02:00");
        assert_eq!(tags.get("SubSecDateTimeOriginal"), Some(&local));
        assert_eq!(tags.get("ModifyDate"), Some(&local));
        assert_eq!(tags.get("ImageDescription"), Some(&TagValue::from("Harbour at dusk")));
        assert_eq!(tags.get("GPSLatitude"), Some(&TagValue::Number(35.6895)));

        // File times follow the UTC instant, not the local string.
        let metadata = fs::metadata(&media_file.path)?;
        assert_eq!(DateTime::<Utc>::from(metadata.modified()?), taken());
        assert_eq!(DateTime::<Utc>::from(metadata.accessed()?), taken());
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_read_only_media_gets_file_times() -> Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, media_file) = setup("IMG_0002.jpg", SIDECAR);
        fs::set_permissions(&media_file.path, fs::Permissions::from_mode(0o444))?;
        let mut ctx = context(None);

        apply_meta_file(&media_file, &mut ctx).await?;

        let metadata = fs::metadata(&media_file.path)?;
        assert_eq!(DateTime::<Utc>::from(metadata.modified()?), taken());
        assert_eq!(DateTime::<Utc>::from(metadata.accessed()?), taken());
        Ok(())
    }

    #[tokio::test]
    async fn test_quicktime_with_default_offset() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, media_file) = setup(
            "VID_0001.mp4",
            r#"{ "photoTakenTime": { "timestamp": "1690877730" } }"#,
        );
        assert_eq!(media_file.meta_type, MetaType::QuickTime);
        let mut ctx = context(None);

        apply_meta_file(&media_file, &mut ctx).await?;

        let (_, tags, _) = &ctx.writer.calls[0];
        let local = TagValue::from("2023-08-01 17:15:30+09:00");
        for tag in [
            "DateTimeOriginal",
            "CreateDate",
            "ModifyDate",
            "TrackCreateDate",
            "TrackModifyDate",
            "MediaCreateDate",
            "MediaModifyDate",
        ] {
            assert_eq!(tags.get(tag), Some(&local), "{tag}");
        }
        assert!(!tags.contains_key("Description"));
        assert!(!tags.contains_key("GPSAltitude"));
        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_extension() {
        let (_dir, media_file) = setup("photo.jpeg", SIDECAR);
        let mut ctx = context(None);
        ctx.writer.fail_with =
            Some("Error: Not a valid JPEG (looks more like a PNG) - photo.jpeg".to_string());

        let result = apply_meta_file(&media_file, &mut ctx).await;

        match result {
            Err(ApplyMetaError::WrongExtension {
                path,
                current,
                actual,
            }) => {
                assert_eq!(path, media_file.path);
                assert_eq!(current, ".jpeg");
                assert_eq!(actual, ".png");
            }
            other => panic!("expected WrongExtension, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_write_failure_keeps_file_times() -> Result<(), Box<dyn std::error::Error>>
    {
        let (_dir, media_file) = setup("a.heic", SIDECAR);
        let before = fs::metadata(&media_file.path)?.modified()?;
        let mut ctx = context(None);
        ctx.writer.fail_with = Some("Error: Writing of HEIC files is not supported".to_string());

        let result = apply_meta_file(&media_file, &mut ctx).await;

        assert!(matches!(
            result,
            Err(ApplyMetaError::ExifTool { ref message, .. })
                if message.contains("not supported")
        ));
        assert_eq!(fs::metadata(&media_file.path)?.modified()?, before);
        Ok(())
    }

    #[test]
    fn test_builder_rejects_invalid_offset() {
        let result = MigrationContext::builder().default_offset_hours(25.0).build();
        assert!(matches!(result, Err(TakeoutMetaError::InvalidOffset(h)) if h == 25.0));
    }
}
