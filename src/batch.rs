//! Walking a Takeout folder and applying every sidecar in it.

use crate::applier::{MigrationContext, apply_meta_file};
use crate::error::{ApplyMetaError, TakeoutMetaError};
use crate::media::{MediaFile, is_media_file};
use crate::sidecar::find_sidecar;
use crate::tool::{TagWriter, TimeZoneProbe};
use crate::utils::list_files_walkdir_filtered;
use log::{error, info, warn};
use std::fmt;
use std::path::Path;

/// Per-file outcome counts for one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub applied: usize,
    pub renamed: usize,
    pub no_sidecar: usize,
    pub failed: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Applied: {}, renamed: {}, without sidecar: {}, failed: {}",
            self.applied, self.renamed, self.no_sidecar, self.failed
        )
    }
}

/// Applies every media file under `dir` that has a sidecar.
///
/// Per-file failures are logged and counted, only failing to walk `dir` is an error.
pub async fn process_dir<W: TagWriter, P: TimeZoneProbe>(
    dir: &Path,
    ctx: &mut MigrationContext<W, P>,
    include_hidden: bool,
    fix_extensions: bool,
) -> Result<Summary, TakeoutMetaError> {
    let files = list_files_walkdir_filtered(dir, include_hidden)?;
    info!("Found {} files in {}", files.len(), dir.display());

    let mut summary = Summary::default();
    for path in files.into_iter().filter(|p| is_media_file(p)) {
        let Some(json_path) = find_sidecar(&path) else {
            warn!("No sidecar for {}", path.display());
            summary.no_sidecar += 1;
            continue;
        };
        let Some(media_file) = MediaFile::new(path, json_path) else {
            continue;
        };
        process_file(&media_file, ctx, fix_extensions, &mut summary).await;
    }
    Ok(summary)
}

/// Applies one file, renaming and retrying once when its extension is wrong.
pub async fn process_file<W: TagWriter, P: TimeZoneProbe>(
    media_file: &MediaFile,
    ctx: &mut MigrationContext<W, P>,
    fix_extensions: bool,
    summary: &mut Summary,
) {
    let result = match apply_meta_file(media_file, ctx).await {
        Err(ApplyMetaError::WrongExtension { actual, .. }) if fix_extensions => {
            match media_file.with_extension(&actual) {
                Ok(renamed) => {
                    info!(
                        "Renamed {} to {}",
                        media_file.path.display(),
                        renamed.path.display()
                    );
                    summary.renamed += 1;
                    apply_meta_file(&renamed, ctx).await
                }
                Err(e) => {
                    error!("Could not rename {}: {e}", media_file.path.display());
                    summary.failed += 1;
                    return;
                }
            }
        }
        result => result,
    };

    match result {
        Ok(()) => summary.applied += 1,
        Err(e) => {
            error!("{e}");
            summary.failed += 1;
        }
    }
}
