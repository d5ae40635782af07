use super::{ProbeError, TagWriteError, TagWriter, TimeZoneProbe};
use crate::tags::WriteTags;
use exiftool::ExifTool;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs a one-off `exiftool -SubSecDateTimeOriginal <path>` per probe.
#[derive(Debug, Clone)]
pub struct ExifToolProbe {
    executable: PathBuf,
}

impl ExifToolProbe {
    pub fn new() -> Self {
        Self::with_executable(Path::new("exiftool"))
    }

    pub fn with_executable(executable: &Path) -> Self {
        Self {
            executable: executable.to_path_buf(),
        }
    }
}

impl Default for ExifToolProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeZoneProbe for ExifToolProbe {
    fn probe_subsec_original(&mut self, path: &Path) -> Result<String, ProbeError> {
        let output = Command::new(&self.executable)
            .arg("-SubSecDateTimeOriginal")
            .arg(path)
            .output()?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TagWriter for ExifTool {
    fn write_tags(
        &mut self,
        path: &Path,
        tags: &WriteTags,
        extra_args: &[&str],
    ) -> Result<(), TagWriteError> {
        let args = write_args(path, tags, extra_args);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let stdout = self.execute_lines(&args)?;
        // Some failures only show up in the summary line, not on stderr.
        if let Some(line) = stdout.iter().find(|l| l.contains("weren't updated due to errors")) {
            return Err(TagWriteError::Message(line.trim().to_string()));
        }
        Ok(())
    }
}

/// Builds `-TAG=VALUE... {extra_args...} {path}` for a write.
///
/// The stay-open protocol reads one argument per line, so when a value holds a
/// line break all values are HTML-escaped and `-E` tells exiftool to decode them.
pub fn write_args(path: &Path, tags: &WriteTags, extra_args: &[&str]) -> Vec<String> {
    let values: Vec<(&str, String)> = tags
        .iter()
        .map(|(name, value)| (*name, value.to_string()))
        .collect();
    let escape = values
        .iter()
        .any(|(_, value)| value.contains(['\n', '\r']));

    let mut args = Vec::with_capacity(values.len() + extra_args.len() + 2);
    if escape {
        args.push("-E".to_string());
    }
    for (name, value) in values {
        let value = if escape { escape_html(&value) } else { value };
        args.push(format!("-{name}={value}"));
    }
    args.extend(extra_args.iter().map(|arg| arg.to_string()));
    args.push(path.to_string_lossy().into_owned());
    args
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('\n', "&#xa;")
        .replace('\r', "&#xd;")
}
