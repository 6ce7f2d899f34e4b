use crate::{
    CoreResult,
    capture::OutputFormat,
    session::{Recording, RecordingFileName, parse_manual_file_name},
};

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use tracing::{debug, instrument, warn};

/// Directory holding every recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingsDir {
    path: PathBuf,
}

impl RecordingsDir {
    /// Wraps `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the directory if it does not exist yet.
    #[track_caller]
    pub fn ensure(&self) -> CoreResult<()> {
        if !self.path.exists() {
            fs::create_dir_all(&self.path)?;
            debug!(dir = ?self.path, "Created recordings directory");
        }
        Ok(())
    }

    /// Lists recordings, newest first.
    ///
    /// Only files with a known recording extension are returned and empty
    /// files are skipped. A missing directory is created and yields an empty
    /// list.
    #[track_caller]
    #[instrument(skip(self), fields(dir = ?self.path))]
    pub fn list(&self) -> CoreResult<Vec<Recording>> {
        self.ensure()?;

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() || metadata.len() == 0 {
                continue;
            }

            let path = entry.path();
            let known_format = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(OutputFormat::from_extension)
                .is_some();
            if !known_format {
                continue;
            }

            let modified = match metadata.modified() {
                Ok(time) => time,
                Err(e) => {
                    warn!(path = ?path, error = %e, "No modification time, skipping");
                    continue;
                }
            };

            entries.push((modified, path));
        }

        entries.sort_by(|a, b| b.0.cmp(&a.0));

        let recordings: Vec<Recording> = entries
            .into_iter()
            .map(|(modified, path)| describe(path, DateTime::<Local>::from(modified)))
            .collect();

        debug!(count = recordings.len(), "Recordings listed");

        Ok(recordings)
    }
}

fn describe(path: PathBuf, modified: DateTime<Local>) -> Recording {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(name) = RecordingFileName::parse(&file_name) {
        return Recording {
            path,
            direction: Some(name.direction),
            phone_number: name.number,
            display_name: name.display_name,
            started_at: name.timestamp,
            location: None,
        };
    }

    let started_at = parse_manual_file_name(&file_name).unwrap_or_else(|| modified.naive_local());

    Recording {
        path,
        direction: None,
        phone_number: None,
        display_name: None,
        started_at,
        location: None,
    }
}
