//! Recording file names.
//!
//! Call recordings: `{timestamp}_{direction}_{number|unknown}[_{name}].{ext}`
//! with `timestamp` as `yyyy-MM-dd_HH-mm-ss`. Manual recordings:
//! `recording_{yyyyMMdd_HHmmss}.{ext}`.

use crate::{call::CallDirection, capture::OutputFormat};

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const MANUAL_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const MANUAL_PREFIX: &str = "recording_";
const UNKNOWN_NUMBER: &str = "unknown";

/// Characters that cannot appear in a file name component on common filesystems.
const RESERVED_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Components of a call recording file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingFileName {
    /// Local time the capture started.
    pub timestamp: NaiveDateTime,
    /// Call direction.
    pub direction: CallDirection,
    /// Remote party. `None` is written as `unknown`.
    pub number: Option<String>,
    /// Sanitised display name.
    pub display_name: Option<String>,
    /// Output format, which decides the extension.
    pub format: OutputFormat,
}

impl RecordingFileName {
    /// Builds a file name, sanitising the number and display name.
    pub fn new(
        timestamp: NaiveDateTime,
        direction: CallDirection,
        number: Option<&str>,
        display_name: Option<&str>,
        format: OutputFormat,
    ) -> Self {
        Self {
            timestamp,
            direction,
            number: number
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(|n| n.replace(RESERVED_CHARS, "_")),
            display_name: display_name.and_then(sanitize_display_name),
            format,
        }
    }

    /// Renders the file name without a directory.
    pub fn file_name(&self) -> String {
        let timestamp = self.timestamp.format(TIMESTAMP_FORMAT);
        let number = self.number.as_deref().unwrap_or(UNKNOWN_NUMBER);
        let ext = self.format.extension();

        match &self.display_name {
            Some(name) => format!(
                "{}_{}_{}_{}.{}",
                timestamp,
                self.direction.tag(),
                number,
                name,
                ext
            ),
            None => format!("{}_{}_{}.{}", timestamp, self.direction.tag(), number, ext),
        }
    }

    /// Full path of the file inside `dir`.
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }

    /// Parses a file name produced by [`RecordingFileName::file_name`].
    ///
    /// Direction `Unknown` was written as `IN` and reads back as `Incoming`.
    pub fn parse(file_name: &str) -> Option<Self> {
        let (stem, ext) = file_name.rsplit_once('.')?;
        let format = OutputFormat::from_extension(ext)?;

        let mut parts = stem.splitn(5, '_');
        let date = parts.next()?;
        let time = parts.next()?;
        let direction = CallDirection::from_tag(parts.next()?)?;
        let number = parts.next()?;
        let display_name = parts.next().filter(|name| !name.is_empty());

        let timestamp =
            NaiveDateTime::parse_from_str(&format!("{}_{}", date, time), TIMESTAMP_FORMAT).ok()?;

        Some(Self {
            timestamp,
            direction,
            number: (number != UNKNOWN_NUMBER).then(|| number.to_string()),
            display_name: display_name.map(str::to_string),
            format,
        })
    }
}

/// File name for a manual, non-call recording.
pub fn manual_file_name(timestamp: NaiveDateTime, format: OutputFormat) -> String {
    format!(
        "{}{}.{}",
        MANUAL_PREFIX,
        timestamp.format(MANUAL_TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// Parses a name produced by [`manual_file_name`] back into its timestamp.
pub fn parse_manual_file_name(file_name: &str) -> Option<NaiveDateTime> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    OutputFormat::from_extension(ext)?;
    let timestamp = stem.strip_prefix(MANUAL_PREFIX)?;
    NaiveDateTime::parse_from_str(timestamp, MANUAL_TIMESTAMP_FORMAT).ok()
}

/// Collapses every whitespace run into one underscore.
///
/// Reserved path characters also become underscores. Returns `None` only for
/// an empty name.
pub fn sanitize_display_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }

    let mut sanitized = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                sanitized.push('_');
            }
            in_whitespace = true;
        } else {
            sanitized.push(if RESERVED_CHARS.contains(&c) { '_' } else { c });
            in_whitespace = false;
        }
    }

    Some(sanitized)
}
