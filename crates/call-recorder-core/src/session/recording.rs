use crate::call::CallDirection;

use std::path::PathBuf;

use chrono::NaiveDateTime;

/// Coordinates attached to a manual recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// A finished or listed recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// Location of the audio file.
    pub path: PathBuf,
    /// Call direction. `None` for manual recordings.
    pub direction: Option<CallDirection>,
    /// Remote party, when known.
    pub phone_number: Option<String>,
    /// Sanitised display name, when one was resolved.
    pub display_name: Option<String>,
    /// When capture started.
    pub started_at: NaiveDateTime,
    /// Where a manual recording was made. Never persisted.
    pub location: Option<GeoLocation>,
}

impl Recording {
    /// Human-readable location, `"No location"` when none was tagged.
    pub fn location_label(&self) -> String {
        match self.location {
            Some(GeoLocation {
                latitude,
                longitude,
            }) => format!("{:.6}, {:.6}", latitude, longitude),
            None => "No location".to_string(),
        }
    }

    /// File name component of [`Recording::path`].
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
