use crate::{capture::AudioSource, session::SessionKind};

use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Call recording errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// The requested capture source is not available on this device.
    ///
    /// Recovered locally by falling back to the next source in the policy.
    #[error("Capture source {source_kind:?} unavailable: {reason} {location}")]
    CaptureSourceUnavailable {
        /// Source that was rejected.
        source_kind: AudioSource,
        /// Description of why the source was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture resource could not be configured, prepared or started.
    #[error("Failed to acquire capture resource for {path:?}: {source} {location}")]
    AcquisitionFailed {
        /// Output path the session would have written to.
        path: PathBuf,
        /// The error that aborted acquisition.
        #[source]
        source: Box<RecorderError>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture device operation failed.
    #[error("Capture device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The backend cannot write the requested container or encoding.
    #[error("Unsupported output format: {format} {location}")]
    UnsupportedFormat {
        /// Human-readable name of the rejected format.
        format: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The exclusive capture resource is held by another kind of session.
    #[error("Capture resource busy with a {active:?} session {location}")]
    SessionBusy {
        /// Kind of the session holding the resource.
        active: SessionKind,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Stopping an active capture failed. The resource is still released.
    #[error("Failed to stop capture: {reason} {location}")]
    StopFailed {
        /// Description of the stop failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Contact resolution failed. Treated as "no display name".
    #[error("Contact lookup failed for {number}: {reason} {location}")]
    LookupFailed {
        /// Number that was being resolved.
        number: String,
        /// Description of the lookup failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The keep-alive collaborator rejected a start or stop request.
    #[error("Keep-alive failed: {reason} {location}")]
    KeepAliveFailed {
        /// Description of the keep-alive failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for RecorderError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        RecorderError::Io {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
