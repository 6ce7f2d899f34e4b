use crate::{
    CoreResult, RecorderError,
    capture::{AudioSource, CaptureBackend, CaptureResource, OutputFormat},
};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::{debug, instrument, warn};

/// RAII guard that guarantees a capture resource is reset and released when dropped.
///
/// Covers every exit: a failed configuration step, a failed start, a failed
/// stop and process teardown all end in `reset()` followed by `release()`.
pub struct ResourceGuard {
    resource: Box<dyn CaptureResource>,
    started: bool,
}

impl ResourceGuard {
    /// Takes ownership of an opened resource.
    pub fn new(resource: Box<dyn CaptureResource>) -> Self {
        Self {
            resource,
            started: false,
        }
    }

    /// Opens a resource and runs it through the full start sequence.
    ///
    /// Sources in `policy` are tried in order on the same resource; only
    /// `CaptureSourceUnavailable` moves on to the next one. Any other failure
    /// drops the guard, which resets and releases the resource before the
    /// error is returned.
    #[track_caller]
    #[instrument(skip(backend, policy), fields(backend_name = backend.name()))]
    pub fn acquire(
        backend: &mut dyn CaptureBackend,
        policy: &[AudioSource],
        format: OutputFormat,
        path: &Path,
    ) -> CoreResult<(Self, AudioSource)> {
        let mut guard = Self::new(backend.open()?);

        let source = guard.select_source(policy)?;
        guard.resource.set_output_format(format.container())?;
        guard.resource.set_audio_encoder(format.encoder())?;
        guard.resource.set_output_file(path)?;
        guard.resource.prepare()?;
        guard.resource.start()?;
        guard.started = true;

        debug!(source = ?source, format = ?format, "Capture resource started");

        Ok((guard, source))
    }

    /// Stops the capture. The resource is released when `self` drops at the
    /// end of this call, whether or not the stop succeeded.
    #[instrument(skip(self))]
    pub fn finish(mut self) -> CoreResult<()> {
        if !self.started {
            return Ok(());
        }
        self.started = false;
        self.resource.stop()
    }

    /// Whether the resource reached the started state.
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[track_caller]
    fn select_source(&mut self, policy: &[AudioSource]) -> CoreResult<AudioSource> {
        let mut last_error = None;

        for &source in policy {
            match self.resource.set_audio_source(source) {
                Ok(()) => return Ok(source),
                Err(e @ RecorderError::CaptureSourceUnavailable { .. }) => {
                    warn!(source = ?source, error = %e, "Capture source unavailable, trying next");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| RecorderError::DeviceError {
            reason: "No capture source configured".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}

impl Drop for ResourceGuard {
    fn drop(&mut self) {
        self.resource.reset();
        self.resource.release();
    }
}
