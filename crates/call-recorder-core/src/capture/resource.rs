use crate::{
    CoreResult,
    capture::{AudioEncoder, AudioSource, Container},
};

use std::path::Path;

/// Exclusive handle to an audio input being encoded to a file.
///
/// Must be configured in order: source, container, encoder, output file,
/// then [`prepare`](CaptureResource::prepare) and
/// [`start`](CaptureResource::start). Use [`ResourceGuard`](crate::ResourceGuard)
/// rather than driving this directly so the handle is always released.
pub trait CaptureResource {
    /// Selects the audio input.
    ///
    /// Returns `CaptureSourceUnavailable` when this particular source cannot
    /// be used, which lets the caller fall back to another one.
    fn set_audio_source(&mut self, source: AudioSource) -> CoreResult<()>;

    /// Selects the file container.
    fn set_output_format(&mut self, container: Container) -> CoreResult<()>;

    /// Selects the audio encoding.
    fn set_audio_encoder(&mut self, encoder: AudioEncoder) -> CoreResult<()>;

    /// Sets the file the capture is written to.
    fn set_output_file(&mut self, path: &Path) -> CoreResult<()>;

    /// Allocates the stream and output writer.
    fn prepare(&mut self) -> CoreResult<()>;

    /// Begins writing captured audio.
    fn start(&mut self) -> CoreResult<()>;

    /// Stops capture and finalises the output file.
    fn stop(&mut self) -> CoreResult<()>;

    /// Returns the resource to its unconfigured state.
    fn reset(&mut self);

    /// Frees the underlying handle. No method may be called afterwards.
    fn release(&mut self);
}

/// Factory for capture resources. One resource is opened per session.
pub trait CaptureBackend {
    /// Opens a fresh, unconfigured capture resource.
    fn open(&mut self) -> CoreResult<Box<dyn CaptureResource>>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}
