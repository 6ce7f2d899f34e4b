mod cpal_backend;
mod format;
mod guard;
mod resource;
mod source;

pub use {
    cpal_backend::CpalCaptureBackend,
    format::{AudioEncoder, Container, OutputFormat},
    guard::ResourceGuard,
    resource::{CaptureBackend, CaptureResource},
    source::{AudioSource, CALL_SOURCE_POLICY, MANUAL_SOURCE_POLICY},
};
