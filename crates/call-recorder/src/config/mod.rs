mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod recordings_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, recordings_config::RecordingsConfig,
};

use call_recorder_core::OutputFormat;

/// The desktop capture backend writes WAVE files only.
pub(crate) const DEFAULT_FORMAT: OutputFormat = OutputFormat::Wav;

pub(crate) fn default_format() -> OutputFormat {
    DEFAULT_FORMAT
}
