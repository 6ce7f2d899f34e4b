use serde::{Deserialize, Serialize};

/// Capture device configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Substring of the input device that carries call audio, such as a
    /// loopback or monitor device. Unset means calls fall back to the
    /// default input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_audio_device: Option<String>,
}
