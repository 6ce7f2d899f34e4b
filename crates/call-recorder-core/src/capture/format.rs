use serde::{Deserialize, Serialize};

/// File container written by a capture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// MPEG-4 audio.
    Mpeg4,
    /// RIFF WAVE.
    Wave,
}

/// Audio encoding inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoder {
    /// Advanced Audio Coding.
    Aac,
    /// 16-bit signed PCM.
    Pcm16,
}

/// Container and encoder pair used for every recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// MPEG-4 container with AAC audio.
    #[default]
    M4a,
    /// WAVE container with 16-bit PCM audio.
    Wav,
}

impl OutputFormat {
    /// Every format a recording may be stored in.
    pub const ALL: [OutputFormat; 2] = [OutputFormat::M4a, OutputFormat::Wav];

    /// Container for this format.
    pub fn container(self) -> Container {
        match self {
            OutputFormat::M4a => Container::Mpeg4,
            OutputFormat::Wav => Container::Wave,
        }
    }

    /// Encoder for this format.
    pub fn encoder(self) -> AudioEncoder {
        match self {
            OutputFormat::M4a => AudioEncoder::Aac,
            OutputFormat::Wav => AudioEncoder::Pcm16,
        }
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::M4a => "m4a",
            OutputFormat::Wav => "wav",
        }
    }

    /// Looks up a format by file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }
}
