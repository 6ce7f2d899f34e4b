/// Audio input a capture resource can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioSource {
    /// Call audio (both parties) where the device exposes it.
    VoiceCall,
    /// Input tuned for voice communication. Usually microphone only.
    VoiceCommunication,
    /// Plain microphone input.
    Microphone,
}

/// Sources tried in order when recording a call.
///
/// Only [`RecorderError::CaptureSourceUnavailable`](crate::RecorderError::CaptureSourceUnavailable)
/// moves on to the next entry.
pub const CALL_SOURCE_POLICY: &[AudioSource] =
    &[AudioSource::VoiceCall, AudioSource::VoiceCommunication];

/// Sources tried for a manual, non-call recording.
pub const MANUAL_SOURCE_POLICY: &[AudioSource] = &[AudioSource::Microphone];
