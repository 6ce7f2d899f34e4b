//! Call-recorder Core Library
//!
//! Turns telephony call-state signals into one continuous audio capture per
//! call, named after the call's direction, remote number and contact name.
//!
//! # Example
//!
//! ```no_run
//! use call_recorder_core::{
//!     CallRecorder, CallSignal, CpalCaptureBackend, OutputFormat, PhoneState, SessionManager,
//! };
//!
//! let sessions = SessionManager::new(Box::new(CpalCaptureBackend::default()), "recordings")
//!     .with_format(OutputFormat::Wav);
//! let mut recorder = CallRecorder::new(sessions);
//!
//! recorder.handle_signal(CallSignal::outgoing("123456789"));
//! recorder.handle_signal(CallSignal::state(PhoneState::ActiveOffHook));
//! // ... call in progress ...
//! recorder.handle_signal(CallSignal::state(PhoneState::Idle));
//! ```

mod call;
mod capture;
mod error;
mod recorder;
mod recordings;
mod session;

pub use {
    call::{
        CallDirection, CallSignal, CallState, CallStateMonitor, CaptureIntent, PhoneState,
        SignalOutcome,
    },
    capture::{
        AudioEncoder, AudioSource, CALL_SOURCE_POLICY, CaptureBackend, CaptureResource,
        Container, CpalCaptureBackend, MANUAL_SOURCE_POLICY, OutputFormat, ResourceGuard,
    },
    error::{RecorderError, Result as CoreResult},
    recorder::CallRecorder,
    recordings::RecordingsDir,
    session::{
        Clock, ContactLookup, GeoLocation, KeepAlive, NoContacts, NoKeepAlive, Recording,
        RecordingFileName, SessionKind, SessionManager, SessionState, SystemClock,
        manual_file_name, parse_manual_file_name, sanitize_display_name,
    },
};
