use crate::{
    call::{CallSignal, CallStateMonitor, CaptureIntent, SignalOutcome},
    session::{SessionManager, SessionState},
};

use tracing::{error, instrument};

/// Wires the call state monitor to the session manager.
///
/// Session failures stop here: they are logged and never reach the monitor.
/// Call-state changes only ever end call sessions.
pub struct CallRecorder {
    monitor: CallStateMonitor,
    sessions: SessionManager,
}

impl CallRecorder {
    /// Creates a recorder around an already configured session manager.
    pub fn new(sessions: SessionManager) -> Self {
        Self {
            monitor: CallStateMonitor::new(),
            sessions,
        }
    }

    /// Feeds one telephony signal through the monitor and acts on its intent.
    #[instrument(skip(self))]
    pub fn handle_signal(&mut self, signal: CallSignal) -> SignalOutcome {
        let outcome = self.monitor.handle_signal(signal);

        if let SignalOutcome::Intent(intent) = &outcome {
            match intent {
                CaptureIntent::Begin { number, direction } => {
                    if let Err(e) = self.sessions.begin_capture(number.as_deref(), *direction) {
                        error!(error = %e, "Call recording did not start");
                    }
                }
                CaptureIntent::End => {
                    self.sessions.end_call();
                }
            }
        }

        outcome
    }

    /// Whether a capture session is alive.
    pub fn is_capturing(&self) -> bool {
        self.sessions.state() == SessionState::Capturing
    }

    /// Call tracking state.
    pub fn monitor(&self) -> &CallStateMonitor {
        &self.monitor
    }

    /// Session manager, for the manual recording path and listings.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Mutable session manager, for the manual recording path.
    pub fn sessions_mut(&mut self) -> &mut SessionManager {
        &mut self.sessions
    }

    /// Releases any live capture. Called on process teardown.
    pub fn shutdown(&mut self) {
        self.sessions.end_capture();
    }
}
