//! Call state machine.
//!
//! Interprets raw, possibly redelivered telephony signals and turns them into
//! capture intents: `Idle -> Ringing -> ActiveOffHook -> Idle`, with the
//! outgoing flag set before the call reaches the off-hook state.

use crate::call::{CallDirection, CallSignal, CallState, PhoneState};

use tracing::{debug, info, instrument};

/// High-level request emitted by the monitor for the session manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureIntent {
    /// A call went active and should be recorded.
    Begin {
        /// Remote party, if known.
        number: Option<String>,
        /// Direction of the call.
        direction: CallDirection,
    },
    /// The call ended. Must be safe to deliver without a prior `Begin`.
    End,
}

/// Result of feeding one signal into the monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    /// Null or duplicate state value; nothing changed.
    Ignored,
    /// Internal call state changed but no intent is due yet.
    Applied,
    /// The signal produced an intent for the session manager.
    Intent(CaptureIntent),
}

/// Debounces telephony signals and classifies call direction.
#[derive(Debug, Default)]
pub struct CallStateMonitor {
    state: CallState,
}

impl CallStateMonitor {
    /// Creates a monitor with no call in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current call tracking state.
    pub fn state(&self) -> &CallState {
        &self.state
    }

    /// Applies one raw signal.
    ///
    /// Signals must be handled to completion one at a time; the monitor
    /// never blocks.
    #[instrument(skip(self))]
    pub fn handle_signal(&mut self, signal: CallSignal) -> SignalOutcome {
        match signal {
            CallSignal::OutgoingCallAttempt { number } => {
                info!(number = ?number, "Outgoing call detected");
                self.state.direction = CallDirection::Outgoing;
                self.state.active_number = number;
                SignalOutcome::Applied
            }
            CallSignal::StateChanged {
                state,
                incoming_number,
            } => self.handle_state_change(state, incoming_number),
        }
    }

    fn handle_state_change(
        &mut self,
        state: Option<PhoneState>,
        incoming_number: Option<String>,
    ) -> SignalOutcome {
        let Some(state) = state else {
            debug!("State missing, signal ignored");
            return SignalOutcome::Ignored;
        };

        if self.state.last_state == Some(state) {
            debug!(state = ?state, "State unchanged, signal ignored");
            return SignalOutcome::Ignored;
        }
        self.state.last_state = Some(state);

        match state {
            PhoneState::Ringing => {
                // An outgoing attempt always precedes ringing for its own call,
                // so ringing means a new incoming call.
                self.state.direction = CallDirection::Incoming;
                self.state.active_number = incoming_number;
                info!(number = ?self.state.active_number, "Incoming call ringing");
                SignalOutcome::Applied
            }
            PhoneState::ActiveOffHook => {
                info!(
                    number = ?self.state.active_number,
                    direction = ?self.state.direction,
                    "Call active"
                );
                SignalOutcome::Intent(CaptureIntent::Begin {
                    number: self.state.active_number.clone(),
                    direction: self.state.direction,
                })
            }
            PhoneState::Idle => {
                info!("Call ended");
                self.state.active_number = None;
                self.state.direction = CallDirection::Unknown;
                SignalOutcome::Intent(CaptureIntent::End)
            }
        }
    }
}
