/// Call state reported by the telephony layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneState {
    /// An incoming call is ringing.
    Ringing,
    /// A call is connected (off hook), incoming or outgoing.
    ActiveOffHook,
    /// No call in progress.
    Idle,
}

/// Raw event delivered by the telephony signal source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSignal {
    /// The user is placing a call.
    OutgoingCallAttempt {
        /// Dialled number, if the telephony layer exposed it.
        number: Option<String>,
    },
    /// Generic call state transition.
    StateChanged {
        /// New state. `None` when the telephony layer delivered no value.
        state: Option<PhoneState>,
        /// Caller number, only present alongside [`PhoneState::Ringing`].
        incoming_number: Option<String>,
    },
}

impl CallSignal {
    /// Shorthand for an outgoing call attempt.
    pub fn outgoing(number: impl Into<String>) -> Self {
        CallSignal::OutgoingCallAttempt {
            number: Some(number.into()),
        }
    }

    /// Shorthand for a state change carrying no number.
    pub fn state(state: PhoneState) -> Self {
        CallSignal::StateChanged {
            state: Some(state),
            incoming_number: None,
        }
    }

    /// Shorthand for a ringing state change with the caller's number.
    pub fn ringing(incoming_number: Option<String>) -> Self {
        CallSignal::StateChanged {
            state: Some(PhoneState::Ringing),
            incoming_number,
        }
    }
}
