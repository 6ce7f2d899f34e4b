use crate::call::{CallDirection, PhoneState};

/// Mutable call tracking owned by [`CallStateMonitor`](crate::CallStateMonitor).
///
/// `direction` and `active_number` only carry meaning while a call is
/// ringing or active. Both are cleared on the transition to idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallState {
    /// Last state value that was not deduplicated.
    pub last_state: Option<PhoneState>,
    /// Direction of the current call.
    pub direction: CallDirection,
    /// Remote party of the current call.
    pub active_number: Option<String>,
}
