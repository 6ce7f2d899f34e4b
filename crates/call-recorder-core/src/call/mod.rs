mod direction;
mod monitor;
mod signal;
mod state;

pub use {
    direction::CallDirection,
    monitor::{CallStateMonitor, CaptureIntent, SignalOutcome},
    signal::{CallSignal, PhoneState},
    state::CallState,
};
