mod collaborators;
mod manager;
mod naming;
mod recording;

pub use {
    collaborators::{Clock, ContactLookup, KeepAlive, NoContacts, NoKeepAlive, SystemClock},
    manager::{SessionKind, SessionManager, SessionState},
    naming::{RecordingFileName, manual_file_name, parse_manual_file_name, sanitize_display_name},
    recording::{GeoLocation, Recording},
};
