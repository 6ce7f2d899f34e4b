use serde::{Deserialize, Serialize};

/// Direction of the call being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallDirection {
    /// Placed by the user.
    Outgoing,
    /// Received by the user.
    Incoming,
    /// No call in progress, or nothing observed yet.
    #[default]
    Unknown,
}

impl CallDirection {
    /// Tag written into recording file names.
    ///
    /// Anything that is not known to be outgoing is tagged as incoming.
    pub fn tag(self) -> &'static str {
        match self {
            CallDirection::Outgoing => "OUT",
            CallDirection::Incoming | CallDirection::Unknown => "IN",
        }
    }

    /// Inverse of [`CallDirection::tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "OUT" => Some(CallDirection::Outgoing),
            "IN" => Some(CallDirection::Incoming),
            _ => None,
        }
    }

    /// Whether an outgoing call attempt was observed.
    pub fn is_outgoing(self) -> bool {
        self == CallDirection::Outgoing
    }
}
