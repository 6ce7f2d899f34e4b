//! Keeps the process visibly busy while a call is being recorded.

use call_recorder_core::{CoreResult, KeepAlive, RecorderError};

use std::{panic::Location, path::Path, time::Instant};

use error_location::ErrorLocation;
use tracing::info;
use uuid::Uuid;

/// Active keep-alive period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeepAliveSession {
    /// When the capture started.
    pub started_at: Instant,
    /// Unique session ID for log correlation.
    pub session_id: Uuid,
}

/// Reports the "recording in progress" status through the log.
///
/// Holds one period at a time: a second start before stop is rejected and
/// the running period is kept. Stands in for the host notification that keeps a background process
/// alive on mobile platforms.
#[derive(Debug, Default)]
pub(crate) struct StatusKeepAlive {
    pub(crate) active: Option<KeepAliveSession>,
}

impl StatusKeepAlive {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl KeepAlive for StatusKeepAlive {
    fn start(&mut self, path: &Path) -> CoreResult<()> {
        if let Some(current) = self.active {
            return Err(RecorderError::KeepAliveFailed {
                reason: format!("session {} is still active", current.session_id),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let session = KeepAliveSession {
            started_at: Instant::now(),
            session_id: Uuid::new_v4(),
        };
        self.active = Some(session);

        info!(session_id = %session.session_id, path = ?path, "Call recording in progress");

        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        if let Some(session) = self.active.take() {
            info!(
                session_id = %session.session_id,
                duration_ms = session.started_at.elapsed().as_millis(),
                "Call recording finished"
            );
        }
        Ok(())
    }
}
