use crate::{
    CoreResult, RecorderError, RecordingsDir,
    call::CallDirection,
    capture::{
        AudioSource, CALL_SOURCE_POLICY, CaptureBackend, MANUAL_SOURCE_POLICY, OutputFormat,
        ResourceGuard,
    },
    session::{
        Clock, ContactLookup, GeoLocation, KeepAlive, NoContacts, NoKeepAlive, Recording,
        RecordingFileName, SystemClock, manual_file_name,
    },
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::NaiveDateTime;
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Whether a capture session is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No capture resource is held.
    Idle,
    /// A capture resource is started and writing.
    Capturing,
}

/// What a capture session is recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Driven by call-state signals.
    Call,
    /// Started and stopped by the user.
    Manual,
}

/// The single live capture. Dropping it releases the resource.
struct CaptureSession {
    kind: SessionKind,
    resource: ResourceGuard,
    output_path: PathBuf,
    started_at: NaiveDateTime,
    started: Instant,
    source: AudioSource,
    direction: Option<CallDirection>,
    number: Option<String>,
    display_name: Option<String>,
    location: Option<GeoLocation>,
}

/// Identity of a session about to start.
struct SessionRequest {
    kind: SessionKind,
    output_path: PathBuf,
    started_at: NaiveDateTime,
    policy: &'static [AudioSource],
    direction: Option<CallDirection>,
    number: Option<String>,
    display_name: Option<String>,
    location: Option<GeoLocation>,
}

/// Owns the exclusive capture resource across the start/stop boundary of a call.
///
/// At most one session is alive at a time. A call going active takes the
/// resource from a manual recording; a manual start is refused while a call
/// is being recorded. Every method takes `&mut self`,
/// so an acquisition or release always completes before the next request is
/// looked at. Dropping the manager ends any live session the same way
/// [`end_capture`](SessionManager::end_capture) does.
pub struct SessionManager {
    backend: Box<dyn CaptureBackend>,
    contacts: Box<dyn ContactLookup>,
    keep_alive: Box<dyn KeepAlive>,
    clock: Box<dyn Clock>,
    recordings: RecordingsDir,
    format: OutputFormat,
    session: Option<CaptureSession>,
}

impl SessionManager {
    /// Creates a manager writing into `recordings_dir` with default collaborators.
    pub fn new(backend: Box<dyn CaptureBackend>, recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            contacts: Box::new(NoContacts),
            keep_alive: Box::new(NoKeepAlive),
            clock: Box::new(SystemClock),
            recordings: RecordingsDir::new(recordings_dir),
            format: OutputFormat::default(),
            session: None,
        }
    }

    /// Sets the contact directory used to name call recordings.
    pub fn with_contacts(mut self, contacts: Box<dyn ContactLookup>) -> Self {
        self.contacts = contacts;
        self
    }

    /// Sets the keep-alive collaborator signalled around each session.
    pub fn with_keep_alive(mut self, keep_alive: Box<dyn KeepAlive>) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Sets the clock used for file name timestamps.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the container and encoder for new recordings.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        match self.session {
            Some(_) => SessionState::Capturing,
            None => SessionState::Idle,
        }
    }

    /// Kind of the live session, if any.
    pub fn kind(&self) -> Option<SessionKind> {
        self.session.as_ref().map(|s| s.kind)
    }

    /// Path of the in-progress recording, if any.
    pub fn output_path(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.output_path.as_path())
    }

    /// Source the live session ended up using, if any.
    pub fn active_source(&self) -> Option<AudioSource> {
        self.session.as_ref().map(|s| s.source)
    }

    /// Recordings directory this manager writes into.
    pub fn recordings(&self) -> &RecordingsDir {
        &self.recordings
    }

    /// Starts recording a call.
    ///
    /// A session that is still alive is closed first: a call session left
    /// over from a missed idle signal, or a manual recording the call
    /// interrupts. Contact lookup failures only cost the display
    /// name. On acquisition failure the resource is released, any partial
    /// file is removed and the manager is left idle.
    ///
    /// # Errors
    ///
    /// Returns `AcquisitionFailed` when neither capture source could be
    /// started, or `Io` if the recordings directory cannot be created.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn begin_capture(
        &mut self,
        number: Option<&str>,
        direction: CallDirection,
    ) -> CoreResult<PathBuf> {
        match self.kind() {
            Some(SessionKind::Manual) => {
                if let Some(recording) = self.end_capture() {
                    info!(path = ?recording.path, "Call went active, manual recording saved");
                }
            }
            Some(SessionKind::Call) => self.close_stale_session(),
            None => {}
        }

        let display_name = number.and_then(|n| self.resolve_display_name(n));
        let started_at = self.clock.now();
        let file_name = RecordingFileName::new(
            started_at,
            direction,
            number,
            display_name.as_deref(),
            self.format,
        );

        self.start_session(SessionRequest {
            kind: SessionKind::Call,
            output_path: file_name.path_in(self.recordings.path()),
            started_at,
            policy: CALL_SOURCE_POLICY,
            direction: Some(direction),
            number: file_name.number,
            display_name: file_name.display_name,
            location: None,
        })
    }

    /// Starts a manual, non-call recording from the microphone.
    ///
    /// Shares the exclusive resource with call recordings. A manual session
    /// that is still alive is closed first. `location` is only attached to
    /// the returned [`Recording`] when the session ends.
    ///
    /// # Errors
    ///
    /// Returns `SessionBusy` while a call is being recorded, otherwise the
    /// same as [`begin_capture`](SessionManager::begin_capture).
    #[track_caller]
    #[instrument(skip(self))]
    pub fn begin_manual(&mut self, location: Option<GeoLocation>) -> CoreResult<PathBuf> {
        match self.kind() {
            Some(SessionKind::Call) => {
                return Err(RecorderError::SessionBusy {
                    active: SessionKind::Call,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Some(SessionKind::Manual) => self.close_stale_session(),
            None => {}
        }

        let started_at = self.clock.now();
        let output_path = self
            .recordings
            .path()
            .join(manual_file_name(started_at, self.format));

        self.start_session(SessionRequest {
            kind: SessionKind::Manual,
            output_path,
            started_at,
            policy: MANUAL_SOURCE_POLICY,
            direction: None,
            number: None,
            display_name: None,
            location,
        })
    }

    /// Ends the live session only if it records a call.
    ///
    /// A manual recording keeps running through call-state changes.
    pub fn end_call(&mut self) -> Option<Recording> {
        self.end_kind(SessionKind::Call)
    }

    /// Ends the live session only if it is a manual recording.
    pub fn end_manual(&mut self) -> Option<Recording> {
        self.end_kind(SessionKind::Manual)
    }

    /// Stops and releases the live session, whatever its kind.
    ///
    /// No-op when idle. A failing stop is logged and the resource is still
    /// reset and released.
    #[instrument(skip(self))]
    pub fn end_capture(&mut self) -> Option<Recording> {
        let Some(session) = self.session.take() else {
            debug!("No active capture session, nothing to end");
            return None;
        };

        let CaptureSession {
            kind: _,
            resource,
            output_path,
            started_at,
            started,
            source,
            direction,
            number,
            display_name,
            location,
        } = session;

        if let Err(e) = resource.finish() {
            warn!(path = ?output_path, error = %e, "Stop failed, resource released anyway");
        }

        if let Err(e) = self.keep_alive.stop() {
            warn!(error = %e, "Keep-alive stop failed");
        }

        info!(
            path = ?output_path,
            source = ?source,
            duration_ms = started.elapsed().as_millis(),
            "Capture stopped"
        );

        Some(Recording {
            path: output_path,
            direction,
            phone_number: number,
            display_name,
            started_at,
            location,
        })
    }

    fn end_kind(&mut self, kind: SessionKind) -> Option<Recording> {
        match self.kind() {
            Some(active) if active == kind => self.end_capture(),
            Some(active) => {
                debug!(
                    active = ?active,
                    requested = ?kind,
                    "Live session is of another kind, leaving it running"
                );
                None
            }
            None => {
                debug!(requested = ?kind, "No active capture session, nothing to end");
                None
            }
        }
    }

    fn close_stale_session(&mut self) {
        if let Some(path) = self.output_path() {
            warn!(path = ?path, "Capture requested while a session is active, closing it first");
            self.end_capture();
        }
    }

    fn resolve_display_name(&self, number: &str) -> Option<String> {
        match self.contacts.lookup(number) {
            Ok(name) => {
                debug!(number = %number, name = ?name, "Contact lookup complete");
                name
            }
            Err(e) => {
                warn!(number = %number, error = %e, "Contact lookup failed, continuing without a name");
                None
            }
        }
    }

    #[track_caller]
    fn start_session(&mut self, request: SessionRequest) -> CoreResult<PathBuf> {
        self.recordings.ensure()?;

        let path = request.output_path;
        let preexisting = path.exists();

        let (resource, source) = match ResourceGuard::acquire(
            self.backend.as_mut(),
            request.policy,
            self.format,
            &path,
        ) {
            Ok(acquired) => acquired,
            Err(e) => {
                error!(path = ?path, error = %e, "Failed to start capture");
                if preexisting {
                    debug!(
                        path = ?path,
                        "Output file predates this session, leaving it in place"
                    );
                } else {
                    discard_partial_file(&path);
                }
                return Err(RecorderError::AcquisitionFailed {
                    path,
                    source: Box::new(e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if let Err(e) = self.keep_alive.start(&path) {
            warn!(error = %e, "Keep-alive start failed, capture continues");
        }

        info!(path = ?path, source = ?source, "Capture started");

        self.session = Some(CaptureSession {
            kind: request.kind,
            resource,
            output_path: path.clone(),
            started_at: request.started_at,
            started: Instant::now(),
            source,
            direction: request.direction,
            number: request.number,
            display_name: request.display_name,
            location: request.location,
        });

        Ok(path)
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if self.session.is_some() {
            info!("Session manager dropped with a live capture, releasing");
            self.end_capture();
        }
    }
}

fn discard_partial_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = ?path, "Removed partial recording"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = ?path, error = %e, "Failed to remove partial recording"),
    }
}
