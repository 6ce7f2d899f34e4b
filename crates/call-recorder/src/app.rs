use crate::{AppCommand, AppError, AppResult};

use call_recorder_core::{CallRecorder, SignalOutcome};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, error, info, instrument, warn};

/// Main application state.
///
/// Runs on the thread driving the runtime: the capture stream owned by the
/// recorder is not `Send`, so signals are handled inline, one at a time.
pub struct App {
    pub(crate) recorder: CallRecorder,
}

impl App {
    /// Run the signal loop until the input closes, `quit` is read or Ctrl+C.
    ///
    /// Any live capture is released before returning.
    #[instrument(skip(self, input))]
    pub(crate) async fn run<R>(mut self, input: R) -> AppResult<()>
    where
        R: AsyncRead + Unpin,
    {
        info!("Call-Recorder starting");

        let mut lines = BufReader::new(input).lines();

        let result = loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, shutting down");
                    break Ok(());
                }

                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if !self.handle_line(&line) {
                                info!("Shutdown requested");
                                break Ok(());
                            }
                        }
                        Ok(None) => {
                            info!("Signal source closed, shutting down");
                            break Ok(());
                        }
                        Err(e) => break Err(AppError::from(e)),
                    }
                }
            }
        };

        self.recorder.shutdown();
        info!("Call-Recorder shut down");

        result
    }

    /// Handles one input line. Returns `false` when the app should exit.
    pub(crate) fn handle_line(&mut self, line: &str) -> bool {
        match AppCommand::parse(line) {
            Ok(Some(command)) => self.handle_command(command),
            Ok(None) => true,
            Err(e) => {
                warn!(error = %e, "Skipping malformed signal");
                true
            }
        }
    }

    fn handle_command(&mut self, command: AppCommand) -> bool {
        match command {
            AppCommand::Signal(signal) => {
                let outcome = self.recorder.handle_signal(signal);
                if outcome == SignalOutcome::Ignored {
                    debug!("Signal ignored");
                }
            }
            AppCommand::ManualStart { location } => {
                if let Err(e) = self.recorder.sessions_mut().begin_manual(location) {
                    error!(error = %e, "Manual recording did not start");
                }
            }
            AppCommand::ManualStop => match self.recorder.sessions_mut().end_manual() {
                Some(recording) => info!(
                    path = ?recording.path,
                    location = %recording.location_label(),
                    "Manual recording saved"
                ),
                None => warn!("No manual recording in progress"),
            },
            AppCommand::List => self.print_recordings(),
            AppCommand::Shutdown => return false,
        }
        true
    }

    fn print_recordings(&self) {
        let recordings = match self.recorder.sessions().recordings().list() {
            Ok(recordings) => recordings,
            Err(e) => {
                error!(error = %e, "Failed to list recordings");
                return;
            }
        };

        if recordings.is_empty() {
            println!("No recordings");
            return;
        }

        for recording in recordings {
            let who = match (&recording.display_name, &recording.phone_number) {
                (Some(name), _) => name.replace('_', " "),
                (None, Some(number)) => number.clone(),
                (None, None) => "-".to_string(),
            };
            let direction = recording.direction.map(|d| d.tag()).unwrap_or("MANUAL");
            println!(
                "{}  {:<6}  {:<24}  {}",
                recording.started_at.format("%Y-%m-%d %H:%M:%S"),
                direction,
                who,
                recording.file_name()
            );
        }
    }
}
