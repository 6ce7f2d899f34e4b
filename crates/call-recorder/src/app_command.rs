//! Line protocol of the stdin signal source.
//!
//! ```text
//! outgoing <number>      user is placing a call
//! ringing [number]       incoming call ringing
//! offhook                call connected
//! idle                   call ended
//! manual start [lat lon] start a microphone recording
//! manual stop            stop the microphone recording
//! list                   print recordings, newest first
//! quit                   shut down
//! ```

use crate::{AppError, AppResult};

use std::panic::Location;

use call_recorder_core::{CallSignal, GeoLocation, PhoneState};
use error_location::ErrorLocation;

/// Commands read from the signal source.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Forward a telephony signal to the call recorder.
    Signal(CallSignal),
    /// Start a manual recording.
    ManualStart {
        /// Where the recording is made, if known.
        location: Option<GeoLocation>,
    },
    /// Stop the manual recording.
    ManualStop,
    /// Print the recordings listing.
    List,
    /// Request application shutdown.
    Shutdown,
}

impl AppCommand {
    /// Parses one input line. Blank lines and `#` comments yield `None`.
    #[track_caller]
    pub fn parse(line: &str) -> AppResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let keyword = words[0].to_ascii_lowercase();
        let args = &words[1..];

        let command = match (keyword.as_str(), args) {
            ("outgoing", [number]) => AppCommand::Signal(CallSignal::outgoing(*number)),
            ("ringing", []) => AppCommand::Signal(CallSignal::ringing(None)),
            ("ringing", [number]) => {
                AppCommand::Signal(CallSignal::ringing(Some((*number).to_string())))
            }
            ("offhook", []) => AppCommand::Signal(CallSignal::state(PhoneState::ActiveOffHook)),
            ("idle", []) => AppCommand::Signal(CallSignal::state(PhoneState::Idle)),
            ("manual", [action, rest @ ..]) => match action.to_ascii_lowercase().as_str() {
                "start" => AppCommand::ManualStart {
                    location: parse_location(line, rest)?,
                },
                "stop" if rest.is_empty() => AppCommand::ManualStop,
                _ => return Err(parse_error(line, "expected `manual start` or `manual stop`")),
            },
            ("list", []) => AppCommand::List,
            ("quit" | "exit", []) => AppCommand::Shutdown,
            _ => return Err(parse_error(line, "unknown command or wrong arguments")),
        };

        Ok(Some(command))
    }
}

#[track_caller]
fn parse_location(line: &str, args: &[&str]) -> AppResult<Option<GeoLocation>> {
    match args {
        [] => Ok(None),
        [latitude, longitude] => {
            let latitude: f64 = latitude
                .parse()
                .map_err(|_| parse_error(line, "latitude is not a number"))?;
            let longitude: f64 = longitude
                .parse()
                .map_err(|_| parse_error(line, "longitude is not a number"))?;
            Ok(Some(GeoLocation {
                latitude,
                longitude,
            }))
        }
        _ => Err(parse_error(line, "location needs latitude and longitude")),
    }
}

#[track_caller]
fn parse_error(line: &str, reason: &str) -> AppError {
    AppError::SignalParse {
        line: line.to_string(),
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
