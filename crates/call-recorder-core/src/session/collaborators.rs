//! Seams to the host environment consumed by [`SessionManager`](crate::SessionManager).

use crate::CoreResult;

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use chrono::{Local, NaiveDateTime};

/// Resolves a phone number to a display name.
///
/// Errors are non-fatal: the session manager treats them as "no name".
pub trait ContactLookup {
    /// Returns the display name for `number`, if one is known.
    fn lookup(&self, number: &str) -> CoreResult<Option<String>>;
}

/// Lookup that never resolves a name.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContacts;

impl ContactLookup for NoContacts {
    fn lookup(&self, _number: &str) -> CoreResult<Option<String>> {
        Ok(None)
    }
}

impl ContactLookup for BTreeMap<String, String> {
    fn lookup(&self, number: &str) -> CoreResult<Option<String>> {
        Ok(self.get(number).cloned())
    }
}

impl ContactLookup for HashMap<String, String> {
    fn lookup(&self, number: &str) -> CoreResult<Option<String>> {
        Ok(self.get(number).cloned())
    }
}

/// Keeps the hosting process alive for the duration of a capture.
pub trait KeepAlive {
    /// Called once a capture session has started writing to `path`.
    fn start(&mut self, path: &Path) -> CoreResult<()>;

    /// Called once the capture session has been torn down.
    fn stop(&mut self) -> CoreResult<()>;
}

/// Keep-alive for hosts that need none.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoKeepAlive;

impl KeepAlive for NoKeepAlive {
    fn start(&mut self, _path: &Path) -> CoreResult<()> {
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        Ok(())
    }
}

/// Source of the wall-clock time used in file names.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
