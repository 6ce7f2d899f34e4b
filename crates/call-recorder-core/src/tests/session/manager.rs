use crate::{
    AudioSource, CallDirection, GeoLocation, OutputFormat, RecorderError, SessionKind,
    SessionManager, SessionState,
    tests::fakes::{
        FailingContacts, FakeBackend, FakeKeepAlive, Failures, FixedClock, Journal,
        KeepAliveCall, ResourceCall, count, sample_time,
    },
};

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use tempfile::TempDir;

fn manager(failures: Failures, dir: &TempDir) -> (SessionManager, Journal) {
    let (backend, journal) = FakeBackend::new(failures);
    let manager = SessionManager::new(Box::new(backend), dir.path().join("recordings"))
        .with_clock(Box::new(FixedClock(sample_time())));
    (manager, journal)
}

fn both_sources_unavailable() -> Failures {
    Failures {
        unavailable: [AudioSource::VoiceCall, AudioSource::VoiceCommunication]
            .into_iter()
            .collect(),
        ..Failures::default()
    }
}

/// WHAT: Successful begin leaves the manager capturing
/// WHY: The capture state drives keep-alive and the UI
#[test]
#[allow(clippy::unwrap_used)]
fn given_working_backend_when_beginning_then_capturing_with_named_path() {
    // Given: A manager with a contact directory
    let dir = TempDir::new().unwrap();
    let (manager, _journal) = manager(Failures::default(), &dir);
    let contacts: BTreeMap<String, String> =
        [("123456789".to_string(), "Jane Doe".to_string())].into();
    let mut manager = manager.with_contacts(Box::new(contacts));

    // When: Beginning an incoming capture
    let path = manager
        .begin_capture(Some("123456789"), CallDirection::Incoming)
        .unwrap();

    // Then: Capturing into the contact-named file, directory created
    assert_eq!(manager.state(), SessionState::Capturing);
    assert_eq!(
        path,
        dir.path()
            .join("recordings")
            .join("2024-01-02_03-04-05_IN_123456789_Jane_Doe.m4a")
    );
    assert_eq!(manager.output_path(), Some(path.as_path()));
    assert!(dir.path().join("recordings").is_dir());
}

/// WHAT: Fallback source reaches capturing with one resource
/// WHY: The fallback must reuse the resource, never double-acquire
#[test]
#[allow(clippy::unwrap_used)]
fn given_primary_source_unavailable_when_beginning_then_fallback_single_resource() {
    // Given: Call audio unavailable
    let dir = TempDir::new().unwrap();
    let failures = Failures {
        unavailable: [AudioSource::VoiceCall].into_iter().collect(),
        ..Failures::default()
    };
    let (mut manager, journal) = manager(failures, &dir);

    // When: Beginning a capture
    manager
        .begin_capture(Some("1"), CallDirection::Outgoing)
        .unwrap();

    // Then: Capturing from the fallback with exactly one resource
    assert_eq!(manager.state(), SessionState::Capturing);
    assert_eq!(
        manager.active_source(),
        Some(AudioSource::VoiceCommunication)
    );
    assert_eq!(count(&journal, &ResourceCall::Open), 1);
    assert_eq!(count(&journal, &ResourceCall::Start), 1);
}

/// WHAT: Both sources failing leaves nothing held
/// WHY: A failed start must release the resource and stay idle
#[test]
#[allow(clippy::unwrap_used)]
fn given_both_sources_unavailable_when_beginning_then_released_and_idle() {
    // Given: Neither source available
    let dir = TempDir::new().unwrap();
    let (mut manager, journal) = manager(both_sources_unavailable(), &dir);

    // When: Beginning a capture
    let result = manager.begin_capture(Some("1"), CallDirection::Incoming);

    // Then: AcquisitionFailed wrapping the unavailable source, resource released
    match result {
        Err(RecorderError::AcquisitionFailed { source, .. }) => assert!(matches!(
            *source,
            RecorderError::CaptureSourceUnavailable {
                source_kind: AudioSource::VoiceCommunication,
                ..
            }
        )),
        other => unreachable!("expected AcquisitionFailed, got {:?}", other),
    }
    assert_eq!(manager.state(), SessionState::Idle);
    assert_eq!(count(&journal, &ResourceCall::Release), 1);
    assert_eq!(count(&journal, &ResourceCall::Start), 0);
}

/// WHAT: A prepare failure removes the partially written file
/// WHY: No zero-length output may stay in the recordings listing
#[test]
#[allow(clippy::unwrap_used)]
fn given_prepare_failure_after_file_created_when_beginning_then_partial_file_removed() {
    // Given: A backend that creates the output then fails to prepare
    let dir = TempDir::new().unwrap();
    let failures = Failures {
        prepare: true,
        touch_output: true,
        ..Failures::default()
    };
    let (mut manager, journal) = manager(failures, &dir);

    // When: Beginning a capture
    let result = manager.begin_capture(Some("1"), CallDirection::Incoming);

    // Then: Failure, released, no file left behind
    assert!(matches!(
        result,
        Err(RecorderError::AcquisitionFailed { .. })
    ));
    assert_eq!(count(&journal, &ResourceCall::Release), 1);
    let leftovers = std::fs::read_dir(dir.path().join("recordings"))
        .unwrap()
        .count();
    assert_eq!(leftovers, 0);
}

/// WHAT: Ending twice is safe
/// WHY: Idle signals may arrive without a live session
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_session_when_ending_twice_then_second_is_noop() {
    // Given: A capturing manager
    let dir = TempDir::new().unwrap();
    let (mut manager, journal) = manager(Failures::default(), &dir);
    manager
        .begin_capture(Some("1"), CallDirection::Incoming)
        .unwrap();

    // When: Ending twice
    let first = manager.end_capture();
    let second = manager.end_capture();

    // Then: One recording, one stop, one release
    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(manager.state(), SessionState::Idle);
    assert_eq!(count(&journal, &ResourceCall::Stop), 1);
    assert_eq!(count(&journal, &ResourceCall::Release), 1);
}

/// WHAT: Ending with no session does nothing
/// WHY: End is idempotent downstream of the monitor
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_manager_when_ending_then_noop() {
    // Given: An idle manager
    let dir = TempDir::new().unwrap();
    let (mut manager, journal) = manager(Failures::default(), &dir);

    // When: Ending
    let recording = manager.end_capture();

    // Then: Nothing touched
    assert!(recording.is_none());
    assert!(journal.lock().unwrap().is_empty());
}

/// WHAT: Stop failure still clears the session and releases
/// WHY: Partial failure must not leak the capture resource
#[test]
#[allow(clippy::unwrap_used)]
fn given_stop_failure_when_ending_then_released_and_idle() {
    // Given: A capturing manager whose stop fails
    let dir = TempDir::new().unwrap();
    let failures = Failures {
        stop: true,
        ..Failures::default()
    };
    let (mut manager, journal) = manager(failures, &dir);
    manager
        .begin_capture(None, CallDirection::Incoming)
        .unwrap();

    // When: Ending
    let recording = manager.end_capture();

    // Then: Recording reported, resource released, idle
    assert!(recording.is_some());
    assert_eq!(manager.state(), SessionState::Idle);
    assert_eq!(count(&journal, &ResourceCall::Reset), 1);
    assert_eq!(count(&journal, &ResourceCall::Release), 1);
}

/// WHAT: Contact lookup failure only drops the display name
/// WHY: Lookup is best-effort and must not block recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_failing_contacts_when_beginning_then_capturing_without_name() {
    // Given: A contact directory that errors
    let dir = TempDir::new().unwrap();
    let (manager, _journal) = manager(Failures::default(), &dir);
    let mut manager = manager.with_contacts(Box::new(FailingContacts));

    // When: Beginning a capture
    let path = manager
        .begin_capture(Some("555"), CallDirection::Incoming)
        .unwrap();

    // Then: Name omitted
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "2024-01-02_03-04-05_IN_555.m4a"
    );
}

/// WHAT: Begin during a live session closes the old one first
/// WHY: Only one capture resource may be alive at any time
#[test]
#[allow(clippy::unwrap_used)]
fn given_live_session_when_beginning_again_then_old_session_released_first() {
    // Given: A capturing manager
    let dir = TempDir::new().unwrap();
    let (mut manager, journal) = manager(Failures::default(), &dir);
    manager
        .begin_capture(Some("1"), CallDirection::Incoming)
        .unwrap();

    // When: A second begin arrives without an end
    manager
        .begin_capture(Some("2"), CallDirection::Outgoing)
        .unwrap();

    // Then: The first resource was released before the second opened
    let calls = journal.lock().unwrap().clone();
    let first_release = calls
        .iter()
        .position(|c| *c == ResourceCall::Release)
        .unwrap();
    let second_open = calls
        .iter()
        .rposition(|c| *c == ResourceCall::Open)
        .unwrap();
    assert!(first_release < second_open);
    assert_eq!(manager.state(), SessionState::Capturing);
    assert_eq!(count(&journal, &ResourceCall::Open), 2);
}

/// WHAT: Keep-alive brackets the session
/// WHY: The host must keep the process alive only while capturing
#[test]
#[allow(clippy::unwrap_used)]
fn given_keep_alive_when_session_runs_then_started_and_stopped() {
    // Given: A manager with a recording keep-alive
    let dir = TempDir::new().unwrap();
    let (manager, _journal) = manager(Failures::default(), &dir);
    let keep_alive_journal = Arc::new(Mutex::new(Vec::new()));
    let mut manager = manager.with_keep_alive(Box::new(FakeKeepAlive {
        journal: Arc::clone(&keep_alive_journal),
    }));

    // When: A full session runs
    let path = manager
        .begin_capture(Some("1"), CallDirection::Incoming)
        .unwrap();
    manager.end_capture();

    // Then: Start with the path, then stop
    assert_eq!(
        *keep_alive_journal.lock().unwrap(),
        vec![KeepAliveCall::Start(path), KeepAliveCall::Stop]
    );
}

/// WHAT: Keep-alive is not started when acquisition fails
/// WHY: A failed start must not leave the host pinned alive
#[test]
#[allow(clippy::unwrap_used)]
fn given_acquisition_failure_when_beginning_then_keep_alive_untouched() {
    // Given: Neither source available
    let dir = TempDir::new().unwrap();
    let (manager, _journal) = manager(both_sources_unavailable(), &dir);
    let keep_alive_journal = Arc::new(Mutex::new(Vec::new()));
    let mut manager = manager.with_keep_alive(Box::new(FakeKeepAlive {
        journal: Arc::clone(&keep_alive_journal),
    }));

    // When: Beginning
    let _ = manager.begin_capture(Some("1"), CallDirection::Incoming);

    // Then: No keep-alive calls
    assert!(keep_alive_journal.lock().unwrap().is_empty());
}

/// WHAT: Manual recording uses the microphone and keeps its location
/// WHY: Manual captures share the resource lifecycle but not the call naming
#[test]
#[allow(clippy::unwrap_used)]
fn given_location_when_manual_recording_then_microphone_and_location_tagged() {
    // Given: A WAV manager
    let dir = TempDir::new().unwrap();
    let (manager, journal) = manager(Failures::default(), &dir);
    let mut manager = manager.with_format(OutputFormat::Wav);
    let location = GeoLocation {
        latitude: 50.087_451,
        longitude: 14.420_671,
    };

    // When: A manual session runs
    let path = manager.begin_manual(Some(location)).unwrap();
    let recording = manager.end_capture().unwrap();

    // Then: Microphone source, manual name, location attached
    assert_eq!(count(&journal, &ResourceCall::SetSource(AudioSource::Microphone)), 1);
    assert_eq!(recording.path, path);
    assert_eq!(recording.file_name(), "recording_20240102_030405.wav");
    assert_eq!(recording.direction, None);
    assert_eq!(recording.location_label(), "50.087451, 14.420671");
}

/// WHAT: Dropping the manager releases a live capture
/// WHY: Process teardown follows the same release path as end
#[test]
#[allow(clippy::unwrap_used)]
fn given_live_session_when_manager_dropped_then_stopped_and_released() {
    // Given: A capturing manager
    let dir = TempDir::new().unwrap();
    let (mut manager, journal) = manager(Failures::default(), &dir);
    manager
        .begin_capture(Some("1"), CallDirection::Incoming)
        .unwrap();

    // When: The manager is dropped
    drop(manager);

    // Then: Stop and release ran
    assert_eq!(count(&journal, &ResourceCall::Stop), 1);
    assert_eq!(count(&journal, &ResourceCall::Release), 1);
}

/// WHAT: A failed start leaves an older file with the same name alone
/// WHY: Names have one-second resolution; cleanup must only remove what this session wrote
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_recording_with_same_name_when_acquisition_fails_then_file_kept() {
    // Given: A finished recording already at the output path
    let dir = TempDir::new().unwrap();
    let recordings = dir.path().join("recordings");
    std::fs::create_dir_all(&recordings).unwrap();
    let existing = recordings.join("2024-01-02_03-04-05_IN_123456789.m4a");
    std::fs::write(&existing, b"audio bytes").unwrap();
    let (mut manager, _journal) = manager(both_sources_unavailable(), &dir);

    // When: A capture with the same name fails to acquire
    let result = manager.begin_capture(Some("123456789"), CallDirection::Incoming);

    // Then: Failure reported, earlier audio untouched
    assert!(matches!(
        result,
        Err(RecorderError::AcquisitionFailed { .. })
    ));
    assert_eq!(std::fs::read(&existing).unwrap(), b"audio bytes");
}

/// WHAT: Call-scoped end leaves a manual recording running
/// WHY: Idle signals from unrelated calls must not cut a manual recording short
#[test]
#[allow(clippy::unwrap_used)]
fn given_manual_recording_when_call_ended_then_manual_continues() {
    // Given: A manual recording
    let dir = TempDir::new().unwrap();
    let (mut manager, journal) = manager(Failures::default(), &dir);
    manager.begin_manual(None).unwrap();

    // When: A call end arrives
    let recording = manager.end_call();

    // Then: Nothing ended, manual still capturing
    assert!(recording.is_none());
    assert_eq!(manager.kind(), Some(SessionKind::Manual));
    assert_eq!(count(&journal, &ResourceCall::Stop), 0);
}

/// WHAT: Manual stop leaves a call recording running
/// WHY: Only the call's own idle signal ends a call recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_call_recording_when_manual_stopped_then_call_continues() {
    // Given: A call recording
    let dir = TempDir::new().unwrap();
    let (mut manager, journal) = manager(Failures::default(), &dir);
    manager
        .begin_capture(Some("1"), CallDirection::Incoming)
        .unwrap();

    // When: A manual stop arrives
    let recording = manager.end_manual();

    // Then: The call is still being recorded
    assert!(recording.is_none());
    assert_eq!(manager.kind(), Some(SessionKind::Call));
    assert_eq!(count(&journal, &ResourceCall::Stop), 0);
}

/// WHAT: A call going active takes the resource from a manual recording
/// WHY: Call recording has priority over the exclusive capture resource
#[test]
#[allow(clippy::unwrap_used)]
fn given_manual_recording_when_call_begins_then_manual_saved_and_call_captured() {
    // Given: A manual recording
    let dir = TempDir::new().unwrap();
    let (mut manager, journal) = manager(Failures::default(), &dir);
    manager.begin_manual(None).unwrap();

    // When: A call goes active
    manager
        .begin_capture(Some("1"), CallDirection::Incoming)
        .unwrap();

    // Then: The manual session was stopped and released, the call is live
    assert_eq!(manager.kind(), Some(SessionKind::Call));
    assert_eq!(count(&journal, &ResourceCall::Stop), 1);
    assert_eq!(count(&journal, &ResourceCall::Release), 1);
    assert_eq!(count(&journal, &ResourceCall::Open), 2);
}

/// WHAT: Manual start is refused while a call is recorded
/// WHY: A user action must not cut a live call recording short
#[test]
#[allow(clippy::unwrap_used)]
fn given_call_recording_when_manual_begins_then_busy_and_call_kept() {
    // Given: A call recording
    let dir = TempDir::new().unwrap();
    let (mut manager, journal) = manager(Failures::default(), &dir);
    manager
        .begin_capture(Some("1"), CallDirection::Incoming)
        .unwrap();

    // When: A manual recording is requested
    let result = manager.begin_manual(None);

    // Then: SessionBusy, the call resource untouched
    assert!(matches!(
        result,
        Err(RecorderError::SessionBusy {
            active: SessionKind::Call,
            ..
        })
    ));
    assert_eq!(manager.kind(), Some(SessionKind::Call));
    assert_eq!(count(&journal, &ResourceCall::Open), 1);
}
