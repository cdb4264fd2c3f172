//! FFI bindings for Wildtrack
//!
//! This module provides C-compatible functions for driving a session from a
//! non-Rust dashboard. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `wildtrack_free_string`.
//!
//! A session handle is not thread-safe; callers that feed it from several
//! threads must serialize access themselves.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::EngineConfig;
use crate::encoder::SnapshotEncoder;
use crate::location::FixSource;
use crate::schema::{EventAdapter, RawSample};
use crate::session::TelemetrySession;
use crate::types::{GeoPoint, Severity, TelemetrySample};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Opaque handle to a TelemetrySession
pub struct WildtrackSessionHandle {
    session: TelemetrySession,
    encoder: SnapshotEncoder,
}

impl WildtrackSessionHandle {
    fn snapshot_cstr(&self) -> *mut c_char {
        match self.encoder.encode_to_json(&self.session) {
            Ok(json) => string_to_cstr(&json),
            Err(e) => {
                set_last_error(&e.to_string());
                ptr::null_mut()
            }
        }
    }
}

// ============================================================================
// Session lifecycle
// ============================================================================

/// Create a new session.
///
/// # Safety
/// - `config_json` may be NULL (defaults) or a valid null-terminated C string
///   holding an engine configuration.
/// - Must be freed with `wildtrack_session_free`.
/// - Returns NULL on error; call `wildtrack_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wildtrack_session_new(
    config_json: *const c_char,
) -> *mut WildtrackSessionHandle {
    clear_last_error();

    let config = if config_json.is_null() {
        EngineConfig::default()
    } else {
        let json = match cstr_to_string(config_json) {
            Some(s) => s,
            None => {
                set_last_error("Invalid config string pointer");
                return ptr::null_mut();
            }
        };
        match EngineConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    };

    match TelemetrySession::with_config(config) {
        Ok(session) => Box::into_raw(Box::new(WildtrackSessionHandle {
            session,
            encoder: SnapshotEncoder::new(),
        })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `wildtrack_session_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wildtrack_session_free(session: *mut WildtrackSessionHandle) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

// ============================================================================
// Event ingestion
// ============================================================================

/// Apply one wire event (`{"type": ...}`) and return the resulting snapshot.
///
/// # Safety
/// - `session` must be a valid pointer returned by `wildtrack_session_new`.
/// - `event_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wildtrack_free_string`.
/// - Returns NULL on error; call `wildtrack_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wildtrack_session_apply(
    session: *mut WildtrackSessionHandle,
    event_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &mut *session;

    let json_str = match cstr_to_string(event_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid event string pointer");
            return ptr::null_mut();
        }
    };

    let event = match EventAdapter::parse_line(&json_str) {
        Ok(event) => event,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    if let Err(e) = event.validate() {
        set_last_error(&e.to_string());
        return ptr::null_mut();
    }

    handle.session.apply(event);
    // The snapshot's boundary state carries the request
    handle.session.take_pending_sound();
    handle.snapshot_cstr()
}

/// Ingest an upstream telemetry record (`hr_bpm`, `spo2_pct`, ...).
///
/// # Safety
/// - `session` must be a valid pointer returned by `wildtrack_session_new`.
/// - `sample_json` must be a valid null-terminated C string.
/// - Returns the requested sound severity: 0 = none, 1 = warning, 2 = critical,
///   or -1 on error (see `wildtrack_last_error`).
#[no_mangle]
pub unsafe extern "C" fn wildtrack_session_ingest_sample(
    session: *mut WildtrackSessionHandle,
    sample_json: *const c_char,
) -> i32 {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return -1;
    }

    let handle = &mut *session;

    let json_str = match cstr_to_string(sample_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid sample string pointer");
            return -1;
        }
    };

    match RawSample::from_json(&json_str) {
        Ok(raw) => {
            handle.session.ingest_sample(TelemetrySample::from(raw));
            sound_code(handle.session.take_pending_sound())
        }
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Ingest a location fix. Pass a negative `accuracy_m` when unknown.
///
/// `is_initial` marks the one-shot startup fix, which is accepted even after
/// the watch is stopped; pass `false` for fixes from the watch stream.
///
/// # Safety
/// - `session` must be a valid pointer returned by `wildtrack_session_new`.
/// - Returns the requested sound severity (see `wildtrack_session_ingest_sample`).
#[no_mangle]
pub unsafe extern "C" fn wildtrack_session_ingest_fix(
    session: *mut WildtrackSessionHandle,
    latitude_deg: f64,
    longitude_deg: f64,
    accuracy_m: f64,
    timestamp_ms: i64,
    is_initial: bool,
) -> i32 {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return -1;
    }

    if !latitude_deg.is_finite() || !longitude_deg.is_finite() {
        set_last_error("Fix coordinates must be finite");
        return -1;
    }

    let handle = &mut *session;
    let fix = GeoPoint {
        latitude_deg,
        longitude_deg,
        accuracy_m: (accuracy_m.is_finite() && accuracy_m >= 0.0).then_some(accuracy_m),
        timestamp_ms,
    };

    let source = if is_initial {
        FixSource::Initial
    } else {
        FixSource::Watch
    };

    handle.session.ingest_fix_from(fix, source);
    sound_code(handle.session.take_pending_sound())
}

/// Operator command: move the base to the current location.
///
/// # Safety
/// - `session` must be a valid pointer returned by `wildtrack_session_new`.
/// - Returns 1 if the base moved, 0 if no fix exists yet, -1 on error.
#[no_mangle]
pub unsafe extern "C" fn wildtrack_session_reset_base(session: *mut WildtrackSessionHandle) -> i32 {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return -1;
    }

    let handle = &mut *session;
    i32::from(handle.session.reset_base_to_current())
}

/// Return the current snapshot as JSON.
///
/// # Safety
/// - `session` must be a valid pointer returned by `wildtrack_session_new`.
/// - Returns a newly allocated string that must be freed with `wildtrack_free_string`.
/// - Returns NULL on error; call `wildtrack_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wildtrack_session_snapshot(
    session: *const WildtrackSessionHandle,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &*session;
    handle.snapshot_cstr()
}

fn sound_code(sound: Option<Severity>) -> i32 {
    match sound {
        None => 0,
        Some(Severity::Warning) => 1,
        Some(Severity::Critical) => 2,
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Wildtrack functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Wildtrack function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wildtrack_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Wildtrack function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn wildtrack_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Wildtrack library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn wildtrack_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
