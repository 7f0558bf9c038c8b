//! C ABI.
//!
//! Strings in, one owned JSON string out. Every string returned by
//! [`nethttp_execute`] must be released with [`nethttp_free_string`].

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use log::{error, warn};

use crate::config::{ExecutorConfig, LogFormat, LogLevel};
use crate::envelope::ResultEnvelope;
use crate::error_handling::ExecutorError;
use crate::fetch::execute_envelope;
use crate::fetch::request::RequestSpec;
use crate::initialization::init_logger_with;

static CONFIG: OnceLock<ExecutorConfig> = OnceLock::new();

/// Process-wide config, read from the environment on first use.
fn config() -> &'static ExecutorConfig {
    CONFIG.get_or_init(|| {
        let config = ExecutorConfig::from_env();
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("Ignoring invalid executor configuration ({e}); using defaults");
                ExecutorConfig::default()
            }
        }
    })
}

/// Executes one HTTP request and returns the JSON result envelope.
///
/// Null string pointers are read as empty strings. A null `body` (or a zero
/// `body_len`) sends no body. The call blocks until the request completes or
/// fails; it never panics across the boundary.
///
/// # Safety
///
/// - Every non-null string pointer must point to a NUL-terminated string that
///   stays valid for the duration of the call.
/// - If `body` is non-null it must point to at least `body_len` readable bytes.
/// - The returned pointer is owned by the caller and must be passed to
///   [`nethttp_free_string`] exactly once.
#[no_mangle]
pub unsafe extern "C" fn nethttp_execute(
    method: *const c_char,
    url: *const c_char,
    headers_json: *const c_char,
    proxy_url: *const c_char,
    disable_redirects: bool,
    body: *const u8,
    body_len: usize,
) -> *mut c_char {
    let spec = RequestSpec {
        method: read_c_str(method),
        url: read_c_str(url),
        headers_json: read_c_str(headers_json),
        body: read_body(body, body_len),
        proxy_url: read_c_str(proxy_url),
        disable_redirects,
    };

    let envelope = panic::catch_unwind(AssertUnwindSafe(|| run_blocking(&spec)))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            error!("Request execution panicked: {message}");
            ResultEnvelope::failure(&ExecutorError::Unknown(format!("internal panic: {message}")))
        });

    into_c_string(envelope.to_json())
}

/// Releases a string returned by [`nethttp_execute`]. Null is a no-op.
///
/// # Safety
///
/// `ptr` must be null or a pointer previously returned by
/// [`nethttp_execute`] that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn nethttp_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Installs the crate's logger (1 = Error .. 5 = Trace).
///
/// Returns false if a logger is already installed in this process.
#[no_mangle]
pub extern "C" fn nethttp_init_logger(level: c_int, json: bool) -> bool {
    let format = if json { LogFormat::Json } else { LogFormat::Plain };
    init_logger_with(LogLevel::from_ffi(level).into(), format).is_ok()
}

/// Drives one call on a runtime owned by this call.
fn run_blocking(spec: &RequestSpec) -> ResultEnvelope {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            return ResultEnvelope::failure(&ExecutorError::Unknown(format!(
                "failed to start async runtime: {e}"
            )))
        }
    };
    runtime.block_on(execute_envelope(spec, config()))
}

unsafe fn read_c_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

unsafe fn read_body(ptr: *const u8, len: usize) -> Vec<u8> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    std::slice::from_raw_parts(ptr, len).to_vec()
}

fn into_c_string(json: String) -> *mut c_char {
    // serde_json escapes control characters, so an interior NUL only appears
    // through a bug; strip it rather than hand back nothing.
    let c_string = CString::new(json).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    c_string.into_raw()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
