//! C-ABI FFI bindings for embedding in a host shell.
//!
//! This module provides a C-compatible API so a desktop shell written in
//! another language can compile documents and forward its commands through
//! the typed host contract as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::render::Theme;
use crate::workspace::{Host, HostRequest};

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct MdslidesResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The result data (null if failed). Must be freed with `mdslides_free_result`.
    pub data: *mut c_char,
    /// Error message (null if succeeded). Must be freed with `mdslides_free_result`.
    pub error: *mut c_char,
}

impl MdslidesResult {
    fn success(data: String) -> Self {
        Self {
            success: true,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: CString::new(message).unwrap_or_default().into_raw(),
        }
    }
}

/// Borrow a C string as `&str`, naming the argument in the error.
unsafe fn str_arg<'a>(value: *const c_char, name: &str) -> Result<&'a str, String> {
    if value.is_null() {
        return Err(format!("{} cannot be null", name));
    }
    CStr::from_ptr(value)
        .to_str()
        .map_err(|_| format!("Invalid UTF-8 in {}", name))
}

/// Compile a document.
///
/// On success `data` holds JSON `{"html", "diagnostics", "slide_count"}`.
/// A null `theme` selects the default theme.
///
/// # Safety
///
/// The `text` must be a valid null-terminated UTF-8 string; `theme` must be
/// null or a valid null-terminated UTF-8 string.
/// The returned result must be freed with `mdslides_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mdslides_compile(
    text: *const c_char,
    theme: *const c_char,
) -> MdslidesResult {
    let text = match str_arg(text, "Text") {
        Ok(s) => s,
        Err(e) => return MdslidesResult::error(e),
    };
    let theme = if theme.is_null() {
        Theme::default().id()
    } else {
        match str_arg(theme, "Theme") {
            Ok(s) => s,
            Err(e) => return MdslidesResult::error(e),
        }
    };

    match compile_internal(text, theme) {
        Ok(json) => MdslidesResult::success(json),
        Err(e) => MdslidesResult::error(e.to_string()),
    }
}

fn compile_internal(text: &str, theme: &str) -> crate::Result<String> {
    let output = crate::compile(text, theme);
    Ok(serde_json::to_string(&output)?)
}

/// Handle one host request given as JSON.
///
/// The request uses the [`HostRequest`] encoding, e.g.
/// `{"kind": "save", "text": "...", "path": "deck.md"}`. On success `data`
/// holds the JSON-encoded response.
///
/// # Safety
///
/// The `request` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `mdslides_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mdslides_handle_request(request: *const c_char) -> MdslidesResult {
    let request = match str_arg(request, "Request") {
        Ok(s) => s,
        Err(e) => return MdslidesResult::error(e),
    };

    match handle_request_internal(request) {
        Ok(json) => MdslidesResult::success(json),
        Err(e) => MdslidesResult::error(e.to_string()),
    }
}

fn handle_request_internal(request: &str) -> crate::Result<String> {
    let request: HostRequest =
        serde_json::from_str(request).map_err(|e| crate::Error::Config(e.to_string()))?;
    let response = Host::new().handle(request)?;
    Ok(serde_json::to_string(&response)?)
}

/// List the theme ids as a JSON array.
///
/// The returned result must be freed with `mdslides_free_result`.
#[no_mangle]
pub extern "C" fn mdslides_themes() -> MdslidesResult {
    let ids: Vec<&str> = Theme::ALL.iter().map(|theme| theme.id()).collect();
    match serde_json::to_string(&ids) {
        Ok(json) => MdslidesResult::success(json),
        Err(e) => MdslidesResult::error(e.to_string()),
    }
}

/// Free a result returned by any mdslides function.
///
/// # Safety
///
/// The `result` must have been returned by an mdslides function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn mdslides_free_result(result: MdslidesResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Free a string allocated by mdslides.
///
/// # Safety
///
/// The `ptr` must have been allocated by mdslides.
/// This function should only be called once per pointer.
#[no_mangle]
pub unsafe extern "C" fn mdslides_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the version of the mdslides library.
///
/// The returned string is statically allocated and should not be freed.
#[no_mangle]
pub extern "C" fn mdslides_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
