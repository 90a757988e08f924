// win.rs
use std::ffi::OsStr;
use std::iter;
use std::os::windows::ffi::OsStrExt;

/// Null-terminated UTF-16 copy of `s` for Win32 calls.
pub fn to_wide(s: impl AsRef<OsStr>) -> Vec<u16> {
    s.as_ref().encode_wide().chain(iter::once(0)).collect()
}
