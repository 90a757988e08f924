// proxy_config.rs
//! Rewrites the `visible` flag in the proxy's `proxy.ini`.
//!
//! The file is handled as raw bytes so the rest of it survives untouched
//! whatever its encoding or line endings.

use std::fs;
use std::path::Path;

use log::{info, warn};
use once_cell::sync::Lazy;
use regex::bytes::{Captures, Regex};

use crate::error::InstallError;

// ASCII mode so the value run matches any byte up to the line break.
static VISIBLE_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)(visible\s*=[ \t]*)[^\r\n]*").expect("Invalid VISIBLE_ASSIGNMENT pattern")
});

/// Replaces the value of every `visible = ...` assignment in `content`.
///
/// The keyword and the whitespace around `=` are kept as written; only the
/// value after them changes. `value` is inserted verbatim. Returns the new
/// content and the number of assignments rewritten.
pub fn replace_visibility(content: &[u8], value: &str) -> (Vec<u8>, usize) {
    let mut count = 0;
    let replaced = VISIBLE_ASSIGNMENT.replace_all(content, |caps: &Captures| {
        count += 1;
        let mut line = caps[1].to_vec();
        line.extend_from_slice(value.as_bytes());
        line
    });
    (replaced.into_owned(), count)
}

/// Sets the `visible` flag in the config file at `path`.
///
/// The file is always rewritten in place, even when it has no `visible`
/// key. Returns how many assignments were changed.
pub fn set_visibility(path: &Path, value: impl ToString) -> Result<usize, InstallError> {
    let value = value.to_string();
    let content = fs::read(path).map_err(|e| InstallError::io(path, e))?;

    let (updated, count) = replace_visibility(&content, &value);
    if count == 0 {
        warn!("No visible key in {}, file left as is", path.display());
    }

    fs::write(path, updated).map_err(|e| InstallError::io(path, e))?;
    info!("Set visible = {} in {} ({} line(s))", value, path.display(), count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::scratch_dir;

    fn replace(content: &str, value: &str) -> (String, usize) {
        let (bytes, count) = replace_visibility(content.as_bytes(), value);
        (String::from_utf8(bytes).unwrap(), count)
    }

    #[test]
    fn replaces_value_and_keeps_other_lines() {
        let (out, count) = replace("visible = 1\nother = x", "0");
        assert_eq!(out, "visible = 0\nother = x");
        assert_eq!(count, 1);
    }

    #[test]
    fn keyword_is_case_insensitive() {
        let (out, _) = replace("[ui]\nVisible=1\nport = 53\n", "0");
        assert_eq!(out, "[ui]\nVisible=0\nport = 53\n");

        let (out, _) = replace("VISIBLE   =   true", "false");
        assert_eq!(out, "VISIBLE   =   false");
    }

    #[test]
    fn every_assignment_is_replaced() {
        let (out, count) = replace("visible = 1\nport = 53\nvisible = yes\n", "0");
        assert_eq!(out, "visible = 0\nport = 53\nvisible = 0\n");
        assert_eq!(count, 2);
    }

    #[test]
    fn crlf_line_endings_survive() {
        let (out, _) = replace("visible = 1\r\nother = x\r\n", "0");
        assert_eq!(out, "visible = 0\r\nother = x\r\n");
    }

    #[test]
    fn value_is_inserted_verbatim() {
        let (out, _) = replace("visible = 1", "$1 maybe");
        assert_eq!(out, "visible = $1 maybe");
    }

    #[test]
    fn empty_value_is_filled() {
        let (out, count) = replace("visible =\nother = x", "1");
        assert_eq!(out, "visible =1\nother = x");
        assert_eq!(count, 1);
    }

    #[test]
    fn non_utf8_bytes_are_preserved() {
        let content = b"name = \xc4\xe3\xba\xc3\nvisible = 1\n";
        let (out, count) = replace_visibility(content, "0");
        assert_eq!(out, b"name = \xc4\xe3\xba\xc3\nvisible = 0\n".to_vec());
        assert_eq!(count, 1);
    }

    #[test]
    fn set_visibility_rewrites_file() {
        let dir = scratch_dir("set-visibility");
        let path = dir.join("proxy.ini");
        fs::write(&path, "visible = 1\nother = x").unwrap();

        assert_eq!(set_visibility(&path, 0).unwrap(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "visible = 0\nother = x");
    }

    #[test]
    fn set_visibility_without_key_keeps_bytes() {
        let dir = scratch_dir("no-visible-key");
        let path = dir.join("proxy.ini");
        let original = "server = 127.0.0.1\r\nport = 53\r\n";
        fs::write(&path, original).unwrap();

        assert_eq!(set_visibility(&path, "1").unwrap(), 0);
        assert_eq!(fs::read(&path).unwrap(), original.as_bytes());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = scratch_dir("missing-config");
        let err = set_visibility(&dir.join("proxy.ini"), "0").unwrap_err();
        assert!(matches!(err, InstallError::Io { ref path, .. } if path.ends_with("proxy.ini")));
    }
}
