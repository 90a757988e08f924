// error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort the installer.
///
/// A declined or expired confirmation is not an error; see
/// [`crate::dialog::Confirmation`].
#[derive(Debug, Error)]
pub enum InstallError {
    /// The proxy config file could not be read or rewritten.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The startup link could not be written.
    #[error("could not create startup link: {0}")]
    Registration(String),

    /// The directory the installer runs from is unavailable.
    #[error("could not determine the installer directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[cfg_attr(windows, allow(dead_code))]
    #[error("startup registration is only supported on Windows")]
    UnsupportedPlatform,
}

impl InstallError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
