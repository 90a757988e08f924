// dialog.rs
//! Time-boxed message boxes.
//!
//! Both dialogs dismiss themselves after a fixed timeout, so the installer
//! never blocks indefinitely waiting for the user.

use std::time::Duration;

/// Answer to the confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    /// The user pressed No or closed the dialog.
    Declined,
    /// Nobody answered before the dialog expired.
    Timeout,
}

impl Confirmation {
    pub fn is_accepted(self) -> bool {
        self == Confirmation::Accepted
    }
}

pub trait Prompter {
    /// Shows a Yes/No question that closes itself after `timeout`.
    fn confirm(&self, message: &str, title: &str, timeout: Duration) -> Confirmation;

    /// Shows an informational message that closes itself after `timeout`.
    fn notify(&self, message: &str, title: &str, timeout: Duration);
}

impl<T: Prompter + ?Sized> Prompter for &T {
    fn confirm(&self, message: &str, title: &str, timeout: Duration) -> Confirmation {
        (**self).confirm(message, title, timeout)
    }

    fn notify(&self, message: &str, title: &str, timeout: Duration) {
        (**self).notify(message, title, timeout)
    }
}

#[cfg(windows)]
pub use self::windows::MessageBoxPrompter as SystemPrompter;

#[cfg(not(windows))]
pub use self::native::NativePrompter as SystemPrompter;

#[cfg(windows)]
mod windows {
    use std::ptr;
    use std::time::Duration;

    use log::{debug, warn};
    use winapi::ctypes::c_int;
    use winapi::shared::minwindef::{DWORD, UINT, WORD};
    use winapi::shared::windef::HWND;
    use winapi::um::winnt::LPCWSTR;
    use winapi::um::winuser::{
        IDNO, IDYES, MB_ICONINFORMATION, MB_ICONQUESTION, MB_OK, MB_SETFOREGROUND, MB_YESNO,
    };

    use super::{Confirmation, Prompter};
    use crate::win::to_wide;

    /// Returned by `MessageBoxTimeoutW` when the timer closed the box.
    const MB_TIMEDOUT: c_int = 32000;

    #[link(name = "user32")]
    extern "system" {
        // Undocumented but stable since Windows XP; WScript's Popup uses it.
        fn MessageBoxTimeoutW(
            hwnd: HWND,
            text: LPCWSTR,
            caption: LPCWSTR,
            utype: UINT,
            language: WORD,
            milliseconds: DWORD,
        ) -> c_int;
    }

    /// Win32 message boxes with a built-in dismiss timer.
    #[derive(Debug, Default)]
    pub struct MessageBoxPrompter;

    impl MessageBoxPrompter {
        fn show(&self, message: &str, title: &str, style: UINT, timeout: Duration) -> c_int {
            let text = to_wide(message);
            let caption = to_wide(title);
            let millis = DWORD::try_from(timeout.as_millis()).unwrap_or(DWORD::MAX);
            // SAFETY: both buffers are null-terminated and outlive the call.
            unsafe {
                MessageBoxTimeoutW(
                    ptr::null_mut(),
                    text.as_ptr(),
                    caption.as_ptr(),
                    style | MB_SETFOREGROUND,
                    0,
                    millis,
                )
            }
        }
    }

    impl Prompter for MessageBoxPrompter {
        fn confirm(&self, message: &str, title: &str, timeout: Duration) -> Confirmation {
            match self.show(message, title, MB_YESNO | MB_ICONQUESTION, timeout) {
                IDYES => Confirmation::Accepted,
                IDNO => Confirmation::Declined,
                MB_TIMEDOUT => Confirmation::Timeout,
                0 => {
                    warn!("Message box failed to open, treating as declined");
                    Confirmation::Declined
                }
                other => {
                    debug!("Unexpected message box result {}", other);
                    Confirmation::Declined
                }
            }
        }

        fn notify(&self, message: &str, title: &str, timeout: Duration) {
            if self.show(message, title, MB_OK | MB_ICONINFORMATION, timeout) == 0 {
                warn!("Message box failed to open");
            }
        }
    }
}

#[cfg(not(windows))]
mod native {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use log::warn;
    use native_dialog::{MessageDialog, MessageType};

    use super::{Confirmation, Prompter};

    /// Desktop dialogs through `native-dialog`.
    ///
    /// These have no dismiss timer of their own, so each one runs on a worker
    /// thread and the caller stops waiting once the timeout elapses. A dialog
    /// left open is torn down with the process.
    #[derive(Debug, Default)]
    pub struct NativePrompter;

    fn spawn_dialog<T, F>(show: F, timeout: Duration) -> Option<Result<T, String>>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, native_dialog::Error> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(show().map_err(|e| e.to_string()));
        });
        rx.recv_timeout(timeout).ok()
    }

    impl Prompter for NativePrompter {
        fn confirm(&self, message: &str, title: &str, timeout: Duration) -> Confirmation {
            let (message, title) = (message.to_owned(), title.to_owned());
            let answer = spawn_dialog(
                move || {
                    MessageDialog::new()
                        .set_type(MessageType::Info)
                        .set_title(&title)
                        .set_text(&message)
                        .show_confirm()
                },
                timeout,
            );

            match answer {
                Some(Ok(true)) => Confirmation::Accepted,
                Some(Ok(false)) => Confirmation::Declined,
                Some(Err(e)) => {
                    warn!("Dialog error, treating as declined: {}", e);
                    Confirmation::Declined
                }
                None => Confirmation::Timeout,
            }
        }

        fn notify(&self, message: &str, title: &str, timeout: Duration) {
            let (message, title) = (message.to_owned(), title.to_owned());
            let shown = spawn_dialog(
                move || {
                    MessageDialog::new()
                        .set_type(MessageType::Info)
                        .set_title(&title)
                        .set_text(&message)
                        .show_alert()
                },
                timeout,
            );

            if let Some(Err(e)) = shown {
                warn!("Dialog error: {}", e);
            }
        }
    }
}
