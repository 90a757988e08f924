// testing.rs
//! Recording fakes for the dialog and autostart seams.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::autostart::{StartupLink, StartupRegistrar};
use crate::dialog::{Confirmation, Prompter};
use crate::error::InstallError;

#[derive(Debug, Clone)]
pub struct PromptCall {
    pub message: String,
    pub title: String,
    pub timeout: Duration,
}

/// Answers every confirmation with a fixed result.
pub struct FakePrompter {
    answer: Confirmation,
    confirms: RefCell<Vec<PromptCall>>,
    notifications: RefCell<Vec<PromptCall>>,
}

impl FakePrompter {
    pub fn answering(answer: Confirmation) -> Self {
        Self {
            answer,
            confirms: RefCell::new(Vec::new()),
            notifications: RefCell::new(Vec::new()),
        }
    }

    pub fn confirms(&self) -> Vec<PromptCall> {
        self.confirms.borrow().clone()
    }

    pub fn notifications(&self) -> Vec<PromptCall> {
        self.notifications.borrow().clone()
    }
}

impl Prompter for FakePrompter {
    fn confirm(&self, message: &str, title: &str, timeout: Duration) -> Confirmation {
        self.confirms.borrow_mut().push(PromptCall {
            message: message.to_string(),
            title: title.to_string(),
            timeout,
        });
        self.answer
    }

    fn notify(&self, message: &str, title: &str, timeout: Duration) {
        self.notifications.borrow_mut().push(PromptCall {
            message: message.to_string(),
            title: title.to_string(),
            timeout,
        });
    }
}

/// In-memory Startup folder keyed by link file name.
#[derive(Default)]
pub struct FakeRegistrar {
    fail: bool,
    calls: Cell<usize>,
    links: RefCell<BTreeMap<String, StartupLink>>,
}

impl FakeRegistrar {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn folder(&self) -> PathBuf {
        PathBuf::from("Startup")
    }

    pub fn links(&self) -> Vec<StartupLink> {
        self.links.borrow().values().cloned().collect()
    }

    pub fn register_calls(&self) -> usize {
        self.calls.get()
    }
}

impl StartupRegistrar for FakeRegistrar {
    fn register(&self, link: &StartupLink) -> Result<PathBuf, InstallError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(InstallError::Registration("access denied".into()));
        }
        let file_name = link.file_name();
        self.links
            .borrow_mut()
            .insert(file_name.clone(), link.clone());
        Ok(self.folder().join(file_name))
    }
}

/// Fresh empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "dnsproxy-startup-{}-{}",
        std::process::id(),
        name
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
