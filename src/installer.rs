// installer.rs
use std::path::{Path, PathBuf};

use log::info;

use crate::autostart::{StartupLink, StartupRegistrar};
use crate::dialog::{Confirmation, Prompter};
use crate::error::InstallError;
use crate::proxy_config;
use crate::settings::InstallerSettings;

/// How a run of the installer ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user said no or let the dialog expire. Nothing was touched.
    Skipped(Confirmation),
    Registered {
        link_path: PathBuf,
        /// Rewritten `visible` lines, when the config toggle ran.
        visibility_updated: Option<usize>,
    },
}

pub struct Installer<P, R> {
    prompter: P,
    registrar: R,
    settings: InstallerSettings,
    base_dir: PathBuf,
}

impl<P: Prompter, R: StartupRegistrar> Installer<P, R> {
    /// `base_dir` is where the installer runs from. The proxy executable and
    /// its config file are expected there, and it becomes the link's working
    /// directory.
    pub fn new(prompter: P, registrar: R, settings: InstallerSettings, base_dir: PathBuf) -> Self {
        Self {
            prompter,
            registrar,
            settings,
            base_dir,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(&self.settings.config_file)
    }

    /// The link written on confirmation, targeting the quoted proxy path.
    pub fn startup_link(&self) -> StartupLink {
        let exe = self.base_dir.join(&self.settings.proxy_exe);
        StartupLink {
            name: self.settings.link_name.clone(),
            target: format!("\"{}\"", exe.display()),
            working_dir: self.base_dir.clone(),
            window_style: self.settings.window_style,
            description: self.settings.description.clone(),
        }
    }

    /// Writes `visible = 0` into the proxy config.
    pub fn hide_proxy_window(&self) -> Result<usize, InstallError> {
        proxy_config::set_visibility(&self.config_path(), 0)
    }

    pub fn run(&self) -> Result<Outcome, InstallError> {
        let s = &self.settings;
        let answer = self
            .prompter
            .confirm(&s.confirm_message, &s.dialog_title, s.confirm_timeout);

        if !answer.is_accepted() {
            info!("Autostart not requested ({:?}), nothing to do", answer);
            return Ok(Outcome::Skipped(answer));
        }

        let link = self.startup_link();
        info!("Registering {} -> {}", link.file_name(), link.target);
        let link_path = self.registrar.register(&link)?;

        let visibility_updated = if s.hide_proxy_window {
            Some(self.hide_proxy_window()?)
        } else {
            None
        };

        self.prompter
            .notify(&s.success_message, &s.dialog_title, s.notify_timeout);

        Ok(Outcome::Registered {
            link_path,
            visibility_updated,
        })
    }
}
