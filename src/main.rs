// main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use log::info;

mod autostart;
mod dialog;
mod error;
mod installer;
mod proxy_config;
mod settings;
#[cfg(test)]
mod testing;
#[cfg(windows)]
mod win;

use autostart::ShellLinkRegistrar;
use dialog::SystemPrompter;
use error::InstallError;
use installer::{Installer, Outcome};
use settings::InstallerSettings;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let base_dir = std::env::current_dir().map_err(InstallError::CurrentDir)?;
    let installer = Installer::new(
        SystemPrompter::default(),
        ShellLinkRegistrar,
        InstallerSettings::default(),
        base_dir,
    );
    info!("Running from {}", installer.base_dir().display());

    match installer.run()? {
        Outcome::Skipped(answer) => info!("Finished without changes ({:?})", answer),
        Outcome::Registered {
            link_path,
            visibility_updated,
        } => {
            info!("DNS Proxy will start with the session: {}", link_path.display());
            if let Some(count) = visibility_updated {
                info!("Updated {} visible setting(s)", count);
            }
        }
    }

    Ok(())
}
