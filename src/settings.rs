// settings.rs
use std::time::Duration;

/// `SW_SHOWMINNOACTIVE`: start minimized without taking focus.
pub const WINDOW_STYLE_MINIMIZED: i32 = 7;

/// Fixed values the installer runs with.
///
/// Nothing here is read from disk or the command line. The struct exists so
/// the flow can be driven with explicit values in tests.
#[derive(Debug, Clone)]
pub struct InstallerSettings {
    /// Startup link name without extension. Re-running overwrites it.
    pub link_name: String,
    /// Proxy executable, expected next to the installer.
    pub proxy_exe: String,
    /// Proxy config file holding the `visible` flag.
    pub config_file: String,
    pub description: String,
    pub window_style: i32,
    pub confirm_timeout: Duration,
    pub notify_timeout: Duration,
    pub dialog_title: String,
    pub confirm_message: String,
    pub success_message: String,
    /// Also write `visible = 0` to the config file after registering.
    pub hide_proxy_window: bool,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            link_name: "DNSProxy".to_string(),
            proxy_exe: "dnsProxy.exe".to_string(),
            config_file: "proxy.ini".to_string(),
            description: "DNS Proxy".to_string(),
            window_style: WINDOW_STYLE_MINIMIZED,
            confirm_timeout: Duration::from_secs(6),
            notify_timeout: Duration::from_secs(5),
            dialog_title: "DNS Proxy 对话框".to_string(),
            confirm_message: "是否将dnsProxy.exe加入到启动项？(本对话框6秒后消失)".to_string(),
            success_message: "成功加入DNS Proxy到启动项".to_string(),
            hide_proxy_window: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_installer() {
        let settings = InstallerSettings::default();
        assert_eq!(settings.link_name, "DNSProxy");
        assert_eq!(settings.window_style, 7);
        assert_eq!(settings.confirm_timeout, Duration::from_secs(6));
        assert_eq!(settings.notify_timeout, Duration::from_secs(5));
        assert!(!settings.hide_proxy_window);
    }
}
