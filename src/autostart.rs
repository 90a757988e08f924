// autostart.rs
//! Per-user autostart registration through a shell link in the Startup
//! folder.

use std::path::PathBuf;

use crate::error::InstallError;

/// A launch record for the user's Startup folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupLink {
    /// Link name without the `.lnk` extension.
    pub name: String,
    /// Stored exactly as given, quotes included.
    pub target: String,
    pub working_dir: PathBuf,
    /// `SW_*` show command applied when the target is launched.
    pub window_style: i32,
    pub description: String,
}

impl StartupLink {
    pub fn file_name(&self) -> String {
        format!("{}.lnk", self.name)
    }
}

pub trait StartupRegistrar {
    /// Writes `link` into the autostart location, replacing any record with
    /// the same name. Returns where the record was written.
    fn register(&self, link: &StartupLink) -> Result<PathBuf, InstallError>;
}

impl<T: StartupRegistrar + ?Sized> StartupRegistrar for &T {
    fn register(&self, link: &StartupLink) -> Result<PathBuf, InstallError> {
        (**self).register(link)
    }
}

/// Writes `.lnk` files with the Windows shell.
#[derive(Debug, Default)]
pub struct ShellLinkRegistrar;

#[cfg(target_os = "windows")]
impl StartupRegistrar for ShellLinkRegistrar {
    fn register(&self, link: &StartupLink) -> Result<PathBuf, InstallError> {
        let dir = shell::startup_dir()?;
        if !dir.is_dir() {
            return Err(InstallError::Registration(format!(
                "startup folder {} does not exist",
                dir.display()
            )));
        }

        let path = dir.join(link.file_name());
        shell::save_link(link, &path)?;
        log::info!("Wrote startup link {}", path.display());
        Ok(path)
    }
}

#[cfg(not(target_os = "windows"))]
impl StartupRegistrar for ShellLinkRegistrar {
    fn register(&self, link: &StartupLink) -> Result<PathBuf, InstallError> {
        log::error!("Cannot register {}: no Startup folder on this platform", link.name);
        Err(InstallError::UnsupportedPlatform)
    }
}

#[cfg(target_os = "windows")]
mod shell {
    use std::path::{Path, PathBuf};
    use std::ptr;

    use winapi::ctypes::c_void;
    use winapi::shared::guiddef::GUID;
    use winapi::shared::minwindef::TRUE;
    use winapi::shared::winerror::{FAILED, HRESULT, RPC_E_CHANGED_MODE, SUCCEEDED};
    use winapi::shared::wtypesbase::CLSCTX_INPROC_SERVER;
    use winapi::um::combaseapi::{CoCreateInstance, CoInitializeEx, CoUninitialize};
    use winapi::um::objbase::COINIT_APARTMENTTHREADED;
    use winapi::um::objidl::IPersistFile;
    use winapi::um::shobjidl_core::IShellLinkW;
    use winapi::um::unknwnbase::IUnknown;
    use winapi::Interface;
    use winreg::enums::HKEY_CURRENT_USER;
    use winreg::RegKey;

    use super::StartupLink;
    use crate::error::InstallError;
    use crate::win::to_wide;

    const SHELL_FOLDERS: &str = r"Software\Microsoft\Windows\CurrentVersion\Explorer\Shell Folders";

    // {00021401-0000-0000-C000-000000000046}
    const CLSID_SHELL_LINK: GUID = GUID {
        Data1: 0x0002_1401,
        Data2: 0x0000,
        Data3: 0x0000,
        Data4: [0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46],
    };

    /// The current user's Startup folder.
    pub fn startup_dir() -> Result<PathBuf, InstallError> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let from_registry = hkcu
            .open_subkey(SHELL_FOLDERS)
            .and_then(|key| key.get_value::<String, _>("Startup"));

        match from_registry {
            Ok(dir) => Ok(PathBuf::from(dir)),
            Err(e) => {
                log::debug!("Shell Folders lookup failed ({}), using APPDATA", e);
                dirs::config_dir()
                    .map(|appdata| {
                        appdata
                            .join("Microsoft")
                            .join("Windows")
                            .join("Start Menu")
                            .join("Programs")
                            .join("Startup")
                    })
                    .ok_or_else(|| {
                        InstallError::Registration("could not locate the Startup folder".into())
                    })
            }
        }
    }

    fn check(hr: HRESULT, what: &str) -> Result<(), InstallError> {
        if FAILED(hr) {
            return Err(InstallError::Registration(format!(
                "{} failed: HRESULT 0x{:08X}",
                what, hr as u32
            )));
        }
        Ok(())
    }

    /// Balances a successful `CoInitializeEx`.
    struct ComApartment {
        initialized: bool,
    }

    impl ComApartment {
        fn enter() -> Result<Self, InstallError> {
            // SAFETY: reserved pointer must be null.
            let hr = unsafe { CoInitializeEx(ptr::null_mut(), COINIT_APARTMENTTHREADED) };
            if hr == RPC_E_CHANGED_MODE {
                // Already initialized on this thread with another model; usable as is.
                return Ok(Self { initialized: false });
            }
            check(hr, "CoInitializeEx")?;
            Ok(Self {
                initialized: SUCCEEDED(hr),
            })
        }
    }

    impl Drop for ComApartment {
        fn drop(&mut self) {
            if self.initialized {
                // SAFETY: paired with the successful CoInitializeEx in `enter`.
                unsafe { CoUninitialize() };
            }
        }
    }

    /// Owned COM interface pointer, released on drop.
    struct ComPtr<T: Interface>(*mut T);

    impl<T: Interface> ComPtr<T> {
        fn get(&self) -> &T {
            // SAFETY: constructed only from non-null pointers returned by COM.
            unsafe { &*self.0 }
        }
    }

    impl<T: Interface> Drop for ComPtr<T> {
        fn drop(&mut self) {
            // SAFETY: every COM interface starts with the IUnknown vtable.
            unsafe { (*(self.0 as *mut IUnknown)).Release() };
        }
    }

    /// Creates or overwrites the `.lnk` file at `path`.
    pub fn save_link(link: &StartupLink, path: &Path) -> Result<(), InstallError> {
        let _apartment = ComApartment::enter()?;

        let mut raw: *mut c_void = ptr::null_mut();
        // SAFETY: out-pointer is valid; the IID matches the requested interface.
        let hr = unsafe {
            CoCreateInstance(
                &CLSID_SHELL_LINK,
                ptr::null_mut(),
                CLSCTX_INPROC_SERVER,
                &IShellLinkW::uuidof(),
                &mut raw,
            )
        };
        check(hr, "CoCreateInstance(ShellLink)")?;
        let shell_link = ComPtr(raw as *mut IShellLinkW);

        let target = to_wide(&link.target);
        let description = to_wide(&link.description);
        let working_dir = to_wide(&link.working_dir);

        // SAFETY: all strings are null-terminated and live until the calls return.
        unsafe {
            check(shell_link.get().SetPath(target.as_ptr()), "IShellLinkW::SetPath")?;
            check(
                shell_link.get().SetDescription(description.as_ptr()),
                "IShellLinkW::SetDescription",
            )?;
            check(
                shell_link.get().SetWorkingDirectory(working_dir.as_ptr()),
                "IShellLinkW::SetWorkingDirectory",
            )?;
            check(
                shell_link.get().SetShowCmd(link.window_style),
                "IShellLinkW::SetShowCmd",
            )?;
        }

        let mut raw: *mut c_void = ptr::null_mut();
        // SAFETY: QueryInterface writes a valid IPersistFile pointer on success.
        let hr = unsafe {
            shell_link
                .get()
                .QueryInterface(&IPersistFile::uuidof(), &mut raw)
        };
        check(hr, "QueryInterface(IPersistFile)")?;
        let persist = ComPtr(raw as *mut IPersistFile);

        let file = to_wide(path);
        // SAFETY: `file` is a null-terminated path buffer.
        let hr = unsafe { persist.get().Save(file.as_ptr(), TRUE) };
        check(hr, "IPersistFile::Save")
    }
}
