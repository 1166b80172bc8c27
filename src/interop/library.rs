//! Dynamic library loading and symbol resolution
//!
//! Platform-agnostic wrapper around dlopen/LoadLibrary, plus the
//! `SymbolLookup` seam the binder resolves entry points through.

use crate::error::BindError;
use crate::logging;
use core::ffi::c_void;
use core::ptr::NonNull;
use std::ffi::CString;
use std::path::Path;

/// Source of native entry points by name
pub trait SymbolLookup: Send + Sync {
    /// Address of `name`, or `None` if it is not exported
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>>;

    /// Where symbols come from, for diagnostics
    fn describe(&self) -> String;
}

/// Handle to dynamically loaded library
pub struct DynamicLibrary {
    handle: NonNull<c_void>,
    name: String,
    /// Process image handles are not ours to close
    owned: bool,
}

impl DynamicLibrary {
    /// Load library by name or path
    ///
    /// Bare names search the platform's standard library paths.
    pub fn load(name: &str) -> Result<Self, String> {
        let handle = Self::load_impl(name)?;
        Ok(Self { handle, name: name.to_string(), owned: true })
    }

    /// Load library from a filesystem path
    pub fn load_path(path: &Path) -> Result<Self, String> {
        let name = path
            .to_str()
            .ok_or_else(|| format!("path {} is not valid UTF-8", path.display()))?;
        Self::load(name)
    }

    /// Symbols already linked into the running process
    pub fn this_process() -> Result<Self, String> {
        let handle = Self::process_impl()?;
        Ok(Self { handle, name: "<process>".to_string(), owned: false })
    }

    /// Try each candidate in order; first success wins
    pub fn open_first<'a, I>(candidates: I) -> Result<Self, BindError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tried = Vec::new();
        let mut reason = String::from("no candidates configured");

        for candidate in candidates {
            tried.push(candidate.to_string());
            match Self::load(candidate) {
                Ok(lib) => return Ok(lib),
                Err(err) => reason = err,
            }
        }

        Err(BindError::LibraryNotFound { tried, reason })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(unix)]
    fn load_impl(name: &str) -> Result<NonNull<c_void>, String> {
        let cname = CString::new(name).map_err(|_| format!("invalid library name {:?}", name))?;

        unsafe {
            let handle = libc::dlopen(cname.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL);
            NonNull::new(handle).ok_or_else(last_dl_error)
        }
    }

    #[cfg(unix)]
    fn process_impl() -> Result<NonNull<c_void>, String> {
        unsafe {
            let handle = libc::dlopen(core::ptr::null(), libc::RTLD_NOW);
            NonNull::new(handle).ok_or_else(last_dl_error)
        }
    }

    #[cfg(windows)]
    fn load_impl(name: &str) -> Result<NonNull<c_void>, String> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use winapi::um::{errhandlingapi::GetLastError, libloaderapi::LoadLibraryW};

        let wide: Vec<u16> = OsStr::new(name).encode_wide().chain(Some(0)).collect();

        unsafe {
            let handle = LoadLibraryW(wide.as_ptr());
            NonNull::new(handle as *mut c_void)
                .ok_or_else(|| format!("LoadLibraryW failed with error code {}", GetLastError()))
        }
    }

    #[cfg(windows)]
    fn process_impl() -> Result<NonNull<c_void>, String> {
        use winapi::um::{errhandlingapi::GetLastError, libloaderapi::GetModuleHandleW};

        unsafe {
            let handle = GetModuleHandleW(core::ptr::null());
            NonNull::new(handle as *mut c_void)
                .ok_or_else(|| format!("GetModuleHandleW failed with error code {}", GetLastError()))
        }
    }

    #[cfg(unix)]
    fn symbol_impl(&self, cname: &CString) -> Option<NonNull<c_void>> {
        unsafe { NonNull::new(libc::dlsym(self.handle.as_ptr(), cname.as_ptr())) }
    }

    #[cfg(windows)]
    fn symbol_impl(&self, cname: &CString) -> Option<NonNull<c_void>> {
        use winapi::um::libloaderapi::GetProcAddress;

        unsafe {
            let ptr = GetProcAddress(self.handle.as_ptr() as _, cname.as_ptr());
            NonNull::new(ptr as *mut c_void)
        }
    }
}

impl SymbolLookup for DynamicLibrary {
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>> {
        let cname = CString::new(name).ok()?;
        self.symbol_impl(&cname)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

impl Drop for DynamicLibrary {
    #[cfg(unix)]
    fn drop(&mut self) {
        if self.owned {
            unsafe {
                libc::dlclose(self.handle.as_ptr());
            }
        }
    }

    #[cfg(windows)]
    fn drop(&mut self) {
        use winapi::um::libloaderapi::FreeLibrary;

        if self.owned {
            unsafe {
                FreeLibrary(self.handle.as_ptr() as _);
            }
        }
    }
}

// Module handles are process-global and usable from any thread
unsafe impl Send for DynamicLibrary {}
unsafe impl Sync for DynamicLibrary {}

impl std::fmt::Debug for DynamicLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicLibrary")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .finish()
    }
}

#[cfg(unix)]
fn last_dl_error() -> String {
    unsafe {
        let err = libc::dlerror();
        if err.is_null() {
            "Unknown error".into()
        } else {
            std::ffi::CStr::from_ptr(err).to_string_lossy().into_owned()
        }
    }
}

/// Process symbols, but only when they include FreeType itself
pub(crate) fn process_with(symbol: &str) -> Option<DynamicLibrary> {
    let process = DynamicLibrary::this_process().ok()?;
    if process.lookup(symbol).is_some() {
        logging::debug!(symbol = symbol, "FreeType found among process symbols");
        Some(process)
    } else {
        None
    }
}
