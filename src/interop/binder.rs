//! Symbol binder - typed, signature-checked FreeType entry points
//!
//! Design: Every entry point is resolved once, when the binder is built:
//! 1. The declared `SymbolSpec` signature is compared with the signature the
//!    typed Rust function pointer derives for itself (`ForeignFn`).
//! 2. The address is looked up through a `SymbolLookup`.
//! 3. A missing required symbol aborts construction; the optional
//!    `FT_Error_String` is recorded as absent and consulted at call time.
//!
//! One binder is cached per process (`Binder::global`). There is no reload;
//! a caller that wants a specific library installs it before first use.

use super::library::{process_with, DynamicLibrary, SymbolLookup};
use super::sys::{self, Requirement, SymbolSpec};
use super::types::ForeignFn;
use crate::config::{Config, LibraryConfig};
use crate::error::{BindError, Result};
use crate::logging;
use core::ffi::{c_char, c_void};
use once_cell::sync::OnceCell;
use std::ffi::CStr;
use std::fmt;
use std::sync::Arc;

/// Process-wide binder cache
static GLOBAL: OnceCell<Arc<Binder>> = OnceCell::new();

/// Resolved FreeType entry points
pub struct Binder {
    source: Box<dyn SymbolLookup>,
    init_freetype: sys::InitFreeTypeFn,
    done_freetype: sys::DoneFreeTypeFn,
    library_version: sys::LibraryVersionFn,
    new_face: sys::NewFaceFn,
    new_memory_face: sys::NewMemoryFaceFn,
    done_face: sys::DoneFaceFn,
    set_char_size: sys::SetCharSizeFn,
    set_pixel_sizes: sys::SetPixelSizesFn,
    select_charmap: sys::SelectCharmapFn,
    set_charmap: sys::SetCharmapFn,
    error_string: Option<sys::ErrorStringFn>,
}

impl Binder {
    /// Bind every entry point from `source`
    pub fn bind(source: Box<dyn SymbolLookup>) -> std::result::Result<Self, BindError> {
        let lookup = source.as_ref();

        let binder = Self {
            init_freetype: required(lookup, &sys::INIT_FREETYPE)?,
            done_freetype: required(lookup, &sys::DONE_FREETYPE)?,
            library_version: required(lookup, &sys::LIBRARY_VERSION)?,
            new_face: required(lookup, &sys::NEW_FACE)?,
            new_memory_face: required(lookup, &sys::NEW_MEMORY_FACE)?,
            done_face: required(lookup, &sys::DONE_FACE)?,
            set_char_size: required(lookup, &sys::SET_CHAR_SIZE)?,
            set_pixel_sizes: required(lookup, &sys::SET_PIXEL_SIZES)?,
            select_charmap: required(lookup, &sys::SELECT_CHARMAP)?,
            set_charmap: required(lookup, &sys::SET_CHARMAP)?,
            error_string: resolve(lookup, &sys::ERROR_STRING)?,
            source,
        };

        logging::debug!(
            source = %binder.source.describe(),
            error_string = binder.error_string.is_some(),
            "FreeType entry points bound"
        );
        Ok(binder)
    }

    /// Load FreeType as configured and bind it
    ///
    /// An explicit `path` is tried alone. Otherwise the search names are
    /// tried in order, then the running process image if allowed.
    pub fn load(config: &LibraryConfig) -> std::result::Result<Self, BindError> {
        let library = match &config.path {
            Some(path) => DynamicLibrary::load_path(path).map_err(|reason| {
                BindError::LibraryNotFound { tried: vec![path.display().to_string()], reason }
            })?,
            None => match DynamicLibrary::open_first(config.search_names.iter().map(String::as_str)) {
                Ok(library) => library,
                Err(err) if config.allow_process_symbols => {
                    process_with(sys::INIT_FREETYPE.name).ok_or(err)?
                }
                Err(err) => return Err(err),
            },
        };

        logging::log_library_loaded(library.name());
        Self::bind(Box::new(library))
    }

    /// Process-wide binder, loaded from `Config::load()` on first use
    pub fn global() -> Result<Arc<Binder>> {
        GLOBAL
            .get_or_try_init(|| -> Result<Arc<Binder>> {
                let config = Config::load()?;
                Ok(Arc::new(Binder::load(&config.library)?))
            })
            .cloned()
    }

    /// Install `binder` as the process-wide binder
    ///
    /// First caller wins; a rejected binder is handed back.
    pub fn install(binder: Arc<Binder>) -> std::result::Result<(), Arc<Binder>> {
        GLOBAL.set(binder)
    }

    /// Process-wide binder, if one was loaded or installed
    pub fn installed() -> Option<Arc<Binder>> {
        GLOBAL.get().cloned()
    }

    /// Whether the library exports `FT_Error_String`
    #[inline]
    pub fn has_error_string(&self) -> bool {
        self.error_string.is_some()
    }

    /// Where the entry points were resolved from
    pub fn source(&self) -> String {
        self.source.describe()
    }

    /// Native description of `code`, if the library has one
    pub fn error_string(&self, code: i32) -> Option<String> {
        let describe = self.error_string?;
        logging::log_ffi_call(sys::ERROR_STRING.name);
        let text: *const c_char = unsafe { describe(code) };
        if text.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned())
    }

    // ===== Entry points =====
    //
    // Safety for every call below: arguments must satisfy the FreeType
    // contract of the named function (live handles, valid out-pointers).

    pub(crate) unsafe fn init_freetype(&self, out: *mut sys::FT_Library) -> sys::FT_Error {
        logging::log_ffi_call(sys::INIT_FREETYPE.name);
        (self.init_freetype)(out)
    }

    pub(crate) unsafe fn done_freetype(&self, library: sys::FT_Library) -> sys::FT_Error {
        logging::log_ffi_call(sys::DONE_FREETYPE.name);
        (self.done_freetype)(library)
    }

    pub(crate) unsafe fn library_version(&self, library: sys::FT_Library) -> (i32, i32, i32) {
        logging::log_ffi_call(sys::LIBRARY_VERSION.name);
        let (mut major, mut minor, mut patch): (sys::FT_Int, sys::FT_Int, sys::FT_Int) = (0, 0, 0);
        (self.library_version)(library, &mut major, &mut minor, &mut patch);
        (major, minor, patch)
    }

    pub(crate) unsafe fn new_face(
        &self,
        library: sys::FT_Library,
        path: *const c_char,
        index: sys::FT_Long,
        out: *mut sys::FT_Face,
    ) -> sys::FT_Error {
        logging::log_ffi_call(sys::NEW_FACE.name);
        (self.new_face)(library, path, index, out)
    }

    pub(crate) unsafe fn new_memory_face(
        &self,
        library: sys::FT_Library,
        data: *const u8,
        len: sys::FT_Long,
        index: sys::FT_Long,
        out: *mut sys::FT_Face,
    ) -> sys::FT_Error {
        logging::log_ffi_call(sys::NEW_MEMORY_FACE.name);
        (self.new_memory_face)(library, data, len, index, out)
    }

    pub(crate) unsafe fn done_face(&self, face: sys::FT_Face) -> sys::FT_Error {
        logging::log_ffi_call(sys::DONE_FACE.name);
        (self.done_face)(face)
    }

    pub(crate) unsafe fn set_char_size(
        &self,
        face: sys::FT_Face,
        width: sys::FT_F26Dot6,
        height: sys::FT_F26Dot6,
        h_res: sys::FT_UInt,
        v_res: sys::FT_UInt,
    ) -> sys::FT_Error {
        logging::log_ffi_call(sys::SET_CHAR_SIZE.name);
        (self.set_char_size)(face, width, height, h_res, v_res)
    }

    pub(crate) unsafe fn set_pixel_sizes(
        &self,
        face: sys::FT_Face,
        width: sys::FT_UInt,
        height: sys::FT_UInt,
    ) -> sys::FT_Error {
        logging::log_ffi_call(sys::SET_PIXEL_SIZES.name);
        (self.set_pixel_sizes)(face, width, height)
    }

    pub(crate) unsafe fn select_charmap(
        &self,
        face: sys::FT_Face,
        encoding: sys::FT_Encoding,
    ) -> sys::FT_Error {
        logging::log_ffi_call(sys::SELECT_CHARMAP.name);
        (self.select_charmap)(face, encoding)
    }

    pub(crate) unsafe fn set_charmap(
        &self,
        face: sys::FT_Face,
        charmap: sys::FT_CharMap,
    ) -> sys::FT_Error {
        logging::log_ffi_call(sys::SET_CHARMAP.name);
        (self.set_charmap)(face, charmap)
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("source", &self.source.describe())
            .field("error_string", &self.error_string.is_some())
            .finish()
    }
}

/// Resolve `spec` as `F`, checking the declared signature first
///
/// Returns `Ok(None)` only for an absent optional symbol.
pub(crate) fn resolve<F: ForeignFn>(
    lookup: &dyn SymbolLookup,
    spec: &SymbolSpec,
) -> std::result::Result<Option<F>, BindError> {
    if spec.signature != F::SIGNATURE {
        return Err(BindError::SignatureMismatch {
            symbol: spec.name,
            expected: spec.signature,
            found: F::SIGNATURE,
        });
    }
    if spec.name.is_empty() || spec.name.contains('\0') {
        return Err(BindError::InvalidName(spec.name.to_string()));
    }

    match lookup.lookup(spec.name) {
        Some(addr) => {
            logging::log_symbol_bound(spec.name, &spec.signature);
            // Signature verified above; the address is the exported symbol
            Ok(Some(unsafe { F::from_addr(addr.as_ptr() as *const c_void) }))
        }
        None => match spec.requirement {
            Requirement::Required => Err(BindError::MissingSymbol(spec.name)),
            Requirement::Optional => {
                logging::log_optional_symbol_absent(spec.name);
                Ok(None)
            }
        },
    }
}

fn required<F: ForeignFn>(
    lookup: &dyn SymbolLookup,
    spec: &SymbolSpec,
) -> std::result::Result<F, BindError> {
    resolve(lookup, spec)?.ok_or(BindError::MissingSymbol(spec.name))
}
