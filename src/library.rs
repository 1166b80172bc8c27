//! Library handle - one initialized FreeType instance
//!
//! Every face opened through a `FreeType` borrows it, so the library cannot
//! be closed or dropped while any of its faces is still reachable.

use crate::error::{self, codes, Error, Result, UsageError};
use crate::face::Face;
use crate::interop::{sys, Binder};
use crate::lifecycle::{FontData, HandleKind, NativeHandle};
use crate::logging;
use core::ffi::c_void;
use std::ffi::CString;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::ptr;
use std::sync::Arc;

/// Version of the loaded FreeType library
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Face to open inside a font resource
///
/// Bits 0-15 select the face, bits 16-30 the named instance of a variable
/// font (0 opens the default instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FaceIndex {
    face: u16,
    instance: u16,
}

impl FaceIndex {
    /// Largest named instance index that fits in bits 16-30
    pub const MAX_INSTANCE: u16 = 0x7FFF;

    pub const fn new(face: u16) -> Self {
        Self { face, instance: 0 }
    }

    pub fn with_instance(face: u16, instance: u16) -> std::result::Result<Self, UsageError> {
        if instance > Self::MAX_INSTANCE {
            return Err(UsageError::InvalidFaceIndex(u32::from(instance)));
        }
        Ok(Self { face, instance })
    }

    #[inline]
    pub const fn face(self) -> u16 {
        self.face
    }

    #[inline]
    pub const fn instance(self) -> u16 {
        self.instance
    }

    /// Value passed as `face_index` to FreeType
    #[inline]
    pub const fn packed(self) -> i64 {
        ((self.instance as i64) << 16) | self.face as i64
    }
}

impl From<u16> for FaceIndex {
    fn from(face: u16) -> Self {
        Self::new(face)
    }
}

impl TryFrom<u32> for FaceIndex {
    type Error = UsageError;

    /// Split an already packed index
    fn try_from(packed: u32) -> std::result::Result<Self, UsageError> {
        let instance = packed >> 16;
        if instance > u32::from(Self::MAX_INSTANCE) {
            return Err(UsageError::InvalidFaceIndex(instance));
        }
        Ok(Self { face: packed as u16, instance: instance as u16 })
    }
}

/// Initialized FreeType library (`FT_Library`)
pub struct FreeType {
    handle: NativeHandle,
    native: Arc<Binder>,
}

impl FreeType {
    /// Initialize a library through the process-wide binder
    pub fn new() -> Result<Self> {
        Self::with_binder(Binder::global()?)
    }

    /// Initialize a library through `native`
    pub fn with_binder(native: Arc<Binder>) -> Result<Self> {
        let mut raw: sys::FT_Library = ptr::null_mut();
        let code = unsafe { native.init_freetype(&mut raw) };
        if code != codes::OK {
            let err = Error::init(code, &native);
            logging::log_ffi_error(
                sys::INIT_FREETYPE.name,
                code,
                err.description().unwrap_or(error::NO_DESCRIPTION),
            );
            return Err(err);
        }

        let handle = NativeHandle::owned(raw, HandleKind::Library)?;
        logging::log_handle_opened(&HandleKind::Library, raw);
        Ok(Self { handle, native })
    }

    /// Native `FT_Library` address
    #[inline]
    pub fn raw(&self) -> *mut c_void {
        self.handle.addr().as_ptr()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Entry points this library calls through
    #[inline]
    pub fn binder(&self) -> &Arc<Binder> {
        &self.native
    }

    #[inline]
    pub(crate) fn native(&self) -> &Binder {
        &self.native
    }

    /// Version of the loaded FreeType
    pub fn version(&self) -> Result<Version> {
        let library = self.handle.get()?;
        let (major, minor, patch) = unsafe { self.native.library_version(library.as_ptr()) };
        let part = |v: i32| u32::try_from(v).unwrap_or(0);
        Ok(Version::new(part(major), part(minor), part(patch)))
    }

    /// Open a face from a font file, read by FreeType itself
    pub fn new_face(&self, path: impl AsRef<Path>, index: impl Into<FaceIndex>) -> Result<Face<'_>> {
        let library = self.handle.get()?;
        let path = path.as_ref();
        let c_path = path_to_cstring(path)?;

        let mut raw: sys::FT_Face = ptr::null_mut();
        let code = unsafe {
            self.native.new_face(library.as_ptr(), c_path.as_ptr(), native_index(index.into()), &mut raw)
        };
        error::check(sys::NEW_FACE.name, code, &self.native)?;

        logging::debug!(path = %path.display(), "face opened from file");
        Face::open(self, raw, None)
    }

    /// Read a font file into memory and open it as a memory face
    pub fn load_face(&self, path: impl AsRef<Path>, index: impl Into<FaceIndex>) -> Result<Face<'_>> {
        self.handle.get()?;
        let bytes = std::fs::read(path.as_ref())?;
        self.new_memory_face(bytes, index)
    }

    /// Open a face from font bytes
    ///
    /// The face keeps its own reference to the bytes until it is closed.
    /// Borrowed slices are copied once; an `Arc<[u8]>` is shared as is.
    pub fn new_memory_face(
        &self,
        data: impl Into<FontData>,
        index: impl Into<FaceIndex>,
    ) -> Result<Face<'_>> {
        let library = self.handle.get()?;
        let data: FontData = data.into();
        let len = sys::FT_Long::try_from(data.len())
            .map_err(|_| UsageError::BufferTooLarge(data.len()))?;

        let mut raw: sys::FT_Face = ptr::null_mut();
        let code = unsafe {
            self.native.new_memory_face(
                library.as_ptr(),
                data.as_ptr(),
                len,
                native_index(index.into()),
                &mut raw,
            )
        };
        error::check(sys::NEW_MEMORY_FACE.name, code, &self.native)?;

        logging::debug!(bytes = data.len(), "face opened from memory");
        Face::open(self, raw, Some(data))
    }

    /// Drain `reader` and open the bytes as a memory face
    pub fn new_memory_face_from_reader<R: Read>(
        &self,
        mut reader: R,
        index: impl Into<FaceIndex>,
    ) -> Result<Face<'_>> {
        self.handle.get()?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.new_memory_face(bytes, index)
    }

    /// Tear down the library
    ///
    /// A second call fails with `AlreadyClosed` without reaching FreeType.
    pub fn close(&mut self) -> Result<()> {
        self.release()
    }

    fn release(&self) -> Result<()> {
        let addr = self.handle.begin_release()?;
        let code = unsafe { self.native.done_freetype(addr.as_ptr()) };
        logging::log_handle_released(&self.handle.kind(), addr.as_ptr());
        error::check(sys::DONE_FREETYPE.name, code, &self.native)
    }
}

impl Drop for FreeType {
    fn drop(&mut self) {
        if self.handle.is_open() {
            if let Err(err) = self.release() {
                logging::log_release_failed(&self.handle.kind(), &err);
            }
        }
    }
}

impl fmt::Debug for FreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeType")
            .field("handle", &self.handle)
            .field("native", &self.native)
            .finish()
    }
}

#[inline]
fn native_index(index: FaceIndex) -> sys::FT_Long {
    // At most 31 bits, so it fits every `long`
    index.packed() as sys::FT_Long
}

#[cfg(unix)]
fn path_to_cstring(path: &Path) -> std::result::Result<CString, UsageError> {
    use std::os::unix::ffi::OsStrExt;

    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| UsageError::InvalidPath(path.display().to_string()))
}

#[cfg(not(unix))]
fn path_to_cstring(path: &Path) -> std::result::Result<CString, UsageError> {
    path.to_str()
        .and_then(|s| CString::new(s).ok())
        .ok_or_else(|| UsageError::InvalidPath(path.display().to_string()))
}
