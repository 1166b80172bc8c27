//! Charmap view - one `FT_CharMapRec` owned by a face

use crate::encoding::EncodingTag;
use crate::error::{Result, UsageError};
use crate::face::Face;
use crate::layout::{self, StructView};
use crate::lifecycle::{HandleKind, NativeHandle};
use core::ffi::c_void;
use std::fmt;

/// Borrowed view of a charmap record inside its parent face
pub struct CharMap<'a> {
    handle: NativeHandle,
    face: &'a Face<'a>,
}

impl<'a> CharMap<'a> {
    /// View the record at `raw` as a charmap of `face`
    ///
    /// The record's own `face` field must name `face`; anything else is
    /// rejected with `ParentMismatch`.
    ///
    /// # Safety
    /// A non-null `raw` must point to a live `FT_CharMapRec`.
    pub unsafe fn from_raw(face: &'a Face<'a>, raw: *mut c_void) -> Result<Self> {
        let parent = face.handle().get()?;
        let handle = NativeHandle::view(raw, HandleKind::CharMap)?;

        let owner = record(&handle).read_ptr("face");
        if owner != parent.as_ptr() {
            return Err(UsageError::ParentMismatch {
                expected: parent.as_ptr() as usize,
                found: owner as usize,
            }
            .into());
        }
        Ok(Self { handle, face })
    }

    /// Native `FT_CharMap` address
    #[inline]
    pub fn raw(&self) -> *mut c_void {
        self.handle.addr().as_ptr()
    }

    /// Face this charmap belongs to
    #[inline]
    pub fn parent(&self) -> &'a Face<'a> {
        self.face
    }

    /// Encoding tag; see [`EncodingTag::known`] for the named set
    pub fn encoding(&self) -> EncodingTag {
        EncodingTag::from_native(self.view().read_i32("encoding"))
    }

    /// TrueType platform id (emulated for other formats)
    pub fn platform_id(&self) -> u16 {
        self.view().read_u16("platform_id")
    }

    /// Platform-specific encoding id
    pub fn encoding_id(&self) -> u16 {
        self.view().read_u16("encoding_id")
    }

    pub(crate) fn face_address(&self) -> *mut c_void {
        self.view().read_ptr("face")
    }

    fn view(&self) -> StructView<'_> {
        // The parent face cannot be closed while this borrow exists
        unsafe { record(&self.handle) }
    }
}

unsafe fn record(handle: &NativeHandle) -> StructView<'_> {
    StructView::new(handle.addr().cast(), layout::host().charmap())
}

impl fmt::Debug for CharMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharMap")
            .field("encoding", &self.encoding().to_string())
            .field("platform_id", &self.platform_id())
            .field("encoding_id", &self.encoding_id())
            .field("address", &self.raw())
            .finish()
    }
}
