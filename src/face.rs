//! Face handle - one typeface opened from a file or from memory
//!
//! Every accessor reads the native `FT_FaceRec` through the host layout
//! table; nothing is cached on the Rust side, so values reflect whatever
//! FreeType last wrote (for example the active charmap).

use crate::bbox::BBox;
use crate::charmap::CharMap;
use crate::encoding::EncodingTag;
use crate::error::{self, Result, UsageError};
use crate::fixed::F26Dot6;
use crate::interop::sys;
use crate::layout::{self, pointer_array, struct_array, StructView};
use crate::lifecycle::{FontData, HandleKind, NativeHandle};
use crate::library::FreeType;
use crate::logging;
use core::ffi::c_void;
use std::fmt;

/// `FT_FACE_FLAG_*` bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FaceFlags(i64);

impl FaceFlags {
    pub const SCALABLE: Self = Self(1 << 0);
    pub const FIXED_SIZES: Self = Self(1 << 1);
    pub const FIXED_WIDTH: Self = Self(1 << 2);
    pub const SFNT: Self = Self(1 << 3);
    pub const HORIZONTAL: Self = Self(1 << 4);
    pub const VERTICAL: Self = Self(1 << 5);
    pub const KERNING: Self = Self(1 << 6);
    pub const FAST_GLYPHS: Self = Self(1 << 7);
    pub const MULTIPLE_MASTERS: Self = Self(1 << 8);
    pub const GLYPH_NAMES: Self = Self(1 << 9);
    pub const EXTERNAL_STREAM: Self = Self(1 << 10);
    pub const HINTER: Self = Self(1 << 11);
    pub const CID_KEYED: Self = Self(1 << 12);
    pub const TRICKY: Self = Self(1 << 13);
    pub const COLOR: Self = Self(1 << 14);
    pub const VARIATION: Self = Self(1 << 15);
    pub const SVG: Self = Self(1 << 16);
    pub const SBIX: Self = Self(1 << 17);
    pub const SBIX_OVERLAY: Self = Self(1 << 18);

    #[inline]
    pub const fn bits(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn from_bits(bits: i64) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for FaceFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// `FT_STYLE_FLAG_ITALIC`
const STYLE_ITALIC: i64 = 1 << 0;
/// `FT_STYLE_FLAG_BOLD`
const STYLE_BOLD: i64 = 1 << 1;

/// One embedded bitmap strike (`FT_Bitmap_Size`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapSize {
    /// Vertical distance in pixels between two consecutive baselines
    pub height: i16,
    /// Average glyph width in pixels
    pub width: i16,
    /// Nominal size in points
    pub size: F26Dot6,
    pub x_ppem: F26Dot6,
    pub y_ppem: F26Dot6,
}

impl BitmapSize {
    fn read(view: &StructView<'_>) -> Self {
        Self {
            height: view.read_i16("height"),
            width: view.read_i16("width"),
            size: F26Dot6::from_raw(view.read_long("size")),
            x_ppem: F26Dot6::from_raw(view.read_long("x_ppem")),
            y_ppem: F26Dot6::from_raw(view.read_long("y_ppem")),
        }
    }
}

/// Opened typeface (`FT_Face`)
pub struct Face<'lib> {
    handle: NativeHandle,
    library: &'lib FreeType,
    /// Bytes FreeType reads from, for memory faces
    data: Option<FontData>,
}

impl<'lib> Face<'lib> {
    pub(crate) fn open(
        library: &'lib FreeType,
        raw: *mut c_void,
        data: Option<FontData>,
    ) -> Result<Self> {
        let handle = NativeHandle::owned(raw, HandleKind::Face)?;
        logging::log_handle_opened(&HandleKind::Face, raw);
        Ok(Self { handle, library, data })
    }

    /// Native `FT_Face` address
    #[inline]
    pub fn raw(&self) -> *mut c_void {
        self.handle.addr().as_ptr()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Library this face was opened through
    #[inline]
    pub fn library(&self) -> &'lib FreeType {
        self.library
    }

    /// Font bytes backing a memory face
    #[inline]
    pub fn font_data(&self) -> Option<&FontData> {
        self.data.as_ref()
    }

    fn record(&self) -> Result<StructView<'_>> {
        let addr = self.handle.get()?;
        // Open face: FreeType keeps the record alive until FT_Done_Face
        Ok(unsafe { StructView::new(addr.cast(), layout::host().face()) })
    }

    // ===== Record fields =====

    /// Number of faces in the font resource
    pub fn face_count(&self) -> Result<i64> {
        Ok(self.record()?.read_long("num_faces"))
    }

    /// Index this face was opened with (face in bits 0-15, instance above)
    pub fn face_index(&self) -> Result<i64> {
        Ok(self.record()?.read_long("face_index"))
    }

    pub fn glyph_count(&self) -> Result<i64> {
        Ok(self.record()?.read_long("num_glyphs"))
    }

    pub fn family_name(&self) -> Result<Option<String>> {
        let record = self.record()?;
        Ok(unsafe { record.read_c_string("family_name") })
    }

    /// Style name, `None` when the font does not provide one
    pub fn style_name(&self) -> Result<Option<String>> {
        let record = self.record()?;
        Ok(unsafe { record.read_c_string("style_name") })
    }

    pub fn fixed_sizes_count(&self) -> Result<i32> {
        Ok(self.record()?.read_i32("num_fixed_sizes"))
    }

    pub fn charmap_count(&self) -> Result<i32> {
        Ok(self.record()?.read_i32("num_charmaps"))
    }

    /// Font units per EM square; 0 for bitmap-only fonts
    pub fn units_per_em(&self) -> Result<u16> {
        Ok(self.record()?.read_u16("units_per_EM"))
    }

    pub fn face_flags(&self) -> Result<FaceFlags> {
        Ok(FaceFlags(self.record()?.read_long("face_flags")))
    }

    pub fn style_flags(&self) -> Result<i64> {
        Ok(self.record()?.read_long("style_flags"))
    }

    pub fn ascender(&self) -> Result<i16> {
        Ok(self.record()?.read_i16("ascender"))
    }

    pub fn descender(&self) -> Result<i16> {
        Ok(self.record()?.read_i16("descender"))
    }

    pub fn height(&self) -> Result<i16> {
        Ok(self.record()?.read_i16("height"))
    }

    pub fn max_advance_width(&self) -> Result<i16> {
        Ok(self.record()?.read_i16("max_advance_width"))
    }

    pub fn max_advance_height(&self) -> Result<i16> {
        Ok(self.record()?.read_i16("max_advance_height"))
    }

    pub fn underline_position(&self) -> Result<i16> {
        Ok(self.record()?.read_i16("underline_position"))
    }

    pub fn underline_thickness(&self) -> Result<i16> {
        Ok(self.record()?.read_i16("underline_thickness"))
    }

    pub fn is_scalable(&self) -> Result<bool> {
        Ok(self.face_flags()?.contains(FaceFlags::SCALABLE))
    }

    pub fn has_fixed_sizes(&self) -> Result<bool> {
        Ok(self.face_flags()?.contains(FaceFlags::FIXED_SIZES))
    }

    pub fn has_kerning(&self) -> Result<bool> {
        Ok(self.face_flags()?.contains(FaceFlags::KERNING))
    }

    pub fn is_italic(&self) -> Result<bool> {
        Ok(self.style_flags()? & STYLE_ITALIC != 0)
    }

    pub fn is_bold(&self) -> Result<bool> {
        Ok(self.style_flags()? & STYLE_BOLD != 0)
    }

    // ===== Sub-views =====

    /// Font-wide bounding box in font units
    pub fn bbox(&self) -> Result<BBox<'_>> {
        let bbox = self.record()?.field_ptr("bbox");
        BBox::new(self, bbox.as_ptr() as *mut c_void)
    }

    /// Every charmap of the face, in native order
    pub fn charmaps(&self) -> Result<Vec<CharMap<'_>>> {
        let record = self.record()?;
        let count = usize::try_from(record.read_i32("num_charmaps")).unwrap_or(0);
        let table = unsafe { pointer_array(record.read_ptr("charmaps"), count) };

        table
            .iter()
            .map(|&raw| unsafe { CharMap::from_raw(self, raw) })
            .collect()
    }

    /// Active charmap, if FreeType selected one
    pub fn charmap(&self) -> Result<Option<CharMap<'_>>> {
        let raw = self.record()?.read_ptr("charmap");
        if raw.is_null() {
            return Ok(None);
        }
        unsafe { CharMap::from_raw(self, raw) }.map(Some)
    }

    /// Embedded bitmap strikes
    pub fn fixed_sizes(&self) -> Result<Vec<BitmapSize>> {
        let record = self.record()?;
        let count = usize::try_from(record.read_i32("num_fixed_sizes")).unwrap_or(0);
        let sizes = unsafe {
            struct_array(record.read_ptr("available_sizes"), count, layout::host().bitmap_size())
        };
        Ok(sizes.iter().map(BitmapSize::read).collect())
    }

    // ===== Operations =====

    /// Set the nominal size in points at the given resolution (dpi)
    ///
    /// A zero width or height takes the other value; a zero resolution
    /// takes the other resolution, or 72 dpi if both are zero.
    pub fn set_char_size(
        &self,
        width: F26Dot6,
        height: F26Dot6,
        h_res: u32,
        v_res: u32,
    ) -> Result<()> {
        let face = self.handle.get()?;
        let (width, height) = (native_f26dot6(width)?, native_f26dot6(height)?);
        let code = unsafe { self.native().set_char_size(face.as_ptr(), width, height, h_res, v_res) };
        error::check(sys::SET_CHAR_SIZE.name, code, self.native())
    }

    /// Set the nominal size in pixels
    pub fn set_pixel_sizes(&self, width: u32, height: u32) -> Result<()> {
        let face = self.handle.get()?;
        let code = unsafe { self.native().set_pixel_sizes(face.as_ptr(), width, height) };
        error::check(sys::SET_PIXEL_SIZES.name, code, self.native())
    }

    /// Activate the charmap with `encoding`
    pub fn select_charmap(&self, encoding: impl Into<EncodingTag>) -> Result<()> {
        let face = self.handle.get()?;
        let tag = encoding.into();
        let code = unsafe { self.native().select_charmap(face.as_ptr(), tag.to_native()) };
        error::check(sys::SELECT_CHARMAP.name, code, self.native())
    }

    /// Activate `charmap`, which must belong to this face
    pub fn set_charmap(&self, charmap: &CharMap<'_>) -> Result<()> {
        let face = self.handle.get()?;
        let owner = charmap.face_address();
        if owner != face.as_ptr() {
            return Err(UsageError::ParentMismatch {
                expected: face.as_ptr() as usize,
                found: owner as usize,
            }
            .into());
        }
        let code = unsafe { self.native().set_charmap(face.as_ptr(), charmap.raw()) };
        error::check(sys::SET_CHARMAP.name, code, self.native())
    }

    /// Release the face
    ///
    /// A second call fails with `AlreadyClosed` without reaching FreeType.
    pub fn close(&mut self) -> Result<()> {
        self.release()
    }

    fn release(&self) -> Result<()> {
        let addr = self.handle.begin_release()?;
        let code = unsafe { self.native().done_face(addr.as_ptr()) };
        logging::log_handle_released(&self.handle.kind(), addr.as_ptr());
        error::check(sys::DONE_FACE.name, code, self.native())
    }

    #[inline]
    fn native(&self) -> &crate::interop::Binder {
        self.library.native()
    }

    pub(crate) fn handle(&self) -> &NativeHandle {
        &self.handle
    }
}

/// 26.6 value as the native `long`, which is 32 bits on LLP64 and ILP32
fn native_f26dot6(value: F26Dot6) -> std::result::Result<sys::FT_F26Dot6, UsageError> {
    sys::FT_F26Dot6::try_from(value.raw()).map_err(|_| UsageError::SizeOutOfRange(value.raw()))
}

impl Drop for Face<'_> {
    fn drop(&mut self) {
        // Runs before `data` is dropped, so FreeType never outlives its bytes
        if self.handle.is_open() {
            if let Err(err) = self.release() {
                logging::log_release_failed(&self.handle.kind(), &err);
            }
        }
    }
}

impl fmt::Debug for Face<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face")
            .field("handle", &self.handle)
            .field("memory", &self.data.as_ref().map(|d| d.len()))
            .finish()
    }
}
