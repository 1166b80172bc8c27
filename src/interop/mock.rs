//! In-process stand-in for the FreeType library
//!
//! Exports the bound entry points with the real C signatures and builds
//! face and charmap records with the native memory layout, so the wrappers
//! run unchanged against it. Native objects are leaked on purpose: teardown
//! only bumps a counter, which keeps double-close observable after the fact.

use super::binder::Binder;
use super::library::SymbolLookup;
use super::sys::{self, FT_CharMap, FT_Encoding, FT_Error, FT_F26Dot6, FT_Face, FT_Int, FT_Library, FT_Long, FT_UInt};
use crate::error::codes;
use core::ffi::{c_char, c_long, c_void};
use core::ptr::{self, NonNull};
use std::ffi::{CStr, CString};
use std::sync::Arc;

// ============================================================================
// #[repr(C)] mirrors of the FreeType records
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawGeneric {
    pub data: *mut c_void,
    pub finalizer: *mut c_void,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawBBox {
    pub x_min: c_long,
    pub y_min: c_long,
    pub x_max: c_long,
    pub y_max: c_long,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawCharMap {
    pub face: *mut c_void,
    pub encoding: FT_Encoding,
    pub platform_id: u16,
    pub encoding_id: u16,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawBitmapSize {
    pub height: i16,
    pub width: i16,
    pub size: c_long,
    pub x_ppem: c_long,
    pub y_ppem: c_long,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawFace {
    pub num_faces: c_long,
    pub face_index: c_long,
    pub face_flags: c_long,
    pub style_flags: c_long,
    pub num_glyphs: c_long,
    pub family_name: *const c_char,
    pub style_name: *const c_char,
    pub num_fixed_sizes: FT_Int,
    pub available_sizes: *mut RawBitmapSize,
    pub num_charmaps: FT_Int,
    pub charmaps: *mut *mut RawCharMap,
    pub generic: RawGeneric,
    pub bbox: RawBBox,
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub height: i16,
    pub max_advance_width: i16,
    pub max_advance_height: i16,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub glyph: *mut c_void,
    pub size: *mut c_void,
    pub charmap: *mut RawCharMap,
}

impl RawFace {
    pub fn zeroed() -> Self {
        // Integers and raw pointers only
        unsafe { core::mem::zeroed() }
    }
}

// ============================================================================
// Mock native objects
// ============================================================================

struct MockLibrary {
    done_calls: usize,
    /// Result of the next `FT_Done_FreeType`, OK when unset
    fail_with: FT_Error,
}

/// Face record followed by the storage its pointers reference
#[repr(C)]
struct MockFace {
    raw: RawFace,
    done_calls: usize,
    /// Result of the next face-scoped call, OK when unset
    fail_with: FT_Error,
    source: *const u8,
    char_size: Option<(i64, i64, u32, u32)>,
    pixel_sizes: Option<(u32, u32)>,
    _family: CString,
    _style: Option<CString>,
    sizes: Vec<RawBitmapSize>,
    charmap_records: Vec<Box<RawCharMap>>,
    charmap_table: Vec<*mut RawCharMap>,
}

impl MockFace {
    fn take_failure(&mut self) -> FT_Error {
        core::mem::replace(&mut self.fail_with, codes::OK)
    }

    /// Scalable faces take any size; bitmap-only faces need a matching strike
    fn matches_strike(&self, pixel_height: i64) -> bool {
        self.raw.face_flags & 1 != 0
            || self.sizes.iter().any(|s| (i64::from(s.y_ppem) + 32) >> 6 == pixel_height)
    }
}

/// Font bytes the mock opens as "Fira Code Regular"
pub(crate) const FIRA: &[u8] = b"MOCKFONT Fira Code Regular";
/// Font bytes the mock opens as a bitmap-only face
pub(crate) const BITMAP: &[u8] = b"MOCKBITMAP strike font";

pub(crate) const FIRA_PATH: &str = "mock://fira";
pub(crate) const BITMAP_PATH: &str = "mock://bitmap";

/// Codes the static table does not know
pub(crate) const DESCRIBED_CODE: i32 = 0xF0;
pub(crate) const UNDESCRIBED_CODE: i32 = 0xF1;
pub(crate) const DESCRIBED_TEXT: &str = "mock resolution rejected";

/// Horizontal resolutions that make `FT_Set_Char_Size` fail
pub(crate) const REJECTED_RES_DESCRIBED: u32 = 9999;
pub(crate) const REJECTED_RES_UNDESCRIBED: u32 = 9998;

const UNIC: FT_Encoding = tag(b"unic");
const ARMN: FT_Encoding = tag(b"armn");

const fn tag(bytes: &[u8; 4]) -> FT_Encoding {
    u32::from_be_bytes(*bytes) as FT_Encoding
}

enum Fixture {
    Fira,
    Bitmap,
}

impl Fixture {
    fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"MOCKFONT") {
            Some(Self::Fira)
        } else if data.starts_with(b"MOCKBITMAP") {
            Some(Self::Bitmap)
        } else {
            None
        }
    }

    fn from_path(path: &str) -> Option<Self> {
        match path {
            FIRA_PATH => Some(Self::Fira),
            BITMAP_PATH => Some(Self::Bitmap),
            _ => None,
        }
    }

    fn build(self, index: FT_Long, source: *const u8) -> Box<MockFace> {
        let mut face = Box::new(MockFace {
            raw: RawFace::zeroed(),
            done_calls: 0,
            fail_with: codes::OK,
            source,
            char_size: None,
            pixel_sizes: None,
            _family: CString::default(),
            _style: None,
            sizes: Vec::new(),
            charmap_records: Vec::new(),
            charmap_table: Vec::new(),
        });
        let (family, style, charmaps): (&str, Option<&str>, &[(FT_Encoding, u16, u16)]) = match self {
            Self::Fira => {
                face.raw.num_glyphs = 2030;
                face.raw.face_flags = 0x21D;
                face.raw.units_per_em = 1950;
                face.raw.ascender = 1800;
                face.raw.descender = -600;
                face.raw.height = 2400;
                face.raw.max_advance_width = 1200;
                face.raw.max_advance_height = 2400;
                face.raw.underline_position = -245;
                face.raw.underline_thickness = 100;
                face.raw.bbox = RawBBox { x_min: -3556, y_min: -1200, x_max: 2596, y_max: 2400 };
                (
                    "Fira Code",
                    Some("Regular"),
                    &[(UNIC, 3, 1), (ARMN, 1, 0), (UNIC, 0, 3), (UNIC, 3, 10)],
                )
            }
            Self::Bitmap => {
                face.raw.num_glyphs = 96;
                face.raw.face_flags = 0x1A;
                face.raw.style_flags = 0x2;
                face.sizes = vec![
                    RawBitmapSize { height: 12, width: 6, size: 768, x_ppem: 768, y_ppem: 768 },
                    RawBitmapSize { height: 16, width: 8, size: 1024, x_ppem: 1024, y_ppem: 1024 },
                ];
                ("Mock Bitmap", None, &[(UNIC, 3, 1)])
            }
        };

        face._family = CString::new(family).unwrap_or_default();
        face._style = style.and_then(|s| CString::new(s).ok());

        let face_addr = &mut *face as *mut MockFace as *mut c_void;
        face.charmap_records = charmaps
            .iter()
            .map(|&(encoding, platform_id, encoding_id)| {
                Box::new(RawCharMap { face: face_addr, encoding, platform_id, encoding_id })
            })
            .collect();
        face.charmap_table = face
            .charmap_records
            .iter_mut()
            .map(|record| &mut **record as *mut RawCharMap)
            .collect();

        face.raw.num_faces = 1;
        face.raw.face_index = index;
        face.raw.family_name = face._family.as_ptr();
        face.raw.style_name = face._style.as_ref().map_or(ptr::null(), |s| s.as_ptr());
        face.raw.num_fixed_sizes = face.sizes.len() as FT_Int;
        face.raw.available_sizes =
            if face.sizes.is_empty() { ptr::null_mut() } else { face.sizes.as_mut_ptr() };
        face.raw.num_charmaps = face.charmap_table.len() as FT_Int;
        face.raw.charmaps = face.charmap_table.as_mut_ptr();
        face.raw.charmap = face.charmap_table.first().copied().unwrap_or(ptr::null_mut());
        face
    }
}

// ============================================================================
// Exported entry points
// ============================================================================

unsafe extern "C" fn init_freetype(out: *mut FT_Library) -> FT_Error {
    *out = Box::into_raw(Box::new(MockLibrary { done_calls: 0, fail_with: codes::OK })) as FT_Library;
    codes::OK
}

unsafe extern "C" fn init_freetype_failing(_out: *mut FT_Library) -> FT_Error {
    codes::OUT_OF_MEMORY
}

unsafe extern "C" fn done_freetype(library: FT_Library) -> FT_Error {
    if library.is_null() {
        return codes::INVALID_LIBRARY_HANDLE;
    }
    let library = &mut *(library as *mut MockLibrary);
    library.done_calls += 1;
    core::mem::replace(&mut library.fail_with, codes::OK)
}

unsafe extern "C" fn library_version(
    _library: FT_Library,
    major: *mut FT_Int,
    minor: *mut FT_Int,
    patch: *mut FT_Int,
) {
    *major = 2;
    *minor = 13;
    *patch = 3;
}

unsafe extern "C" fn error_string(code: FT_Error) -> *const c_char {
    match code {
        DESCRIBED_CODE => b"mock resolution rejected\0".as_ptr() as *const c_char,
        _ => ptr::null(),
    }
}

unsafe extern "C" fn new_face(
    library: FT_Library,
    path: *const c_char,
    index: FT_Long,
    out: *mut FT_Face,
) -> FT_Error {
    if library.is_null() {
        return codes::INVALID_LIBRARY_HANDLE;
    }
    let path = CStr::from_ptr(path).to_string_lossy();
    match Fixture::from_path(&path) {
        Some(fixture) => open(fixture, index, ptr::null(), out),
        None => codes::CANNOT_OPEN_RESOURCE,
    }
}

unsafe extern "C" fn new_memory_face(
    library: FT_Library,
    data: *const u8,
    len: FT_Long,
    index: FT_Long,
    out: *mut FT_Face,
) -> FT_Error {
    if library.is_null() {
        return codes::INVALID_LIBRARY_HANDLE;
    }
    if data.is_null() || len <= 0 {
        return codes::UNKNOWN_FILE_FORMAT;
    }
    let bytes = core::slice::from_raw_parts(data, len as usize);
    match Fixture::from_bytes(bytes) {
        Some(fixture) => open(fixture, index, data, out),
        None => codes::UNKNOWN_FILE_FORMAT,
    }
}

unsafe fn open(fixture: Fixture, index: FT_Long, source: *const u8, out: *mut FT_Face) -> FT_Error {
    // Every fixture holds a single face
    if index < 0 || index & 0xFFFF >= 1 {
        return codes::INVALID_ARGUMENT;
    }
    *out = Box::into_raw(fixture.build(index, source)) as FT_Face;
    codes::OK
}

unsafe extern "C" fn done_face(face: FT_Face) -> FT_Error {
    if face.is_null() {
        return codes::INVALID_FACE_HANDLE;
    }
    let face = &mut *(face as *mut MockFace);
    face.done_calls += 1;
    face.take_failure()
}

unsafe extern "C" fn set_char_size(
    face: FT_Face,
    width: FT_F26Dot6,
    height: FT_F26Dot6,
    h_res: FT_UInt,
    v_res: FT_UInt,
) -> FT_Error {
    if face.is_null() {
        return codes::INVALID_FACE_HANDLE;
    }
    let face = &mut *(face as *mut MockFace);
    let injected = face.take_failure();
    if injected != codes::OK {
        return injected;
    }
    match h_res {
        REJECTED_RES_DESCRIBED => return DESCRIBED_CODE,
        REJECTED_RES_UNDESCRIBED => return UNDESCRIBED_CODE,
        _ => {}
    }
    // Zero sizes and resolutions default like FreeType: to each other,
    // then to one point and 72 dpi
    let width = if width == 0 { height } else { width };
    let height = if height == 0 { width } else { height };
    let (width, height) = (i64::from(width).max(64), i64::from(height).max(64));
    let h_res = if h_res == 0 { v_res } else { h_res };
    let v_res = if v_res == 0 { h_res } else { v_res };
    let (h_res, v_res) = if h_res == 0 { (72, 72) } else { (h_res, v_res) };

    // Scaled to 26.6 pixels, then rounded to whole pixels
    let pixel_height = (height * i64::from(v_res) + 36) / 72;
    let pixel_height = (pixel_height + 32) >> 6;
    if !face.matches_strike(pixel_height) {
        return codes::INVALID_PIXEL_SIZE;
    }
    face.char_size = Some((width, height, h_res, v_res));
    codes::OK
}

unsafe extern "C" fn set_pixel_sizes(face: FT_Face, width: FT_UInt, height: FT_UInt) -> FT_Error {
    if face.is_null() {
        return codes::INVALID_FACE_HANDLE;
    }
    let face = &mut *(face as *mut MockFace);
    let injected = face.take_failure();
    if injected != codes::OK {
        return injected;
    }
    let width = if width == 0 { height } else { width };
    let height = if height == 0 { width } else { height };
    let (width, height) = (width.max(1), height.max(1));
    if !face.matches_strike(i64::from(height)) {
        return codes::INVALID_PIXEL_SIZE;
    }
    face.pixel_sizes = Some((width, height));
    codes::OK
}

unsafe extern "C" fn select_charmap(face: FT_Face, encoding: FT_Encoding) -> FT_Error {
    if face.is_null() {
        return codes::INVALID_FACE_HANDLE;
    }
    let face = &mut *(face as *mut MockFace);
    let injected = face.take_failure();
    if injected != codes::OK {
        return injected;
    }
    match face.charmap_table.iter().find(|&&cm| (*cm).encoding == encoding) {
        Some(&cm) => {
            face.raw.charmap = cm;
            codes::OK
        }
        None => codes::INVALID_ARGUMENT,
    }
}

unsafe extern "C" fn set_charmap(face: FT_Face, charmap: FT_CharMap) -> FT_Error {
    if face.is_null() {
        return codes::INVALID_FACE_HANDLE;
    }
    if charmap.is_null() {
        return codes::INVALID_CHARMAP_HANDLE;
    }
    let face = &mut *(face as *mut MockFace);
    let injected = face.take_failure();
    if injected != codes::OK {
        return injected;
    }
    let charmap = charmap as *mut RawCharMap;
    if face.charmap_table.contains(&charmap) {
        face.raw.charmap = charmap;
        codes::OK
    } else {
        codes::INVALID_ARGUMENT
    }
}

// ============================================================================
// Lookup and inspection
// ============================================================================

/// Symbol source backed by the functions above
#[derive(Debug, Default, Clone)]
pub(crate) struct MockLookup {
    missing: Vec<&'static str>,
    failing_init: bool,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop exporting `name`
    pub fn without(mut self, name: &'static str) -> Self {
        self.missing.push(name);
        self
    }

    /// Make `FT_Init_FreeType` fail with out-of-memory
    pub fn failing_init(mut self) -> Self {
        self.failing_init = true;
        self
    }

    pub fn binder(self) -> Arc<Binder> {
        Arc::new(Binder::bind(Box::new(self)).expect("mock exports every required symbol"))
    }
}

impl SymbolLookup for MockLookup {
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>> {
        if self.missing.iter().any(|missing| *missing == name) {
            return None;
        }
        let addr = match name {
            "FT_Init_FreeType" if self.failing_init => {
                init_freetype_failing as sys::InitFreeTypeFn as *const c_void
            }
            "FT_Init_FreeType" => init_freetype as sys::InitFreeTypeFn as *const c_void,
            "FT_Done_FreeType" => done_freetype as sys::DoneFreeTypeFn as *const c_void,
            "FT_Library_Version" => library_version as sys::LibraryVersionFn as *const c_void,
            "FT_Error_String" => error_string as sys::ErrorStringFn as *const c_void,
            "FT_New_Face" => new_face as sys::NewFaceFn as *const c_void,
            "FT_New_Memory_Face" => new_memory_face as sys::NewMemoryFaceFn as *const c_void,
            "FT_Done_Face" => done_face as sys::DoneFaceFn as *const c_void,
            "FT_Set_Char_Size" => set_char_size as sys::SetCharSizeFn as *const c_void,
            "FT_Set_Pixel_Sizes" => set_pixel_sizes as sys::SetPixelSizesFn as *const c_void,
            "FT_Select_Charmap" => select_charmap as sys::SelectCharmapFn as *const c_void,
            "FT_Set_Charmap" => set_charmap as sys::SetCharmapFn as *const c_void,
            _ => return None,
        };
        NonNull::new(addr as *mut c_void)
    }

    fn describe(&self) -> String {
        "<mock>".to_string()
    }
}

/// Binder over the complete mock
pub(crate) fn binder() -> Arc<Binder> {
    MockLookup::new().binder()
}

/// Times `FT_Done_FreeType` ran on `library`
pub(crate) fn library_done_calls(library: *mut c_void) -> usize {
    unsafe { (*(library as *const MockLibrary)).done_calls }
}

/// Times `FT_Done_Face` ran on `face`
pub(crate) fn face_done_calls(face: *mut c_void) -> usize {
    unsafe { (*(face as *const MockFace)).done_calls }
}

/// Buffer a memory face was opened from
pub(crate) fn face_source(face: *mut c_void) -> *const u8 {
    unsafe { (*(face as *const MockFace)).source }
}

/// Last size accepted by `FT_Set_Char_Size`, after zero defaults
pub(crate) fn char_size(face: *mut c_void) -> Option<(i64, i64, u32, u32)> {
    unsafe { (*(face as *const MockFace)).char_size }
}

/// Last size accepted by `FT_Set_Pixel_Sizes`
pub(crate) fn pixel_sizes(face: *mut c_void) -> Option<(u32, u32)> {
    unsafe { (*(face as *const MockFace)).pixel_sizes }
}

/// Make the next `FT_Done_FreeType` on `library` return `code`
pub(crate) fn fail_library_teardown(library: *mut c_void, code: FT_Error) {
    unsafe { (*(library as *mut MockLibrary)).fail_with = code }
}

/// Make the next call on `face` (sizing, charmaps or teardown) return `code`
pub(crate) fn fail_next_face_call(face: *mut c_void, code: FT_Error) {
    unsafe { (*(face as *mut MockFace)).fail_with = code }
}

/// A charmap record claiming to belong to `face`, outside any face's table
pub(crate) fn stray_charmap(face: *mut c_void) -> *mut c_void {
    Box::into_raw(Box::new(RawCharMap { face, encoding: UNIC, platform_id: 3, encoding_id: 1 }))
        as *mut c_void
}
