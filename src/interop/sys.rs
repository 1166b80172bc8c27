//! FreeType C API surface consumed by the binder
//!
//! Type aliases follow `fttypes.h`; each entry point has a typed function
//! pointer alias and a `SymbolSpec` carrying its declared C signature.
#![allow(non_camel_case_types)]

use super::types::{FfiType, HasFfiType, Signature};
use core::ffi::{c_char, c_int, c_long, c_uint, c_void};

pub type FT_Error = c_int;
pub type FT_Int = c_int;
pub type FT_UInt = c_uint;
pub type FT_Long = c_long;
pub type FT_F26Dot6 = c_long;
pub type FT_Encoding = c_int;
pub type FT_Library = *mut c_void;
pub type FT_Face = *mut c_void;
pub type FT_CharMap = *mut c_void;

pub type InitFreeTypeFn = unsafe extern "C" fn(*mut FT_Library) -> FT_Error;
pub type DoneFreeTypeFn = unsafe extern "C" fn(FT_Library) -> FT_Error;
pub type LibraryVersionFn = unsafe extern "C" fn(FT_Library, *mut FT_Int, *mut FT_Int, *mut FT_Int);
pub type ErrorStringFn = unsafe extern "C" fn(FT_Error) -> *const c_char;
pub type NewFaceFn = unsafe extern "C" fn(FT_Library, *const c_char, FT_Long, *mut FT_Face) -> FT_Error;
pub type NewMemoryFaceFn =
    unsafe extern "C" fn(FT_Library, *const u8, FT_Long, FT_Long, *mut FT_Face) -> FT_Error;
pub type DoneFaceFn = unsafe extern "C" fn(FT_Face) -> FT_Error;
pub type SetCharSizeFn =
    unsafe extern "C" fn(FT_Face, FT_F26Dot6, FT_F26Dot6, FT_UInt, FT_UInt) -> FT_Error;
pub type SetPixelSizesFn = unsafe extern "C" fn(FT_Face, FT_UInt, FT_UInt) -> FT_Error;
pub type SelectCharmapFn = unsafe extern "C" fn(FT_Face, FT_Encoding) -> FT_Error;
pub type SetCharmapFn = unsafe extern "C" fn(FT_Face, FT_CharMap) -> FT_Error;

/// Whether binding may proceed without a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    /// Feature-detected; absence is recorded, not fatal
    Optional,
}

/// Declared entry point
#[derive(Debug, Clone, Copy)]
pub struct SymbolSpec {
    pub name: &'static str,
    pub signature: Signature,
    pub requirement: Requirement,
}

impl SymbolSpec {
    const fn required(name: &'static str, signature: Signature) -> Self {
        Self { name, signature, requirement: Requirement::Required }
    }

    const fn optional(name: &'static str, signature: Signature) -> Self {
        Self { name, signature, requirement: Requirement::Optional }
    }
}

const INT: FfiType = <FT_Int as HasFfiType>::FFI_TYPE;
const UINT: FfiType = <FT_UInt as HasFfiType>::FFI_TYPE;
const LONG: FfiType = <FT_Long as HasFfiType>::FFI_TYPE;
const PTR: FfiType = FfiType::Pointer;
const VOID: FfiType = FfiType::Void;

pub const INIT_FREETYPE: SymbolSpec =
    SymbolSpec::required("FT_Init_FreeType", Signature::new(INT, &[PTR]));
pub const DONE_FREETYPE: SymbolSpec =
    SymbolSpec::required("FT_Done_FreeType", Signature::new(INT, &[PTR]));
pub const LIBRARY_VERSION: SymbolSpec =
    SymbolSpec::required("FT_Library_Version", Signature::new(VOID, &[PTR, PTR, PTR, PTR]));
pub const ERROR_STRING: SymbolSpec =
    SymbolSpec::optional("FT_Error_String", Signature::new(PTR, &[INT]));
pub const NEW_FACE: SymbolSpec =
    SymbolSpec::required("FT_New_Face", Signature::new(INT, &[PTR, PTR, LONG, PTR]));
pub const NEW_MEMORY_FACE: SymbolSpec =
    SymbolSpec::required("FT_New_Memory_Face", Signature::new(INT, &[PTR, PTR, LONG, LONG, PTR]));
pub const DONE_FACE: SymbolSpec =
    SymbolSpec::required("FT_Done_Face", Signature::new(INT, &[PTR]));
pub const SET_CHAR_SIZE: SymbolSpec =
    SymbolSpec::required("FT_Set_Char_Size", Signature::new(INT, &[PTR, LONG, LONG, UINT, UINT]));
pub const SET_PIXEL_SIZES: SymbolSpec =
    SymbolSpec::required("FT_Set_Pixel_Sizes", Signature::new(INT, &[PTR, UINT, UINT]));
pub const SELECT_CHARMAP: SymbolSpec =
    SymbolSpec::required("FT_Select_Charmap", Signature::new(INT, &[PTR, INT]));
pub const SET_CHARMAP: SymbolSpec =
    SymbolSpec::required("FT_Set_Charmap", Signature::new(INT, &[PTR, PTR]));

/// Every entry point the binder resolves
pub const ALL: &[SymbolSpec] = &[
    INIT_FREETYPE,
    DONE_FREETYPE,
    LIBRARY_VERSION,
    ERROR_STRING,
    NEW_FACE,
    NEW_MEMORY_FACE,
    DONE_FACE,
    SET_CHAR_SIZE,
    SET_PIXEL_SIZES,
    SELECT_CHARMAP,
    SET_CHARMAP,
];
