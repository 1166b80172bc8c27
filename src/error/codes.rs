//! Native result codes
//!
//! Mirrors `fterrdef.h`. Codes are unique; lookups are a linear scan over a
//! table of under a hundred entries.

use std::fmt;

/// Range a result code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Generic,
    GlyphCharacter,
    Handle,
    Driver,
    Memory,
    Stream,
    Raster,
    Cache,
    TrueType,
    Cff,
    Bdf,
}

impl ErrorCategory {
    /// Category implied by the high nibble of a code
    pub const fn of_code(code: i32) -> Option<Self> {
        Some(match code {
            0x00..=0x0F => Self::Generic,
            0x10..=0x1F => Self::GlyphCharacter,
            0x20..=0x2F => Self::Handle,
            0x30..=0x3F => Self::Driver,
            0x40..=0x4F => Self::Memory,
            0x50..=0x5F => Self::Stream,
            0x60..=0x6F => Self::Raster,
            0x70..=0x7F => Self::Cache,
            0x80..=0x9F => Self::TrueType,
            0xA0..=0xAF => Self::Cff,
            0xB0..=0xBF => Self::Bdf,
            _ => return None,
        })
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generic => "generic",
            Self::GlyphCharacter => "glyph/character",
            Self::Handle => "handle",
            Self::Driver => "driver",
            Self::Memory => "memory",
            Self::Stream => "stream",
            Self::Raster => "raster",
            Self::Cache => "cache",
            Self::TrueType => "TrueType/SFNT",
            Self::Cff => "CFF/CID/Type 1",
            Self::Bdf => "BDF/PCF",
        };
        f.write_str(name)
    }
}

/// One entry of the static code table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub code: i32,
    pub name: &'static str,
    pub category: ErrorCategory,
    pub message: &'static str,
}

/// The designated success code
pub const OK: i32 = 0x00;

pub const CANNOT_OPEN_RESOURCE: i32 = 0x01;
pub const UNKNOWN_FILE_FORMAT: i32 = 0x02;
pub const INVALID_ARGUMENT: i32 = 0x06;
pub const INVALID_PIXEL_SIZE: i32 = 0x17;
pub const INVALID_HANDLE: i32 = 0x20;
pub const INVALID_LIBRARY_HANDLE: i32 = 0x21;
pub const INVALID_FACE_HANDLE: i32 = 0x23;
pub const INVALID_CHARMAP_HANDLE: i32 = 0x26;
pub const OUT_OF_MEMORY: i32 = 0x40;

macro_rules! table {
    ($($code:literal $name:ident $cat:ident $msg:literal;)*) => {
        &[$(ErrorDescriptor {
            code: $code,
            name: stringify!($name),
            category: ErrorCategory::$cat,
            message: $msg,
        }),*]
    };
}

pub static DESCRIPTORS: &[ErrorDescriptor] = table! {
    0x00 Ok Generic "no error";
    0x01 Cannot_Open_Resource Generic "cannot open resource";
    0x02 Unknown_File_Format Generic "unknown file format";
    0x03 Invalid_File_Format Generic "broken file";
    0x04 Invalid_Version Generic "invalid FreeType version";
    0x05 Lower_Module_Version Generic "module version is too low";
    0x06 Invalid_Argument Generic "invalid argument";
    0x07 Unimplemented_Feature Generic "unimplemented feature";
    0x08 Invalid_Table Generic "broken table";
    0x09 Invalid_Offset Generic "broken offset within table";
    0x0A Array_Too_Large Generic "array allocation size too large";
    0x0B Missing_Module Generic "missing module";
    0x0C Missing_Property Generic "missing property";

    0x10 Invalid_Glyph_Index GlyphCharacter "invalid glyph index";
    0x11 Invalid_Character_Code GlyphCharacter "invalid character code";
    0x12 Invalid_Glyph_Format GlyphCharacter "unsupported glyph image format";
    0x13 Cannot_Render_Glyph GlyphCharacter "cannot render this glyph format";
    0x14 Invalid_Outline GlyphCharacter "invalid outline";
    0x15 Invalid_Composite GlyphCharacter "invalid composite glyph";
    0x16 Too_Many_Hints GlyphCharacter "too many hints";
    0x17 Invalid_Pixel_Size GlyphCharacter "invalid pixel size";
    0x18 Invalid_SVG_Document GlyphCharacter "invalid SVG document";

    0x20 Invalid_Handle Handle "invalid object handle";
    0x21 Invalid_Library_Handle Handle "invalid library handle";
    0x22 Invalid_Driver_Handle Handle "invalid module handle";
    0x23 Invalid_Face_Handle Handle "invalid face handle";
    0x24 Invalid_Size_Handle Handle "invalid size handle";
    0x25 Invalid_Slot_Handle Handle "invalid glyph slot handle";
    0x26 Invalid_CharMap_Handle Handle "invalid charmap handle";
    0x27 Invalid_Cache_Handle Handle "invalid cache manager handle";
    0x28 Invalid_Stream_Handle Handle "invalid stream handle";

    0x30 Too_Many_Drivers Driver "too many modules";
    0x31 Too_Many_Extensions Driver "too many extensions";

    0x40 Out_Of_Memory Memory "out of memory";
    0x41 Unlisted_Object Memory "unlisted object";

    0x51 Cannot_Open_Stream Stream "cannot open stream";
    0x52 Invalid_Stream_Seek Stream "invalid stream seek";
    0x53 Invalid_Stream_Skip Stream "invalid stream skip";
    0x54 Invalid_Stream_Read Stream "invalid stream read";
    0x55 Invalid_Stream_Operation Stream "invalid stream operation";
    0x56 Invalid_Frame_Operation Stream "invalid frame operation";
    0x57 Nested_Frame_Access Stream "nested frame access";
    0x58 Invalid_Frame_Read Stream "invalid frame read";

    0x60 Raster_Uninitialized Raster "raster uninitialized";
    0x61 Raster_Corrupted Raster "raster corrupted";
    0x62 Raster_Overflow Raster "raster overflow";
    0x63 Raster_Negative_Height Raster "negative height while rastering";

    0x70 Too_Many_Caches Cache "too many registered caches";

    0x80 Invalid_Opcode TrueType "invalid opcode";
    0x81 Too_Few_Arguments TrueType "too few arguments";
    0x82 Stack_Overflow TrueType "stack overflow";
    0x83 Code_Overflow TrueType "code overflow";
    0x84 Bad_Argument TrueType "bad argument";
    0x85 Divide_By_Zero TrueType "division by zero";
    0x86 Invalid_Reference TrueType "invalid reference";
    0x87 Debug_OpCode TrueType "found debug opcode";
    0x88 ENDF_In_Exec_Stream TrueType "found ENDF opcode in execution stream";
    0x89 Nested_DEFS TrueType "nested DEFS";
    0x8A Invalid_CodeRange TrueType "invalid code range";
    0x8B Execution_Too_Long TrueType "execution context too long";
    0x8C Too_Many_Function_Defs TrueType "too many function definitions";
    0x8D Too_Many_Instruction_Defs TrueType "too many instruction definitions";
    0x8E Table_Missing TrueType "SFNT font table missing";
    0x8F Horiz_Header_Missing TrueType "horizontal header (hhea) table missing";
    0x90 Locations_Missing TrueType "locations (loca) table missing";
    0x91 Name_Table_Missing TrueType "name table missing";
    0x92 CMap_Table_Missing TrueType "character map (cmap) table missing";
    0x93 Hmtx_Table_Missing TrueType "horizontal metrics (hmtx) table missing";
    0x94 Post_Table_Missing TrueType "PostScript (post) table missing";
    0x95 Invalid_Horiz_Metrics TrueType "invalid horizontal metrics";
    0x96 Invalid_CharMap_Format TrueType "invalid character map (cmap) format";
    0x97 Invalid_PPem TrueType "invalid ppem value";
    0x98 Invalid_Vert_Metrics TrueType "invalid vertical metrics";
    0x99 Could_Not_Find_Context TrueType "could not find context";
    0x9A Invalid_Post_Table_Format TrueType "invalid PostScript (post) table format";
    0x9B Invalid_Post_Table TrueType "invalid PostScript (post) table";
    0x9C DEF_In_Glyf_Bytecode TrueType "found FDEF or IDEF opcode in glyf bytecode";
    0x9D Missing_Bitmap TrueType "missing bitmap in strike";
    0x9E Missing_SVG_Hooks TrueType "SVG hooks have not been set";

    0xA0 Syntax_Error Cff "opcode syntax error";
    0xA1 Stack_Underflow Cff "argument stack underflow";
    0xA2 Ignore Cff "ignore";
    0xA3 No_Unicode_Glyph_Name Cff "no Unicode glyph name found";
    0xA4 Glyph_Too_Big Cff "glyph too big for hinting";

    0xB0 Missing_Startfont_Field Bdf "`STARTFONT' field missing";
    0xB1 Missing_Font_Field Bdf "`FONT' field missing";
    0xB2 Missing_Size_Field Bdf "`SIZE' field missing";
    0xB3 Missing_Fontboundingbox_Field Bdf "`FONTBOUNDINGBOX' field missing";
    0xB4 Missing_Chars_Field Bdf "`CHARS' field missing";
    0xB5 Missing_Startchar_Field Bdf "`STARTCHAR' field missing";
    0xB6 Missing_Encoding_Field Bdf "`ENCODING' field missing";
    0xB7 Missing_Bbx_Field Bdf "`BBX' field missing";
    0xB8 Bbx_Too_Big Bdf "`BBX' too big";
    0xB9 Corrupted_Font_Header Bdf "Font header corrupted or missing fields";
    0xBA Corrupted_Font_Glyphs Bdf "Font glyphs corrupted or missing fields";
};

/// Look up a code in the static table
pub fn describe(code: i32) -> Option<&'static ErrorDescriptor> {
    DESCRIPTORS.iter().find(|d| d.code == code)
}
