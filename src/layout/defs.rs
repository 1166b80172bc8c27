//! FreeType record declarations
//!
//! Field order and semantic types follow `freetype.h` / `fttypes.h`.
//! `FT_FaceRec` is described up to `charmap`; the private members after it
//! are never read.

use super::{FieldDef, FieldType, StructDef};

use FieldType::{Long, Pointer, Struct, I16, I32, U16};

/// `FT_Generic`: client data plus its finalizer
pub static GENERIC: StructDef = StructDef {
    name: "FT_Generic",
    fields: &[
        FieldDef::new("data", Pointer),
        FieldDef::new("finalizer", Pointer),
    ],
};

/// `FT_BBox`: four `FT_Pos` bounds
pub static BBOX: StructDef = StructDef {
    name: "FT_BBox",
    fields: &[
        FieldDef::new("xMin", Long),
        FieldDef::new("yMin", Long),
        FieldDef::new("xMax", Long),
        FieldDef::new("yMax", Long),
    ],
};

/// `FT_CharMapRec`
pub static CHARMAP: StructDef = StructDef {
    name: "FT_CharMapRec",
    fields: &[
        FieldDef::new("face", Pointer),
        FieldDef::new("encoding", I32),
        FieldDef::new("platform_id", U16),
        FieldDef::new("encoding_id", U16),
    ],
};

/// `FT_Bitmap_Size`: one entry of `FT_FaceRec::available_sizes`
pub static BITMAP_SIZE: StructDef = StructDef {
    name: "FT_Bitmap_Size",
    fields: &[
        FieldDef::new("height", I16),
        FieldDef::new("width", I16),
        FieldDef::new("size", Long),
        FieldDef::new("x_ppem", Long),
        FieldDef::new("y_ppem", Long),
    ],
};

/// `FT_FaceRec` (public part)
pub static FACE: StructDef = StructDef {
    name: "FT_FaceRec",
    fields: &[
        FieldDef::new("num_faces", Long),
        FieldDef::new("face_index", Long),
        FieldDef::new("face_flags", Long),
        FieldDef::new("style_flags", Long),
        FieldDef::new("num_glyphs", Long),
        FieldDef::new("family_name", Pointer),
        FieldDef::new("style_name", Pointer),
        // FT_Int count, padded before the following pointer on 64-bit
        FieldDef::new("num_fixed_sizes", I32),
        FieldDef::new("available_sizes", Pointer),
        FieldDef::new("num_charmaps", I32),
        FieldDef::new("charmaps", Pointer),
        FieldDef::new("generic", Struct(&GENERIC)),
        FieldDef::new("bbox", Struct(&BBOX)),
        FieldDef::new("units_per_EM", U16),
        FieldDef::new("ascender", I16),
        FieldDef::new("descender", I16),
        FieldDef::new("height", I16),
        FieldDef::new("max_advance_width", I16),
        FieldDef::new("max_advance_height", I16),
        FieldDef::new("underline_position", I16),
        FieldDef::new("underline_thickness", I16),
        FieldDef::new("glyph", Pointer),
        FieldDef::new("size", Pointer),
        FieldDef::new("charmap", Pointer),
    ],
};
