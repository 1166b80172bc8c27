//! Layout table tests
//!
//! Known offsets per data model, agreement with the compiler's own
//! `#[repr(C)]` layout on the host, and typed reads through `StructView`.

use super::*;
use crate::interop::mock::{RawBBox, RawBitmapSize, RawCharMap, RawFace, RawGeneric};
use core::ffi::c_void;
use core::mem::{offset_of, size_of};
use core::ptr::NonNull;
use std::ffi::CString;

// ===== Per-model offsets =====

#[test]
fn face_offsets_lp64() {
    let table = LayoutTable::for_model(DataModel::Lp64);
    let face = table.face();

    assert_eq!(face.offset_of("num_faces"), 0);
    assert_eq!(face.offset_of("num_glyphs"), 32);
    assert_eq!(face.offset_of("family_name"), 40);
    assert_eq!(face.offset_of("style_name"), 48);
    assert_eq!(face.offset_of("num_fixed_sizes"), 56);
    assert_eq!(face.offset_of("available_sizes"), 64);
    assert_eq!(face.offset_of("num_charmaps"), 72);
    assert_eq!(face.offset_of("charmaps"), 80);
    assert_eq!(face.offset_of("generic"), 88);
    assert_eq!(face.offset_of("bbox"), 104);
    assert_eq!(face.offset_of("units_per_EM"), 136);
    assert_eq!(face.offset_of("underline_thickness"), 150);
    assert_eq!(face.offset_of("glyph"), 152);
    assert_eq!(face.offset_of("size"), 160);
    assert_eq!(face.offset_of("charmap"), 168);
    assert_eq!(face.size, 176);
}

#[test]
fn face_padding_after_counts_lp64() {
    let table = LayoutTable::for_model(DataModel::Lp64);
    let face = table.face();

    assert_eq!(face.field("available_sizes").map(|f| f.padding_before), Some(4));
    assert_eq!(face.field("charmaps").map(|f| f.padding_before), Some(4));
    assert_eq!(face.field("family_name").map(|f| f.padding_before), Some(0));
}

#[test]
fn face_offsets_llp64() {
    let table = LayoutTable::for_model(DataModel::Llp64);
    let face = table.face();

    assert_eq!(face.offset_of("num_glyphs"), 16);
    assert_eq!(face.offset_of("family_name"), 24);
    assert_eq!(face.offset_of("num_fixed_sizes"), 40);
    assert_eq!(face.offset_of("available_sizes"), 48);
    assert_eq!(face.offset_of("charmaps"), 64);
    assert_eq!(face.offset_of("bbox"), 88);
    assert_eq!(face.offset_of("units_per_EM"), 104);
    assert_eq!(face.offset_of("glyph"), 120);
    assert_eq!(face.offset_of("charmap"), 136);
    assert_eq!(face.size, 144);
}

#[test]
fn face_offsets_ilp32() {
    let table = LayoutTable::for_model(DataModel::Ilp32);
    let face = table.face();

    assert_eq!(face.offset_of("family_name"), 20);
    assert_eq!(face.offset_of("available_sizes"), 32);
    assert_eq!(face.offset_of("charmaps"), 40);
    assert_eq!(face.offset_of("bbox"), 52);
    assert_eq!(face.offset_of("units_per_EM"), 68);
    assert_eq!(face.offset_of("glyph"), 84);
    assert_eq!(face.size, 96);
}

#[test]
fn charmap_and_bitmap_size_per_model() {
    let lp64 = LayoutTable::for_model(DataModel::Lp64);
    assert_eq!(lp64.charmap().offset_of("encoding"), 8);
    assert_eq!(lp64.charmap().offset_of("platform_id"), 12);
    assert_eq!(lp64.charmap().offset_of("encoding_id"), 14);
    assert_eq!(lp64.charmap().size, 16);
    assert_eq!(lp64.bitmap_size().offset_of("size"), 8);
    assert_eq!(lp64.bitmap_size().size, 32);
    assert_eq!(lp64.bbox().size, 32);

    let llp64 = LayoutTable::for_model(DataModel::Llp64);
    assert_eq!(llp64.charmap().size, 16);
    assert_eq!(llp64.bitmap_size().offset_of("size"), 4);
    assert_eq!(llp64.bitmap_size().size, 16);
    assert_eq!(llp64.bbox().size, 16);

    let ilp32 = LayoutTable::for_model(DataModel::Ilp32);
    assert_eq!(ilp32.charmap().offset_of("encoding"), 4);
    assert_eq!(ilp32.charmap().size, 12);
}

#[test]
fn dotted_paths_reach_nested_fields() {
    let table = LayoutTable::for_model(DataModel::Lp64);

    assert_eq!(table.face().offset_of("bbox.xMax"), 120);
    assert_eq!(table.face().offset_of("generic.finalizer"), 96);
    assert_eq!(table.offset_of("FT_FaceRec", "bbox.yMin"), 112);
    assert!(table.face().resolve("num_faces.inner").is_none());
}

#[test]
#[should_panic(expected = "has no field")]
fn unknown_field_is_a_programming_error() {
    host().face().offset_of("kerning_pairs");
}

#[test]
#[should_panic(expected = "no layout described")]
fn unknown_structure_is_a_programming_error() {
    host().offset_of("FT_GlyphSlotRec", "advance");
}

// ===== Host agreement with #[repr(C)] =====

#[test]
fn host_table_matches_repr_c_face() {
    let face = host().face();

    assert_eq!(face.offset_of("num_faces"), offset_of!(RawFace, num_faces));
    assert_eq!(face.offset_of("num_glyphs"), offset_of!(RawFace, num_glyphs));
    assert_eq!(face.offset_of("family_name"), offset_of!(RawFace, family_name));
    assert_eq!(face.offset_of("style_name"), offset_of!(RawFace, style_name));
    assert_eq!(face.offset_of("num_fixed_sizes"), offset_of!(RawFace, num_fixed_sizes));
    assert_eq!(face.offset_of("available_sizes"), offset_of!(RawFace, available_sizes));
    assert_eq!(face.offset_of("num_charmaps"), offset_of!(RawFace, num_charmaps));
    assert_eq!(face.offset_of("charmaps"), offset_of!(RawFace, charmaps));
    assert_eq!(face.offset_of("generic"), offset_of!(RawFace, generic));
    assert_eq!(face.offset_of("bbox"), offset_of!(RawFace, bbox));
    assert_eq!(face.offset_of("units_per_EM"), offset_of!(RawFace, units_per_em));
    assert_eq!(face.offset_of("underline_thickness"), offset_of!(RawFace, underline_thickness));
    assert_eq!(face.offset_of("glyph"), offset_of!(RawFace, glyph));
    assert_eq!(face.offset_of("size"), offset_of!(RawFace, size));
    assert_eq!(face.offset_of("charmap"), offset_of!(RawFace, charmap));
}

#[test]
fn host_table_matches_repr_c_records() {
    let table = host();

    assert_eq!(table.generic().size, size_of::<RawGeneric>());
    assert_eq!(table.bbox().size, size_of::<RawBBox>());
    assert_eq!(table.bbox().offset_of("yMax"), offset_of!(RawBBox, y_max));
    assert_eq!(table.charmap().size, size_of::<RawCharMap>());
    assert_eq!(table.charmap().offset_of("encoding"), offset_of!(RawCharMap, encoding));
    assert_eq!(table.charmap().offset_of("encoding_id"), offset_of!(RawCharMap, encoding_id));
    assert_eq!(table.bitmap_size().size, size_of::<RawBitmapSize>());
    assert_eq!(table.bitmap_size().offset_of("y_ppem"), offset_of!(RawBitmapSize, y_ppem));
}

// ===== StructView reads =====

#[test]
fn view_reads_typed_fields() {
    let family = CString::new("Test Sans").unwrap();
    let mut raw = RawFace::zeroed();
    raw.num_faces = 3;
    raw.num_glyphs = 2030;
    raw.family_name = family.as_ptr();
    raw.num_charmaps = 4;
    raw.units_per_em = 1950;
    raw.descender = -480;
    raw.bbox = RawBBox { x_min: -10, y_min: -20, x_max: 300, y_max: 400 };

    let base = NonNull::from(&raw).cast::<u8>();
    let view = unsafe { StructView::new(base, host().face()) };

    assert_eq!(view.size(), host().face().size);
    assert_eq!(view.read_long("num_faces"), 3);
    assert_eq!(view.read_long("num_glyphs"), 2030);
    assert_eq!(view.read_i32("num_charmaps"), 4);
    assert_eq!(view.read_u16("units_per_EM"), 1950);
    assert_eq!(view.read_i16("descender"), -480);
    assert_eq!(unsafe { view.read_c_string("family_name") }.as_deref(), Some("Test Sans"));
    assert_eq!(unsafe { view.read_c_string("style_name") }, None);
    assert_eq!(view.read_long("bbox.xMin"), -10);

    let bbox = view.nested("bbox", host().bbox());
    assert_eq!(bbox.read_long("yMax"), 400);
    assert_eq!(bbox.base().as_ptr() as usize - base.as_ptr() as usize, host().face().offset_of("bbox"));
}

#[test]
#[should_panic(expected = "has type")]
fn view_rejects_mismatched_width() {
    let raw = RawFace::zeroed();
    let view = unsafe { StructView::new(NonNull::from(&raw).cast(), host().face()) };
    view.read_i32("num_glyphs");
}

#[test]
fn pointer_array_handles_empty_and_null() {
    let empty = unsafe { pointer_array(core::ptr::null(), 5) };
    assert!(empty.is_empty());

    let items: [*mut c_void; 2] = [0x10 as *mut c_void, 0x20 as *mut c_void];
    let slice = unsafe { pointer_array(items.as_ptr() as *const c_void, 2) };
    assert_eq!(slice, &items);
}

#[test]
fn struct_array_steps_by_layout_size() {
    let sizes = [
        RawBitmapSize { height: 12, width: 6, size: 768, x_ppem: 768, y_ppem: 768 },
        RawBitmapSize { height: 16, width: 8, size: 1024, x_ppem: 1024, y_ppem: 1024 },
    ];
    let views = unsafe { struct_array(sizes.as_ptr() as *const c_void, 2, host().bitmap_size()) };

    assert_eq!(views.len(), 2);
    assert_eq!(views[1].read_i16("height"), 16);
    assert_eq!(views[1].read_long("y_ppem"), 1024);
}

#[test]
fn layout_display_lists_fields() {
    let rendered = host().charmap().to_string();
    assert!(rendered.starts_with("FT_CharMapRec"));
    assert!(rendered.contains("platform_id"));
}
