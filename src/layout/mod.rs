//! Layout descriptors - binary shape of the native FreeType structures
//!
//! Design: Every structure is declared once as an ordered field list
//! (`StructDef`). Offsets are never written by hand; they are accumulated
//! from field sizes and natural alignment for a given `DataModel`, the same
//! way a C compiler lays out a `struct`.
//!
//! Architecture:
//! - `defs.rs` - declarations of the FreeType records we read
//! - `marshal.rs` - typed reads over foreign memory (`StructView`)

mod defs;
mod marshal;

#[cfg(test)]
mod tests;

pub use defs::{BBOX, BITMAP_SIZE, CHARMAP, FACE, GENERIC};
pub use marshal::{pointer_array, struct_array, StructView};

use once_cell::sync::Lazy;
use std::fmt;

/// C data model of a target: widths of `long` and of pointers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataModel {
    /// Unix 64-bit: 8-byte long, 8-byte pointer
    Lp64,
    /// Windows 64-bit: 4-byte long, 8-byte pointer
    Llp64,
    /// 32-bit targets: 4-byte long, 4-byte pointer
    Ilp32,
}

impl DataModel {
    /// Data model of the target this crate was compiled for
    #[inline]
    pub const fn host() -> Self {
        #[cfg(all(target_pointer_width = "64", windows))]
        return Self::Llp64;

        #[cfg(all(target_pointer_width = "64", not(windows)))]
        return Self::Lp64;

        #[cfg(not(target_pointer_width = "64"))]
        return Self::Ilp32;
    }

    #[inline]
    pub const fn pointer_size(self) -> usize {
        match self {
            Self::Lp64 | Self::Llp64 => 8,
            Self::Ilp32 => 4,
        }
    }

    #[inline]
    pub const fn long_size(self) -> usize {
        match self {
            Self::Lp64 => 8,
            Self::Llp64 | Self::Ilp32 => 4,
        }
    }
}

/// Semantic type of a structure field
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    /// C `long` (`FT_Long`, `FT_Pos`, `FT_Fixed`)
    Long,
    /// C `unsigned long`
    ULong,
    Pointer,
    Struct(&'static StructDef),
    /// Explicit filler bytes
    Padding(usize),
}

impl FieldType {
    /// Size in bytes under `model`
    pub fn size(self, model: DataModel) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 => 4,
            Self::I64 | Self::U64 => 8,
            Self::Long | Self::ULong => model.long_size(),
            Self::Pointer => model.pointer_size(),
            Self::Struct(def) => StructLayout::compute(def, model).size,
            Self::Padding(n) => n,
        }
    }

    /// Alignment requirement under `model`
    pub fn align(self, model: DataModel) -> usize {
        match self {
            Self::Long | Self::ULong => model.long_size(),
            Self::Pointer => model.pointer_size(),
            Self::Struct(def) => StructLayout::compute(def, model).align,
            Self::Padding(_) => 1,
            other => other.size(model),
        }
    }

    /// Whether reads of this field sign-extend
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Long)
    }

    /// Check if type is an integer of any width
    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::U8 | Self::I16 | Self::U16 | Self::I32 | Self::U32
                | Self::I64 | Self::U64 | Self::Long | Self::ULong
        )
    }
}

/// Declared field: name plus semantic type
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
}

impl FieldDef {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// Declared structure: C name plus ordered fields
#[derive(Debug)]
pub struct StructDef {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
}

/// Field placed at a concrete offset
#[derive(Debug, Clone)]
pub struct FieldLayout {
    pub name: &'static str,
    pub ty: FieldType,
    pub offset: usize,
    pub size: usize,
    pub align: usize,
    /// Implicit padding inserted before this field
    pub padding_before: usize,
}

/// Structure with every field placed
#[derive(Debug, Clone)]
pub struct StructLayout {
    pub name: &'static str,
    pub model: DataModel,
    pub fields: Vec<FieldLayout>,
    pub size: usize,
    pub align: usize,
}

impl StructLayout {
    /// Place fields in declaration order with natural alignment, then pad the
    /// tail to a multiple of the structure alignment.
    pub fn compute(def: &'static StructDef, model: DataModel) -> Self {
        let mut fields = Vec::with_capacity(def.fields.len());
        let mut offset = 0usize;
        let mut align = 1usize;

        for field in def.fields {
            let size = field.ty.size(model);
            let field_align = field.ty.align(model);
            let aligned = align_up(offset, field_align);

            fields.push(FieldLayout {
                name: field.name,
                ty: field.ty,
                offset: aligned,
                size,
                align: field_align,
                padding_before: aligned - offset,
            });

            offset = aligned + size;
            align = align.max(field_align);
        }

        Self {
            name: def.name,
            model,
            fields,
            size: align_up(offset, align),
            align,
        }
    }

    /// Look up a direct field
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name && !matches!(f.ty, FieldType::Padding(_)))
    }

    /// Resolve a dotted path (`"bbox.xMin"`) to the innermost field and its
    /// absolute offset.
    pub fn resolve(&self, path: &str) -> Option<(usize, FieldLayout)> {
        let mut segments = path.split('.');
        let first = self.field(segments.next()?)?.clone();
        let mut base = first.offset;
        let mut current = first;

        for segment in segments {
            let FieldType::Struct(def) = current.ty else {
                return None;
            };
            let nested = StructLayout::compute(def, self.model);
            let inner = nested.field(segment)?.clone();
            base += inner.offset;
            current = inner;
        }

        Some((base, current))
    }

    /// Byte offset of a (possibly dotted) field path
    ///
    /// # Panics
    /// An unknown field is a programming error in the binding itself.
    pub fn offset_of(&self, path: &str) -> usize {
        match self.resolve(path) {
            Some((offset, _)) => offset,
            None => panic!("{} has no field `{}`", self.name, path),
        }
    }

    /// Field descriptor for a (possibly dotted) path
    ///
    /// # Panics
    /// Same contract as [`StructLayout::offset_of`].
    pub fn field_at(&self, path: &str) -> (usize, FieldLayout) {
        match self.resolve(path) {
            Some(found) => found,
            None => panic!("{} has no field `{}`", self.name, path),
        }
    }
}

impl fmt::Display for StructLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({:?}, size {}, align {})", self.name, self.model, self.size, self.align)?;
        for field in &self.fields {
            writeln!(f, "  {:>4} {:<22} {:?} [{}]", field.offset, field.name, field.ty, field.size)?;
        }
        Ok(())
    }
}

/// Every described structure, computed for one data model
#[derive(Debug)]
pub struct LayoutTable {
    model: DataModel,
    generic: StructLayout,
    bbox: StructLayout,
    charmap: StructLayout,
    bitmap_size: StructLayout,
    face: StructLayout,
}

impl LayoutTable {
    pub fn for_model(model: DataModel) -> Self {
        Self {
            model,
            generic: StructLayout::compute(&GENERIC, model),
            bbox: StructLayout::compute(&BBOX, model),
            charmap: StructLayout::compute(&CHARMAP, model),
            bitmap_size: StructLayout::compute(&BITMAP_SIZE, model),
            face: StructLayout::compute(&FACE, model),
        }
    }

    #[inline]
    pub fn model(&self) -> DataModel {
        self.model
    }

    #[inline]
    pub fn generic(&self) -> &StructLayout {
        &self.generic
    }

    #[inline]
    pub fn bbox(&self) -> &StructLayout {
        &self.bbox
    }

    #[inline]
    pub fn charmap(&self) -> &StructLayout {
        &self.charmap
    }

    #[inline]
    pub fn bitmap_size(&self) -> &StructLayout {
        &self.bitmap_size
    }

    #[inline]
    pub fn face(&self) -> &StructLayout {
        &self.face
    }

    /// Find a layout by its C structure name
    pub fn by_name(&self, name: &str) -> Option<&StructLayout> {
        [&self.generic, &self.bbox, &self.charmap, &self.bitmap_size, &self.face]
            .into_iter()
            .find(|layout| layout.name == name)
    }

    /// `offsetOf(structure, field)` over this table
    ///
    /// # Panics
    /// Unknown structures or fields are programming errors.
    pub fn offset_of(&self, structure: &str, path: &str) -> usize {
        match self.by_name(structure) {
            Some(layout) => layout.offset_of(path),
            None => panic!("no layout described for `{}`", structure),
        }
    }
}

static HOST: Lazy<LayoutTable> = Lazy::new(|| LayoutTable::for_model(DataModel::host()));

/// Layout table for the running target
#[inline]
pub fn host() -> &'static LayoutTable {
    &HOST
}

#[inline]
const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) / align * align
}
