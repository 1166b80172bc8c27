//! Typed reads over foreign memory
//!
//! Design: A `StructView` pairs a foreign address with the layout it is
//! reinterpreted as. Every read goes through the layout, is bounds-checked
//! against the layout size, and uses unaligned loads so a misplaced view
//! reads garbage instead of faulting on alignment.

use super::{DataModel, FieldLayout, FieldType, StructLayout};
use core::ffi::c_void;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};
use std::ffi::CStr;

/// Foreign memory region reinterpreted as exactly one structure
#[derive(Clone, Copy)]
pub struct StructView<'a> {
    base: NonNull<u8>,
    layout: &'a StructLayout,
    _memory: PhantomData<&'a [u8]>,
}

impl<'a> StructView<'a> {
    /// Reinterpret `base` as `layout`
    ///
    /// # Safety
    /// `base` must point to at least `layout.size` readable bytes that stay
    /// valid for `'a`, laid out for the host data model.
    pub unsafe fn new(base: NonNull<u8>, layout: &'a StructLayout) -> Self {
        assert_eq!(
            layout.model,
            DataModel::host(),
            "{} is described for {:?}, cannot read it on this target",
            layout.name,
            layout.model
        );
        Self { base, layout, _memory: PhantomData }
    }

    #[inline]
    pub fn base(&self) -> NonNull<u8> {
        self.base
    }

    #[inline]
    pub fn layout(&self) -> &'a StructLayout {
        self.layout
    }

    /// Size of the reinterpreted region
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size
    }

    /// Address of a field inside the region
    pub fn field_ptr(&self, path: &str) -> NonNull<u8> {
        let (offset, field) = self.layout.field_at(path);
        self.at(offset, &field)
    }

    /// Read any integer field, sign- or zero-extended to `i64`
    pub fn read_int(&self, path: &str) -> i64 {
        let (offset, field) = self.layout.field_at(path);
        assert!(
            field.ty.is_integral(),
            "{}.{} is {:?}, not an integer",
            self.layout.name,
            path,
            field.ty
        );
        let ptr = self.at(offset, &field);
        unsafe { read_integer(ptr.as_ptr(), field.size, field.ty.is_signed()) }
    }

    /// Read a C `long` field
    #[inline]
    pub fn read_long(&self, path: &str) -> i64 {
        self.expect_type(path, |ty| matches!(ty, FieldType::Long));
        self.read_int(path)
    }

    #[inline]
    pub fn read_i32(&self, path: &str) -> i32 {
        self.expect_type(path, |ty| matches!(ty, FieldType::I32));
        self.read_int(path) as i32
    }

    #[inline]
    pub fn read_i16(&self, path: &str) -> i16 {
        self.expect_type(path, |ty| matches!(ty, FieldType::I16));
        self.read_int(path) as i16
    }

    #[inline]
    pub fn read_u16(&self, path: &str) -> u16 {
        self.expect_type(path, |ty| matches!(ty, FieldType::U16));
        self.read_int(path) as u16
    }

    /// Read a pointer field
    pub fn read_ptr(&self, path: &str) -> *mut c_void {
        let (offset, field) = self.layout.field_at(path);
        assert!(
            matches!(field.ty, FieldType::Pointer),
            "{}.{} is {:?}, not a pointer",
            self.layout.name,
            path,
            field.ty
        );
        let ptr = self.at(offset, &field);
        unsafe { ptr::read_unaligned(ptr.as_ptr() as *const *mut c_void) }
    }

    /// Read a `char *` field as an owned string, `None` for the null address
    ///
    /// # Safety
    /// A non-null pointer stored in the field must reference a NUL-terminated
    /// string valid for the duration of the call.
    pub unsafe fn read_c_string(&self, path: &str) -> Option<String> {
        let raw = self.read_ptr(path);
        if raw.is_null() {
            return None;
        }
        Some(CStr::from_ptr(raw as *const _).to_string_lossy().into_owned())
    }

    /// View an embedded structure field through `nested`
    pub fn nested(&self, path: &str, nested: &'a StructLayout) -> StructView<'a> {
        let (offset, field) = self.layout.field_at(path);
        match field.ty {
            FieldType::Struct(def) if def.name == nested.name => {}
            other => panic!(
                "{}.{} is {:?}, cannot view it as {}",
                self.layout.name, path, other, nested.name
            ),
        }
        let base = self.at(offset, &field);
        StructView { base, layout: nested, _memory: PhantomData }
    }

    fn expect_type(&self, path: &str, check: impl Fn(FieldType) -> bool) {
        let (_, field) = self.layout.field_at(path);
        assert!(
            check(field.ty),
            "{}.{} has type {:?}",
            self.layout.name,
            path,
            field.ty
        );
    }

    fn at(&self, offset: usize, field: &FieldLayout) -> NonNull<u8> {
        assert!(
            offset + field.size <= self.layout.size,
            "{}.{} lies outside the {}-byte region",
            self.layout.name,
            field.name,
            self.layout.size
        );
        // In bounds of the region the caller vouched for in `new`
        unsafe { NonNull::new_unchecked(self.base.as_ptr().add(offset)) }
    }
}

impl core::fmt::Debug for StructView<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StructView")
            .field("layout", &self.layout.name)
            .field("base", &self.base)
            .field("size", &self.layout.size)
            .finish()
    }
}

/// Borrow a native array of `count` pointers
///
/// # Safety
/// `base` must reference `count` initialized, pointer-aligned pointers valid
/// for `'a`. A null `base` is accepted only with `count == 0`.
pub unsafe fn pointer_array<'a>(base: *const c_void, count: usize) -> &'a [*mut c_void] {
    if count == 0 || base.is_null() {
        return &[];
    }
    core::slice::from_raw_parts(base as *const *mut c_void, count)
}

/// Views over a native array of `count` structures laid out as `layout`
///
/// # Safety
/// `base` must reference `count * layout.size` readable bytes valid for `'a`.
pub unsafe fn struct_array<'a>(
    base: *const c_void,
    count: usize,
    layout: &'a StructLayout,
) -> Vec<StructView<'a>> {
    let Some(base) = NonNull::new(base as *mut u8) else {
        return Vec::new();
    };
    (0..count)
        .map(|i| StructView::new(NonNull::new_unchecked(base.as_ptr().add(i * layout.size)), layout))
        .collect()
}

unsafe fn read_integer(ptr: *const u8, size: usize, signed: bool) -> i64 {
    match (size, signed) {
        (1, true) => ptr::read_unaligned(ptr as *const i8) as i64,
        (1, false) => ptr::read_unaligned(ptr) as i64,
        (2, true) => ptr::read_unaligned(ptr as *const i16) as i64,
        (2, false) => ptr::read_unaligned(ptr as *const u16) as i64,
        (4, true) => ptr::read_unaligned(ptr as *const i32) as i64,
        (4, false) => ptr::read_unaligned(ptr as *const u32) as i64,
        (8, _) => ptr::read_unaligned(ptr as *const i64),
        _ => unreachable!("no {}-byte integer type", size),
    }
}
