//! Bounding box view - the `bbox` embedded in a face record

use crate::error::Result;
use crate::face::Face;
use crate::layout::{self, StructView};
use crate::lifecycle::{HandleKind, NativeHandle};
use core::ffi::c_void;
use std::fmt;

/// Plain copy of a bounding box, in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    pub x_min: i64,
    pub y_min: i64,
    pub x_max: i64,
    pub y_max: i64,
}

impl Bounds {
    #[inline]
    pub fn width(&self) -> i64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.y_max - self.y_min
    }
}

/// Borrowed view of a face's `FT_BBox`
pub struct BBox<'a> {
    handle: NativeHandle,
    face: &'a Face<'a>,
}

impl<'a> BBox<'a> {
    pub(crate) fn new(face: &'a Face<'a>, raw: *mut c_void) -> Result<Self> {
        let handle = NativeHandle::view(raw, HandleKind::BBox)?;
        Ok(Self { handle, face })
    }

    #[inline]
    pub fn raw(&self) -> *mut c_void {
        self.handle.addr().as_ptr()
    }

    #[inline]
    pub fn parent(&self) -> &'a Face<'a> {
        self.face
    }

    pub fn x_min(&self) -> i64 {
        self.view().read_long("xMin")
    }

    pub fn y_min(&self) -> i64 {
        self.view().read_long("yMin")
    }

    pub fn x_max(&self) -> i64 {
        self.view().read_long("xMax")
    }

    pub fn y_max(&self) -> i64 {
        self.view().read_long("yMax")
    }

    /// All four bounds at once
    pub fn bounds(&self) -> Bounds {
        let view = self.view();
        Bounds {
            x_min: view.read_long("xMin"),
            y_min: view.read_long("yMin"),
            x_max: view.read_long("xMax"),
            y_max: view.read_long("yMax"),
        }
    }

    fn view(&self) -> StructView<'_> {
        // Lives inside the parent record, which stays open while borrowed
        unsafe { StructView::new(self.handle.addr().cast(), layout::host().bbox()) }
    }
}

impl fmt::Debug for BBox<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BBox").field(&self.bounds()).finish()
    }
}
