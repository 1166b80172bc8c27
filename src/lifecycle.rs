//! Handle lifecycle - ownership tags and close-once discipline
//!
//! Design: A `NativeHandle` wraps a raw FreeType address together with who
//! is responsible for releasing it:
//! 1. `Owner` handles (library, face) are released exactly once, either by
//!    an explicit `close()` or on drop.
//! 2. `View` handles (charmap, bbox) borrow memory owned by a face and are
//!    never released.
//!
//! Ordering between handles is expressed with borrows: a `Face<'lib>`
//! borrows its `FreeType`, a `CharMap<'f>` borrows its `Face`, so a parent
//! cannot be closed while a child is reachable. Handles are `!Send` and
//! `!Sync`; callers sharing them across threads must synchronize externally.

use crate::error::UsageError;
use core::cell::Cell;
use core::ffi::c_void;
use core::marker::PhantomData;
use core::ptr::NonNull;
use std::fmt;
use std::sync::Arc;

/// Kind of native object behind a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Library,
    Face,
    CharMap,
    BBox,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Library => "library",
            Self::Face => "face",
            Self::CharMap => "charmap",
            Self::BBox => "bbox",
        };
        f.write_str(name)
    }
}

/// Who releases the native object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// This wrapper must release the object
    Owner,
    /// Borrowed sub-view; the parent releases it
    View,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Closed,
}

/// Raw address plus ownership tag and open/closed state
pub(crate) struct NativeHandle {
    addr: NonNull<c_void>,
    kind: HandleKind,
    ownership: Ownership,
    state: Cell<State>,
    // Raw native state is single-threaded per handle
    _not_sync: PhantomData<*mut c_void>,
}

impl NativeHandle {
    pub(crate) fn owned(addr: *mut c_void, kind: HandleKind) -> Result<Self, UsageError> {
        Self::new(addr, kind, Ownership::Owner)
    }

    pub(crate) fn view(addr: *mut c_void, kind: HandleKind) -> Result<Self, UsageError> {
        Self::new(addr, kind, Ownership::View)
    }

    fn new(addr: *mut c_void, kind: HandleKind, ownership: Ownership) -> Result<Self, UsageError> {
        let addr = NonNull::new(addr).ok_or(UsageError::NullHandle(kind))?;
        Ok(Self {
            addr,
            kind,
            ownership,
            state: Cell::new(State::Open),
            _not_sync: PhantomData,
        })
    }

    /// Address for a native call, rejected once closed
    #[inline]
    pub(crate) fn get(&self) -> Result<NonNull<c_void>, UsageError> {
        match self.state.get() {
            State::Open => Ok(self.addr),
            State::Closed => Err(UsageError::Closed(self.kind)),
        }
    }

    /// Raw address regardless of state (identity comparisons only)
    #[inline]
    pub(crate) fn addr(&self) -> NonNull<c_void> {
        self.addr
    }

    #[inline]
    pub(crate) fn kind(&self) -> HandleKind {
        self.kind
    }

    #[inline]
    pub(crate) fn is_open(&self) -> bool {
        self.state.get() == State::Open
    }

    /// Transition Open -> Closed and hand back the address to release
    ///
    /// The state flips before the native teardown runs, so a failing
    /// teardown is never retried.
    pub(crate) fn begin_release(&self) -> Result<NonNull<c_void>, UsageError> {
        if self.ownership == Ownership::View {
            return Err(UsageError::NotOwner(self.kind));
        }
        match self.state.replace(State::Closed) {
            State::Open => Ok(self.addr),
            State::Closed => Err(UsageError::AlreadyClosed(self.kind)),
        }
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle")
            .field("kind", &self.kind)
            .field("addr", &self.addr)
            .field("ownership", &self.ownership)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Font bytes backing a memory face
///
/// The face keeps one strong reference for its whole lifetime; FreeType reads
/// from this buffer until `FT_Done_Face` returns.
pub type FontData = Arc<[u8]>;
