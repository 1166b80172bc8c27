//! Type definitions for FFI signatures
//!
//! Every entry point is declared with a `Signature` built from `FfiType`s.
//! Typed Rust function pointers derive their own signature through
//! `ForeignFn`, so the binder can compare the two before handing out a
//! callable.

use core::ffi::c_void;
use std::fmt;

/// FFI-compatible type descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FfiType {
    Void,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    Pointer,
}

impl FfiType {
    /// Get size of type in bytes on the host
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::Void => 0,
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 => 4,
            Self::I64 | Self::U64 => 8,
            Self::Pointer => core::mem::size_of::<*const c_void>(),
        }
    }

    /// Check if type is integral
    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::U8 | Self::U16 | Self::U32 | Self::U64
        )
    }

    /// C spelling, for diagnostics
    pub const fn c_name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::I8 => "int8_t",
            Self::U8 => "uint8_t",
            Self::I16 => "int16_t",
            Self::U16 => "uint16_t",
            Self::I32 => "int32_t",
            Self::U32 => "uint32_t",
            Self::I64 => "int64_t",
            Self::U64 => "uint64_t",
            Self::Pointer => "void*",
        }
    }
}

impl fmt::Display for FfiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}

/// Rust types that cross the boundary unchanged
pub trait HasFfiType {
    const FFI_TYPE: FfiType;
}

macro_rules! has_ffi_type {
    ($($ty:ty => $ffi:ident),* $(,)?) => {
        $(impl HasFfiType for $ty {
            const FFI_TYPE: FfiType = FfiType::$ffi;
        })*
    };
}

has_ffi_type! {
    () => Void,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
}

impl<T> HasFfiType for *mut T {
    const FFI_TYPE: FfiType = FfiType::Pointer;
}

impl<T> HasFfiType for *const T {
    const FFI_TYPE: FfiType = FfiType::Pointer;
}

/// Return type plus ordered argument types of a C function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    pub ret: FfiType,
    pub args: &'static [FfiType],
}

impl Signature {
    pub const fn new(ret: FfiType, args: &'static [FfiType]) -> Self {
        Self { ret, args }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (*)(", self.ret)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

/// Typed `extern "C"` function pointer that can be produced from a raw
/// symbol address
pub trait ForeignFn: Copy {
    const SIGNATURE: Signature;

    /// Reinterpret a resolved symbol address
    ///
    /// # Safety
    /// `addr` must be the address of a function with exactly this signature
    /// and the C calling convention.
    unsafe fn from_addr(addr: *const c_void) -> Self;
}

macro_rules! foreign_fn {
    ($($arg:ident),*) => {
        impl<R: HasFfiType, $($arg: HasFfiType),*> ForeignFn for unsafe extern "C" fn($($arg),*) -> R {
            const SIGNATURE: Signature = Signature {
                ret: R::FFI_TYPE,
                args: &[$($arg::FFI_TYPE),*],
            };

            #[inline]
            unsafe fn from_addr(addr: *const c_void) -> Self {
                core::mem::transmute_copy::<*const c_void, Self>(&addr)
            }
        }
    };
}

foreign_fn!();
foreign_fn!(A);
foreign_fn!(A, B);
foreign_fn!(A, B, C);
foreign_fn!(A, B, C, D);
foreign_fn!(A, B, C, D, E);
