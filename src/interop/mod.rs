//! Interoperability - loading FreeType and binding its entry points
//!
//! Architecture:
//! - `types.rs` - FFI type system (FfiType, Signature, ForeignFn)
//! - `sys.rs` - FreeType C declarations and symbol specs
//! - `library.rs` - Dynamic library loading (dlopen/LoadLibrary)
//! - `binder.rs` - Signature-checked entry point table

mod binder;
mod library;
pub mod sys;
mod types;

#[cfg(test)]
pub(crate) mod mock;


pub use binder::Binder;
pub use library::{DynamicLibrary, SymbolLookup};
pub use sys::{Requirement, SymbolSpec};
pub use types::{FfiType, ForeignFn, HasFfiType, Signature};

#[cfg(test)]
pub(crate) use binder::resolve;
