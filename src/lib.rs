//! ftbind - FreeType bindings with checked handle lifetimes
//!
//! Loads the FreeType shared library at runtime, binds its entry points
//! with verified signatures, and wraps the library, face, charmap and bbox
//! objects in handles whose ordering is enforced by borrowing.
//!
//! ```no_run
//! use ftbind::{Encoding, F26Dot6, FreeType};
//!
//! # fn main() -> ftbind::Result<()> {
//! let library = FreeType::new()?;
//! let face = library.load_face("FiraCode-Regular.ttf", 0)?;
//! face.set_char_size(F26Dot6::from_int(12), F26Dot6::ZERO, 96, 96)?;
//! face.select_charmap(Encoding::Unicode)?;
//! println!("{:?} has {} glyphs", face.family_name()?, face.glyph_count()?);
//! # Ok(())
//! # }
//! ```

pub mod bbox;
pub mod charmap;
pub mod config;
pub mod encoding;
pub mod error;
pub mod face;
pub mod fixed;
pub mod interop;
pub mod layout;
pub mod library;
pub mod lifecycle;
pub mod logging;

pub use bbox::{BBox, Bounds};
pub use charmap::CharMap;
pub use config::Config;
pub use encoding::{Encoding, EncodingTag};
pub use error::{BindError, Error, ErrorCategory, Result, UsageError};
pub use face::{BitmapSize, Face, FaceFlags};
pub use fixed::F26Dot6;
pub use interop::Binder;
pub use library::{FaceIndex, FreeType, Version};
pub use lifecycle::{FontData, HandleKind};
