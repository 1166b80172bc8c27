//! Encoding tags - four-character codes naming a charmap's encoding
//!
//! A tag packs its four bytes big-endian into a `u32`
//! (`b0 << 24 | b1 << 16 | b2 << 8 | b3`). Tags outside the known set are
//! still representable; they just have no [`Encoding`] name.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Packed four-character code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EncodingTag(u32);

impl EncodingTag {
    /// `FT_ENCODING_NONE`
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Value as passed to `FT_Select_Charmap`
    #[inline]
    pub(crate) const fn to_native(self) -> i32 {
        self.0 as i32
    }

    #[inline]
    pub(crate) const fn from_native(value: i32) -> Self {
        Self(value as u32)
    }

    /// Named encoding, if this tag is one of the known set
    pub fn known(self) -> Option<Encoding> {
        Encoding::from_tag(self)
    }
}

impl fmt::Display for EncodingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            // Printable ASCII only, so every byte is a char
            for b in bytes {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "{:#010x}", self.0)
        }
    }
}

/// Text that is not exactly four ASCII bytes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("encoding tag must be exactly 4 ASCII bytes, got {0:?}")]
pub struct InvalidTag(pub String);

impl FromStr for EncodingTag {
    type Err = InvalidTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match <[u8; 4]>::try_from(s.as_bytes()) {
            Ok(bytes) if s.is_ascii() => Ok(Self::from_bytes(bytes)),
            _ => Err(InvalidTag(s.to_string())),
        }
    }
}

impl From<Encoding> for EncodingTag {
    fn from(encoding: Encoding) -> Self {
        encoding.tag()
    }
}

macro_rules! encodings {
    ($($(#[$doc:meta])* $variant:ident => $code:literal),* $(,)?) => {
        /// Encodings FreeType names with `FT_ENCODING_*`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Encoding {
            $($(#[$doc])* $variant,)*
        }

        impl Encoding {
            pub const ALL: &'static [Encoding] = &[$(Encoding::$variant),*];

            pub const fn tag(self) -> EncodingTag {
                match self {
                    $(Self::$variant => EncodingTag::from_bytes(*$code),)*
                }
            }
        }
    };
}

encodings! {
    MsSymbol => b"symb",
    Unicode => b"unic",
    Sjis => b"sjis",
    /// Simplified Chinese (GB 2312)
    Prc => b"gb  ",
    Big5 => b"big5",
    /// Korean, Extended Wansung
    Wansung => b"wans",
    Johab => b"joha",
    AdobeStandard => b"ADOB",
    AdobeExpert => b"ADBE",
    AdobeCustom => b"ADBC",
    AdobeLatin1 => b"lat1",
    OldLatin2 => b"lat2",
    AppleRoman => b"armn",
}

impl Encoding {
    pub fn from_tag(tag: EncodingTag) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.tag() == tag)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.tag())
    }
}
