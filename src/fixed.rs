//! 26.6 fixed-point values (`FT_F26Dot6`)

use std::fmt;
use std::ops::{Add, Sub};

/// 26 integer bits, 6 fractional bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct F26Dot6(i64);

impl F26Dot6 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(64);

    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn from_int(value: i32) -> Self {
        Self((value as i64) << 6)
    }

    /// Nearest 26.6 value, rounding half away from zero
    pub fn from_f64(value: f64) -> Self {
        Self((value * 64.0).round() as i64)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 64.0
    }

    /// Integer part, rounded toward negative infinity
    #[inline]
    pub const fn floor(self) -> i64 {
        self.0 >> 6
    }

    /// Nearest integer
    #[inline]
    pub const fn round(self) -> i64 {
        (self.0 + 32) >> 6
    }

    #[inline]
    pub const fn ceil(self) -> i64 {
        (self.0 + 63) >> 6
    }
}

impl From<i32> for F26Dot6 {
    fn from(value: i32) -> Self {
        Self::from_int(value)
    }
}

impl Add for F26Dot6 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for F26Dot6 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for F26Dot6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}
