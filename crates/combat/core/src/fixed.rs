//! Deterministic fixed-point numbers for positions and ranges.
//!
//! Values are Q16.16 stored in an `i64`, so every comparison and every
//! operation the combat core performs reduces to integer arithmetic on the
//! raw representation. No floating point is involved anywhere.

use core::ops::{Add, Neg, Sub};

/// Signed Q16.16 fixed-point value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Fixed(i64);

impl Fixed {
    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = 16;
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << Self::FRAC_BITS);

    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn from_int(value: i32) -> Self {
        Self((value as i64) << Self::FRAC_BITS)
    }

    /// Builds `numerator / denominator` rounded toward negative infinity.
    ///
    /// Returns `None` for a zero denominator.
    pub fn from_ratio(numerator: i32, denominator: i32) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let (numerator, denominator) = if denominator < 0 {
            (-(numerator as i64), -(denominator as i64))
        } else {
            (numerator as i64, denominator as i64)
        };
        // Positive divisor: euclidean division is floor division.
        Some(Self((numerator << Self::FRAC_BITS).div_euclid(denominator)))
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Largest integer not greater than this value (tile coordinate),
    /// saturated to the `i32` range.
    pub const fn floor_to_int(self) -> i32 {
        // Arithmetic shift rounds toward negative infinity.
        let whole = self.0 >> Self::FRAC_BITS;
        if whole > i32::MAX as i64 {
            i32::MAX
        } else if whole < i32::MIN as i64 {
            i32::MIN
        } else {
            whole as i32
        }
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Fixed {
    type Output = Fixed;

    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Fixed {
        Fixed(self.0.saturating_neg())
    }
}

impl core::fmt::Display for Fixed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let whole = self.0 >> Self::FRAC_BITS;
        let frac = self.0 & ((1 << Self::FRAC_BITS) - 1);
        write!(f, "{whole}+{frac}/65536")
    }
}

/// Two-dimensional fixed-point position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedVec2 {
    pub x: Fixed,
    pub y: Fixed,
}

impl FixedVec2 {
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Position at the exact integer coordinates `(x, y)`.
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self {
            x: Fixed::from_int(x),
            y: Fixed::from_int(y),
        }
    }

    pub const fn is_zero(self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// Tile containing this position.
    pub const fn tile(self) -> (i32, i32) {
        (self.x.floor_to_int(), self.y.floor_to_int())
    }

    /// Squared Euclidean distance in raw units (scale `2^32`).
    ///
    /// Computed in `i128`, so it cannot overflow for any pair of positions.
    pub fn distance_squared_raw(self, other: FixedVec2) -> i128 {
        let dx = self.x.raw() as i128 - other.x.raw() as i128;
        let dy = self.y.raw() as i128 - other.y.raw() as i128;
        dx * dx + dy * dy
    }

    /// Returns true when `other` lies within `range` (inclusive) of `self`.
    pub fn within_range(self, other: FixedVec2, range: Fixed) -> bool {
        if range.raw() < 0 {
            return false;
        }
        let r = range.raw() as i128;
        self.distance_squared_raw(other) <= r * r
    }
}
