//! The capacity/size scalar shared by bins and items.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// A non-negative amount of capacity.
///
/// Subtraction is only exposed in checked and saturating forms, so a
/// remaining-space value can never underflow.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Space(u64);

impl Space {
    pub const ZERO: Space = Space(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `self - rhs`, or `None` if `rhs` is larger.
    pub fn checked_sub(self, rhs: Space) -> Option<Space> {
        self.0.checked_sub(rhs.0).map(Space)
    }

    /// `self - rhs`, clamped at zero.
    pub fn saturating_sub(self, rhs: Space) -> Space {
        Space(self.0.saturating_sub(rhs.0))
    }

    /// Whether an item of `size` fits in this much free space.
    pub fn fits(self, size: Space) -> bool {
        size <= self
    }
}

impl From<u64> for Space {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Space> for u64 {
    fn from(space: Space) -> Self {
        space.0
    }
}

impl Add for Space {
    type Output = Space;

    fn add(self, rhs: Space) -> Space {
        Space(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Space {
    fn add_assign(&mut self, rhs: Space) {
        *self = *self + rhs;
    }
}

impl Sum for Space {
    fn sum<I: Iterator<Item = Space>>(iter: I) -> Space {
        iter.fold(Space::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Space> for Space {
    fn sum<I: Iterator<Item = &'a Space>>(iter: I) -> Space {
        iter.copied().sum()
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
