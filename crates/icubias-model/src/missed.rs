//! Missed-measurement counts.

use std::ops::{Add, AddAssign};

/// Missed measurements of one variable for one patient.
///
/// `strict` counts every expected-period slot that fits in an overlong gap;
/// `adjusted` discounts the slot already satisfied by the boundary
/// observations, so it is `strict` minus one per overlong gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissedCount {
    pub strict: u64,
    pub adjusted: u64,
}

impl MissedCount {
    pub const ZERO: Self = Self {
        strict: 0,
        adjusted: 0,
    };

    pub fn new(strict: u64, adjusted: u64) -> Self {
        Self { strict, adjusted }
    }
}

impl Add for MissedCount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            strict: self.strict + rhs.strict,
            adjusted: self.adjusted + rhs.adjusted,
        }
    }
}

impl AddAssign for MissedCount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
