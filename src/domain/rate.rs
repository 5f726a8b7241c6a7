//! Fixed-point exchange rates.
//!
//! A [`Rate`] is the number of `asset_out` base units received per unit of
//! `asset_in`, scaled by [`RATE_SCALE`] (`10^18`). Conversion always rounds
//! down so the remainder stays with the pool.

use std::fmt;
use std::str::FromStr;

use hydra_amm::domain::{Amount, Rounding};
use hydra_amm::error::AmmError;
use hydra_amm::math::{CheckedArithmetic, div_round};
use serde::{Serialize, Serializer};

/// Fixed-point scale applied to every rate (`10^18`).
pub const RATE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Directional exchange rate scaled by [`RATE_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Rate(u128);

impl Rate {
    /// The zero rate; a pair with this rate is untradeable.
    pub const ZERO: Self = Self(0);

    /// Creates a rate from its raw scaled value.
    #[must_use]
    pub const fn new(scaled: u128) -> Self {
        Self(scaled)
    }

    /// Returns the raw scaled value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the rate is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Converts `amount_in` into the output amount:
    /// `floor(amount_in * rate / RATE_SCALE)`.
    ///
    /// Both operands are split at the scale (`a = aq·S + ar`,
    /// `r = rq·S + rr`) so the product is computed exactly in `u128`:
    /// `aq·rq·S + aq·rr + ar·rq + floor(ar·rr / S)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the exact result does not fit in
    /// a `u128`.
    pub fn apply(&self, amount_in: Amount) -> Result<Amount, AmmError> {
        let a = amount_in.get();
        let (aq, ar) = (a / RATE_SCALE, a % RATE_SCALE);
        let (rq, rr) = (self.0 / RATE_SCALE, self.0 % RATE_SCALE);

        let whole = Amount::new(aq)
            .safe_mul(&Amount::new(rq))?
            .safe_mul(&Amount::new(RATE_SCALE))?;
        let cross_a = Amount::new(aq).safe_mul(&Amount::new(rr))?;
        let cross_r = Amount::new(ar).safe_mul(&Amount::new(rq))?;
        // ar, rr < 10^18, so the product stays below 10^36.
        let fractional = div_round(ar * rr, RATE_SCALE, Rounding::Down)
            .ok_or(AmmError::DivisionByZero)?;

        whole
            .safe_add(&cross_a)?
            .safe_add(&cross_r)?
            .safe_add_u128(fractional)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Rate {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u128>().map(Self)
    }
}
