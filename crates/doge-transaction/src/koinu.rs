//! Fixed-point Dogecoin amounts.
//!
//! One coin is 10^8 koinu. Decimal text is parsed digit by digit into a
//! `u64` so no floating point is ever involved; digits past the eighth
//! fractional place are truncated.

use std::fmt;
use std::str::FromStr;

use crate::TransactionError;

/// Koinu per coin.
pub const COIN: u64 = 100_000_000;

/// Number of fractional decimal digits in a coin amount.
pub const DECIMALS: usize = 8;

/// An amount in koinu, the smallest currency unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Koinu(pub u64);

impl Koinu {
    /// Zero koinu.
    pub const ZERO: Koinu = Koinu(0);

    /// Parse a decimal coin amount such as `"12.0"`, `"5"` or `".00226"`.
    ///
    /// # Arguments
    /// * `s` - Unsigned decimal text with at most one `.`.
    ///
    /// # Returns
    /// The amount in koinu, or `InvalidAmount` for empty, signed,
    /// non-numeric or overflowing input.
    pub fn from_coins_str(s: &str) -> Result<Self, TransactionError> {
        let invalid = |why: &str| TransactionError::InvalidAmount(format!("'{}': {}", s, why));

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("not a decimal number"));
        }

        let mut coins: u64 = 0;
        for b in whole.bytes() {
            coins = coins
                .checked_mul(10)
                .and_then(|c| c.checked_add(u64::from(b - b'0')))
                .ok_or_else(|| invalid("out of range"))?;
        }

        let mut fraction: u64 = 0;
        for i in 0..DECIMALS {
            let digit = frac.as_bytes().get(i).map_or(0, |b| u64::from(b - b'0'));
            fraction = fraction * 10 + digit;
        }

        coins
            .checked_mul(COIN)
            .and_then(|k| k.checked_add(fraction))
            .map(Koinu)
            .ok_or_else(|| invalid("out of range"))
    }

    /// Render as a decimal coin string with exactly eight fractional digits.
    pub fn to_coins_string(&self) -> String {
        format!("{}.{:08}", self.0 / COIN, self.0 % COIN)
    }

    /// The raw koinu value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// `self + other`, or `None` on overflow.
    pub fn checked_add(self, other: Koinu) -> Option<Koinu> {
        self.0.checked_add(other.0).map(Koinu)
    }

    /// `self - other`, or `None` if the result would be negative.
    pub fn checked_sub(self, other: Koinu) -> Option<Koinu> {
        self.0.checked_sub(other.0).map(Koinu)
    }
}

/// Parse decimal coin text into koinu.
pub fn coins_to_koinu_str(coins: &str) -> Result<u64, TransactionError> {
    Koinu::from_coins_str(coins).map(|k| k.0)
}

/// Format a koinu value as decimal coin text (`"2.00000000"`).
pub fn koinu_to_coins_str(koinu: u64) -> String {
    Koinu(koinu).to_coins_string()
}

impl From<u64> for Koinu {
    fn from(value: u64) -> Self {
        Koinu(value)
    }
}

impl From<Koinu> for u64 {
    fn from(value: Koinu) -> Self {
        value.0
    }
}

impl fmt::Display for Koinu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_coins_string())
    }
}

impl FromStr for Koinu {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Koinu::from_coins_str(s)
    }
}
