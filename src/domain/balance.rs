use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{Result, StakerError};

/// On-chain balance in the smallest unit (planck)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Balance(pub u128);

impl Balance {
    pub const ZERO: Balance = Balance(0);

    pub fn new(planck: u128) -> Self {
        Self(planck)
    }

    pub fn planck(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_sub(self, rhs: Balance) -> Balance {
        Balance(self.0.saturating_sub(rhs.0))
    }

    /// Exact planck value as a decimal, for allocation arithmetic
    pub fn as_decimal(&self) -> Result<Decimal> {
        self.scaled(0)
    }

    /// Convert a planck amount to whole-token units
    pub fn to_tokens(&self, decimals: u32) -> Result<Decimal> {
        self.scaled(decimals)
    }

    fn scaled(&self, scale: u32) -> Result<Decimal> {
        let out_of_range =
            |e: String| StakerError::Validation(format!("Balance {} out of decimal range: {}", self.0, e));
        let planck = i128::try_from(self.0).map_err(|e| out_of_range(e.to_string()))?;
        Decimal::try_from_i128_with_scale(planck, scale).map_err(|e| out_of_range(e.to_string()))
    }

    /// Convert a token amount to planck, truncating anything below one planck
    pub fn from_tokens(amount: Decimal, decimals: u32) -> Result<Self> {
        if amount.is_sign_negative() {
            return Err(StakerError::Validation(format!(
                "Amount cannot be negative: {}",
                amount
            )));
        }
        let scale = 10u64
            .checked_pow(decimals)
            .map(Decimal::from)
            .ok_or_else(|| StakerError::Validation(format!("Unsupported token decimals: {}", decimals)))?;
        let planck = amount
            .checked_mul(scale)
            .ok_or_else(|| StakerError::Validation(format!("Amount too large: {}", amount)))?
            .trunc();
        planck
            .to_u128()
            .map(Balance)
            .ok_or_else(|| StakerError::Validation(format!("Amount too large: {}", amount)))
    }

    /// Round a planck-denominated decimal half-up to an integer balance.
    ///
    /// Returns `None` for zero or negative input.
    pub fn from_planck_decimal(amount: Decimal) -> Option<Self> {
        let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        if rounded <= Decimal::ZERO {
            return None;
        }
        rounded.to_u128().map(Balance)
    }
}

impl Add for Balance {
    type Output = Balance;

    fn add(self, rhs: Balance) -> Balance {
        Balance(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Balance {
    type Output = Balance;

    fn sub(self, rhs: Balance) -> Balance {
        self.saturating_sub(rhs)
    }
}

impl From<u128> for Balance {
    fn from(value: u128) -> Self {
        Balance(value)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token display settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFormat {
    pub symbol: String,
    pub decimals: u32,
}

impl Default for TokenFormat {
    fn default() -> Self {
        Self {
            symbol: "VARCH".to_string(),
            decimals: 12,
        }
    }
}

impl TokenFormat {
    /// "1234.57 VARCH" style, two decimals
    pub fn format(&self, balance: Balance) -> String {
        match balance.to_tokens(self.decimals) {
            Ok(tokens) => self.format_tokens(tokens),
            Err(_) => format!("{} planck", balance),
        }
    }

    pub fn format_tokens(&self, tokens: Decimal) -> String {
        let rounded = tokens.round_dp_with_strategy(2, RoundingStrategy::ToZero);
        format!("{:.2} {}", rounded, self.symbol)
    }
}
