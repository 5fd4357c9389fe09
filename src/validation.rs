/// Validation of user-entered staking amounts
///
/// Amounts arrive as free text in whole tokens. They are checked here before anything
/// touches the wallet, so a bad entry becomes a field error rather than a failed
/// extrinsic.
use crate::error::{Result, StakerError};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Which balance caps the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountCap {
    /// Free balance of the account (stake)
    Available,
    /// Amount staked on the source core (unstake, move)
    Staked,
}

impl AmountCap {
    fn message(&self) -> &'static str {
        match self {
            AmountCap::Available => "Amount must be less than or equal to available balance",
            AmountCap::Staked => {
                "Amount must be less than or equal to your total staked balance"
            }
        }
    }
}

/// Parse a token amount such as "120.5"
///
/// # Arguments
/// * `raw` - User input; surrounding whitespace and thousands separators are ignored
///
/// # Returns
/// * `Ok(Decimal)` if the input is a number
/// * `Err` otherwise
pub fn parse_token_amount(raw: &str) -> Result<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned)
        .map_err(|_| StakerError::Validation("Amount must be a number".to_string()))
}

/// Validate a stake/unstake/move amount in whole tokens
///
/// # Arguments
/// * `amount` - Parsed amount
/// * `min` - Minimum accepted amount (50 tokens on Tinkernet)
/// * `max` - Balance that caps the amount
/// * `cap` - Which balance `max` is, for the error message
pub fn validate_stake_amount(
    amount: Decimal,
    min: Decimal,
    max: Decimal,
    cap: AmountCap,
) -> Result<()> {
    if amount <= Decimal::ZERO {
        let message = match cap {
            AmountCap::Available => format!("Amount must be greater than or equal to {}", min),
            AmountCap::Staked => "Amount must be greater than 0".to_string(),
        };
        return Err(StakerError::Validation(message));
    }

    if amount < min {
        return Err(StakerError::Validation(format!(
            "Amount must be greater than or equal to {}",
            min
        )));
    }

    if amount > max {
        return Err(StakerError::Validation(cap.message().to_string()));
    }

    Ok(())
}

/// Reject moving stake onto the core it comes from
pub fn validate_distinct_cores(from: u32, to: u32) -> Result<()> {
    if from == to {
        return Err(StakerError::Validation(
            "Source and destination core must differ".to_string(),
        ));
    }
    Ok(())
}

/// Prefill for "max" on the stake form: keep one token back for fees
pub fn stake_max(balance: Decimal) -> Decimal {
    if balance >= Decimal::ONE {
        balance - Decimal::ONE
    } else {
        balance
    }
}

/// Prefill for "max" on the unstake form
pub fn unstake_max(staked: Decimal) -> Decimal {
    if staked > Decimal::ONE {
        staked - Decimal::ONE
    } else {
        staked
    }
}
