//! Checked integer helpers
//!
//! All products are taken in u128 and narrowed back to u64, rounding down.

use solana_program::program_error::ProgramError;

use crate::{constants::MAX_BPS, error::VaultError};

/// Compute `value * numerator / denominator`, rounding down
pub fn mul_div(value: u64, numerator: u64, denominator: u64) -> Result<u64, ProgramError> {
    if denominator == 0 {
        return Err(VaultError::DivisionByZero.into());
    }

    let result = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(VaultError::ArithmeticOverflow)?
        / denominator as u128;

    to_u64(result)
}

/// Same as [`mul_div`] with a u128 numerator, for products of time and debt
pub fn mul_div_wide(value: u64, numerator: u128, denominator: u128) -> Result<u64, ProgramError> {
    if denominator == 0 {
        return Err(VaultError::DivisionByZero.into());
    }

    let result = (value as u128)
        .checked_mul(numerator)
        .ok_or(VaultError::ArithmeticOverflow)?
        / denominator;

    to_u64(result)
}

/// Take `bps` basis points of `value`
pub fn apply_bps(value: u64, bps: u64) -> Result<u64, ProgramError> {
    mul_div(value, bps, MAX_BPS)
}

/// Narrow a u128 into u64
pub fn to_u64(value: u128) -> Result<u64, ProgramError> {
    u64::try_from(value).map_err(|_| VaultError::ArithmeticOverflow.into())
}

pub fn checked_add(a: u64, b: u64) -> Result<u64, ProgramError> {
    a.checked_add(b).ok_or_else(|| VaultError::ArithmeticOverflow.into())
}

pub fn checked_sub(a: u64, b: u64) -> Result<u64, ProgramError> {
    a.checked_sub(b).ok_or_else(|| VaultError::ArithmeticOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_rounds_down() {
        assert_eq!(mul_div(10, 1, 3).unwrap(), 3);
        assert_eq!(mul_div(u64::MAX, 2, 2).unwrap(), u64::MAX);
    }

    #[test]
    fn test_mul_div_errors() {
        assert_eq!(mul_div(1, 1, 0), Err(VaultError::DivisionByZero.into()));
        assert_eq!(
            mul_div(u64::MAX, 3, 2),
            Err(VaultError::ArithmeticOverflow.into())
        );
    }

    #[test]
    fn test_apply_bps() {
        assert_eq!(apply_bps(1_000_000, 50).unwrap(), 5_000); // 0.5%
        assert_eq!(apply_bps(1_000_000, MAX_BPS).unwrap(), 1_000_000);
    }
}
