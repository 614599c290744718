//! Error types for the yield vault

use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum VaultError {
    // Parameter errors (7000-7009)
    #[error("Amount must be greater than zero")]
    InvalidAmount = 7000,

    #[error("Invalid debt limit")]
    InvalidDebtLimit = 7001,

    #[error("Fee exceeds maximum allowed")]
    FeeAboveMaximum = 7002,

    #[error("Invalid vault configuration")]
    InvalidConfiguration = 7003,

    #[error("Invalid recipient")]
    InvalidRecipient = 7004,

    #[error("Asset does not match vault asset")]
    AssetMismatch = 7005,

    // Authority errors (7010-7019)
    #[error("Caller is not authorized")]
    Unauthorized = 7010,

    #[error("No governance transfer pending")]
    NoPendingGovernance = 7011,

    // Strategy registry errors (7020-7029)
    #[error("Strategy already registered")]
    StrategyAlreadyRegistered = 7020,

    #[error("Strategy not registered")]
    StrategyNotRegistered = 7021,

    #[error("Withdrawal queue is full")]
    WithdrawalQueueFull = 7022,

    #[error("Strategy already in withdrawal queue")]
    StrategyAlreadyQueued = 7023,

    #[error("Strategy not in withdrawal queue")]
    StrategyNotQueued = 7024,

    #[error("Strategy is bound to a different vault")]
    VaultMismatch = 7025,

    // Balance errors (7030-7039)
    #[error("Insufficient asset balance")]
    InsufficientBalance = 7030,

    #[error("Insufficient allowance")]
    InsufficientAllowance = 7031,

    #[error("Insufficient shares")]
    InsufficientShares = 7032,

    #[error("Deposit would mint zero shares")]
    ZeroSharesMinted = 7033,

    #[error("Deposit limit exceeded")]
    DepositLimitExceeded = 7034,

    #[error("Strategy balance does not cover reported gain and payment")]
    InsufficientStrategyBalance = 7035,

    #[error("Reported loss exceeds strategy debt")]
    LossExceedsDebt = 7036,

    // Lifecycle errors (7040-7049)
    #[error("Vault emergency shutdown is active")]
    EmergencyShutdownActive = 7040,

    // Math errors (7050-7059)
    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 7050,

    #[error("Division by zero")]
    DivisionByZero = 7051,
}

impl PrintProgramError for VaultError {
    fn print<E>(&self) {
        msg!("Yield Vault Error: {}", self);
    }
}

impl From<VaultError> for ProgramError {
    fn from(e: VaultError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for VaultError {
    fn type_of() -> &'static str {
        "VaultError"
    }
}

/// Log the error with context and return it
pub fn error_msg<T>(error: VaultError, message: &str) -> Result<T, ProgramError> {
    msg!("Error: {} - {}", error, message);
    Err(error.into())
}
