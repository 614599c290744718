use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::program_error::ProgramError;

use crate::{
    constants::{
        DEFAULT_MANAGEMENT_FEE_BPS, DEFAULT_PERFORMANCE_FEE_BPS, MAX_MANAGEMENT_FEE_BPS,
        MAX_PERFORMANCE_FEE_BPS,
    },
    error::VaultError,
};

/// Deployment parameters of a vault
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct VaultConfig {
    /// Share token name
    pub name: String,

    /// Share token symbol
    pub symbol: String,

    /// Annual management fee charged on strategy debt, in basis points
    pub management_fee: u64,

    /// Performance fee charged on realized gain, in basis points
    pub performance_fee: u64,

    /// Cap on total assets accepted through deposits
    pub deposit_limit: u64,
}

impl VaultConfig {
    pub const MAX_NAME_LEN: usize = 64;
    pub const MAX_SYMBOL_LEN: usize = 16;

    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.name.is_empty() || self.name.len() > Self::MAX_NAME_LEN {
            return Err(VaultError::InvalidConfiguration.into());
        }

        if self.symbol.is_empty() || self.symbol.len() > Self::MAX_SYMBOL_LEN {
            return Err(VaultError::InvalidConfiguration.into());
        }

        if self.management_fee > MAX_MANAGEMENT_FEE_BPS {
            return Err(VaultError::FeeAboveMaximum.into());
        }

        if self.performance_fee > MAX_PERFORMANCE_FEE_BPS {
            return Err(VaultError::FeeAboveMaximum.into());
        }

        Ok(())
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            name: "Yield Vault".to_string(),
            symbol: "yv".to_string(),
            management_fee: DEFAULT_MANAGEMENT_FEE_BPS, // 2% annual
            performance_fee: DEFAULT_PERFORMANCE_FEE_BPS, // 10%
            deposit_limit: u64::MAX,
        }
    }
}
