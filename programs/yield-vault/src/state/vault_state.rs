use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, program_error::ProgramError, pubkey::Pubkey};

use crate::{config::VaultConfig, constants::MAXIMUM_STRATEGIES, state::StrategyParams};

/// Ledger state of a vault
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct VaultState {
    /// Account discriminator
    pub discriminator: [u8; 8],

    /// Is initialized flag
    pub is_initialized: bool,

    /// Address the vault holds assets under
    pub address: Pubkey,

    /// Asset token accepted by the vault
    pub asset: Pubkey,

    /// Share decimals, mirrored from the asset
    pub decimals: u8,

    /// Name, symbol, fees and deposit limit
    pub config: VaultConfig,

    /// Roles
    pub governance: Pubkey,
    pub pending_governance: Option<Pubkey>,
    pub guardian: Pubkey,
    pub rewards: Pubkey,

    /// Shares outstanding
    pub total_supply: u64,

    /// Share balances per holder
    pub balances: BTreeMap<Pubkey, u64>,

    /// Share allowances keyed by (owner, spender)
    pub allowances: BTreeMap<(Pubkey, Pubkey), u64>,

    /// Sum of all strategy debt
    pub total_debt: u64,

    /// Debt records of registered strategies
    pub strategies: BTreeMap<Pubkey, StrategyParams>,

    /// Order in which strategies are drawn from on withdrawal
    pub withdrawal_queue: Vec<Pubkey>,

    /// Deposits halted and all debt called back
    pub emergency_shutdown: bool,

    /// Deployment timestamp
    pub activation: UnixTimestamp,

    /// Timestamp of the last strategy report
    pub last_report: UnixTimestamp,
}

impl VaultState {
    pub const DISCRIMINATOR: [u8; 8] = [89, 73, 69, 76, 68, 95, 86, 84]; // "YIELD_VT"

    pub fn new(
        address: Pubkey,
        asset: Pubkey,
        decimals: u8,
        config: VaultConfig,
        governance: Pubkey,
        guardian: Pubkey,
        rewards: Pubkey,
        activation: UnixTimestamp,
    ) -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            is_initialized: true,
            address,
            asset,
            decimals,
            config,
            governance,
            pending_governance: None,
            guardian,
            rewards,
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            total_debt: 0,
            strategies: BTreeMap::new(),
            withdrawal_queue: Vec::with_capacity(MAXIMUM_STRATEGIES),
            emergency_shutdown: false,
            activation,
            last_report: activation,
        }
    }

    /// Check discriminator and structural invariants
    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.discriminator != Self::DISCRIMINATOR {
            return Err(ProgramError::InvalidAccountData);
        }

        if !self.is_initialized {
            return Err(ProgramError::UninitializedAccount);
        }

        self.config.validate()?;

        if self.withdrawal_queue.len() > MAXIMUM_STRATEGIES {
            return Err(ProgramError::InvalidAccountData);
        }

        let debt: u128 = self.strategies.values().map(|s| s.total_debt as u128).sum();
        if debt != self.total_debt as u128 {
            return Err(ProgramError::InvalidAccountData);
        }

        let shares: u128 = self.balances.values().map(|b| *b as u128).sum();
        if shares != self.total_supply as u128 {
            return Err(ProgramError::InvalidAccountData);
        }

        Ok(())
    }

    pub fn share_balance(&self, holder: &Pubkey) -> u64 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub fn share_allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u64 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }
}
