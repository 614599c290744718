//! Vault Module
//!
//! Share ledger, debt allocator and report accounting for a single asset.
//! A `Vault` owns its ledger state; the asset token and the clock are passed
//! into every call that needs them.

pub mod accounting;
pub mod debt;
pub mod deposits;
pub mod governance;
pub mod shares;
pub mod withdrawals;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::Clock, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    config::VaultConfig,
    error::VaultError,
    math::checked_add,
    state::{StrategyParams, VaultState},
    token::AssetToken,
};

#[derive(Debug, Clone)]
pub struct Vault {
    state: VaultState,
}

impl Vault {
    /// Deploy a vault for `token` with the given roles
    pub fn new(
        address: Pubkey,
        token: &dyn AssetToken,
        governance: Pubkey,
        rewards: Pubkey,
        guardian: Pubkey,
        config: VaultConfig,
        clock: &Clock,
    ) -> Result<Self, ProgramError> {
        config.validate()?;

        if address == Pubkey::default() {
            return Err(VaultError::InvalidRecipient.into());
        }

        let state = VaultState::new(
            address,
            token.address(),
            token.decimals(),
            config,
            governance,
            guardian,
            rewards,
            clock.unix_timestamp,
        );

        msg!(
            "Vault {} deployed for asset {}: name={}, symbol={}",
            address,
            state.asset,
            state.config.name,
            state.config.symbol
        );

        Ok(Self { state })
    }

    /// Serialize the full ledger
    pub fn snapshot(&self) -> Result<Vec<u8>, ProgramError> {
        self.state
            .try_to_vec()
            .map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Rebuild a vault from a snapshot
    pub fn restore(data: &[u8]) -> Result<Self, ProgramError> {
        let state = VaultState::try_from_slice(data)?;
        state.validate()?;
        Ok(Self { state })
    }

    pub fn state(&self) -> &VaultState {
        &self.state
    }

    pub fn address(&self) -> Pubkey {
        self.state.address
    }

    pub fn asset(&self) -> Pubkey {
        self.state.asset
    }

    pub fn name(&self) -> &str {
        &self.state.config.name
    }

    pub fn symbol(&self) -> &str {
        &self.state.config.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.state.decimals
    }

    pub fn governance(&self) -> Pubkey {
        self.state.governance
    }

    pub fn guardian(&self) -> Pubkey {
        self.state.guardian
    }

    pub fn rewards(&self) -> Pubkey {
        self.state.rewards
    }

    pub fn management_fee(&self) -> u64 {
        self.state.config.management_fee
    }

    pub fn performance_fee(&self) -> u64 {
        self.state.config.performance_fee
    }

    pub fn deposit_limit(&self) -> u64 {
        self.state.config.deposit_limit
    }

    pub fn emergency_shutdown(&self) -> bool {
        self.state.emergency_shutdown
    }

    pub fn total_debt(&self) -> u64 {
        self.state.total_debt
    }

    pub fn withdrawal_queue(&self) -> &[Pubkey] {
        &self.state.withdrawal_queue
    }

    /// Debt record of a registered strategy
    pub fn strategies(&self, strategy: &Pubkey) -> Option<&StrategyParams> {
        self.state.strategies.get(strategy)
    }

    /// Asset held by the vault and not lent to any strategy
    pub fn idle(&self, token: &dyn AssetToken) -> Result<u64, ProgramError> {
        self.ensure_asset(token)?;
        Ok(token.balance_of(&self.state.address))
    }

    /// Idle asset plus all strategy debt
    pub fn total_assets(&self, token: &dyn AssetToken) -> Result<u64, ProgramError> {
        checked_add(self.idle(token)?, self.state.total_debt)
    }

    fn ensure_asset(&self, token: &dyn AssetToken) -> Result<(), ProgramError> {
        if token.address() != self.state.asset {
            msg!("Asset mismatch: {} != {}", token.address(), self.state.asset);
            return Err(VaultError::AssetMismatch.into());
        }
        Ok(())
    }

    fn strategy_params(&self, strategy: &Pubkey) -> Result<&StrategyParams, ProgramError> {
        self.state
            .strategies
            .get(strategy)
            .ok_or_else(|| VaultError::StrategyNotRegistered.into())
    }

    fn strategy_params_mut(&mut self, strategy: &Pubkey) -> Result<&mut StrategyParams, ProgramError> {
        self.state
            .strategies
            .get_mut(strategy)
            .ok_or_else(|| VaultError::StrategyNotRegistered.into())
    }

    fn only_governance(&self, caller: &Pubkey) -> Result<(), ProgramError> {
        if *caller != self.state.governance {
            msg!("Caller {} is not governance", caller);
            return Err(VaultError::Unauthorized.into());
        }
        Ok(())
    }
}
