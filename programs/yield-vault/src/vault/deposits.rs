//! Deposit Management

use solana_program::{clock::Clock, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    error::VaultError,
    events::{self, Event},
    math::{checked_add, mul_div},
    token::AssetToken,
};

use super::Vault;

impl Vault {
    /// Deposit `amount` of asset from `depositor`, minting shares at the current price
    pub fn deposit(
        &mut self,
        depositor: &Pubkey,
        amount: u64,
        token: &mut dyn AssetToken,
        clock: &Clock,
    ) -> Result<u64, ProgramError> {
        self.ensure_asset(token)?;

        if amount == 0 {
            return Err(VaultError::InvalidAmount.into());
        }

        if self.state.emergency_shutdown {
            msg!("Vault not accepting deposits: emergency shutdown");
            return Err(VaultError::EmergencyShutdownActive.into());
        }

        let total_assets = self.total_assets(token)?;
        if checked_add(total_assets, amount)? > self.state.config.deposit_limit {
            msg!(
                "Deposit above limit: {} + {} > {}",
                total_assets,
                amount,
                self.state.config.deposit_limit
            );
            return Err(VaultError::DepositLimitExceeded.into());
        }

        if token.balance_of(depositor) < amount {
            return Err(VaultError::InsufficientBalance.into());
        }

        if token.allowance(depositor, &self.state.address) < amount {
            return Err(VaultError::InsufficientAllowance.into());
        }

        let shares = self.issue_amount(amount, total_assets)?;
        if shares == 0 {
            return Err(VaultError::ZeroSharesMinted.into());
        }

        let vault = self.state.address;
        token.transfer_from(&vault, depositor, &vault, amount)?;
        self.mint_shares(depositor, shares)?;

        msg!(
            "Processed deposit: user={}, amount={}, shares={}, slot={}",
            depositor,
            amount,
            shares,
            clock.slot
        );

        events::Deposit {
            depositor: *depositor,
            amount,
            shares,
        }
        .emit();

        Ok(shares)
    }

    /// Asset that can still be deposited before hitting the deposit limit
    pub fn available_deposit_limit(&self, token: &dyn AssetToken) -> Result<u64, ProgramError> {
        if self.state.emergency_shutdown {
            return Ok(0);
        }

        Ok(self
            .state
            .config
            .deposit_limit
            .saturating_sub(self.total_assets(token)?))
    }

    /// Shares minted for `amount` of asset against `total_assets` held before it arrives
    fn issue_amount(&self, amount: u64, total_assets: u64) -> Result<u64, ProgramError> {
        if self.state.total_supply == 0 || total_assets == 0 {
            // First deposit, 1:1 ratio
            return Ok(amount);
        }

        mul_div(amount, self.state.total_supply, total_assets)
    }
}
