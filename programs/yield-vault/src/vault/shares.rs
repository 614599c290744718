//! Share Ledger
//!
//! Share issuance, burning, pricing and the transferable share token.

use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::UNLIMITED_ALLOWANCE,
    error::VaultError,
    events::{self, Event},
    math::{checked_add, checked_sub, mul_div},
    token::AssetToken,
};

use super::Vault;

impl Vault {
    pub fn total_supply(&self) -> u64 {
        self.state.total_supply
    }

    pub fn balance_of(&self, holder: &Pubkey) -> u64 {
        self.state.share_balance(holder)
    }

    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u64 {
        self.state.share_allowance(owner, spender)
    }

    /// One share's worth of asset, scaled by `10^decimals`
    pub fn price_per_share(&self, token: &dyn AssetToken) -> Result<u64, ProgramError> {
        let unit = 10u64
            .checked_pow(self.state.decimals as u32)
            .ok_or(VaultError::ArithmeticOverflow)?;

        if self.state.total_supply == 0 {
            return Ok(unit);
        }

        self.share_value(unit, token)
    }

    /// Asset value of `shares` at the current price
    pub fn share_value(&self, shares: u64, token: &dyn AssetToken) -> Result<u64, ProgramError> {
        if self.state.total_supply == 0 {
            return Ok(shares);
        }

        mul_div(shares, self.total_assets(token)?, self.state.total_supply)
    }

    /// Shares that `amount` of asset is worth at the current price
    pub fn shares_for_amount(&self, amount: u64, token: &dyn AssetToken) -> Result<u64, ProgramError> {
        let total_assets = self.total_assets(token)?;
        if total_assets == 0 {
            return Ok(0);
        }

        mul_div(amount, self.state.total_supply, total_assets)
    }

    /// Shares redeemable right now from idle asset and strategy debt
    pub fn max_available_shares(&self, token: &dyn AssetToken) -> Result<u64, ProgramError> {
        let mut shares = self.shares_for_amount(self.idle(token)?, token)?;

        for strategy in &self.state.withdrawal_queue {
            if let Some(params) = self.state.strategies.get(strategy) {
                shares = checked_add(shares, self.shares_for_amount(params.total_debt, token)?)?;
            }
        }

        Ok(shares.min(self.state.total_supply))
    }

    /// Move shares between holders
    pub fn transfer(&mut self, from: &Pubkey, to: &Pubkey, shares: u64) -> Result<(), ProgramError> {
        self.transfer_shares(from, to, shares)
    }

    pub fn approve(&mut self, owner: &Pubkey, spender: &Pubkey, shares: u64) -> Result<(), ProgramError> {
        self.state.allowances.insert((*owner, *spender), shares);

        events::Approval {
            owner: *owner,
            spender: *spender,
            shares,
        }
        .emit();

        Ok(())
    }

    /// Move shares on behalf of `owner`, spending the caller's allowance
    pub fn transfer_from(
        &mut self,
        spender: &Pubkey,
        owner: &Pubkey,
        to: &Pubkey,
        shares: u64,
    ) -> Result<(), ProgramError> {
        let allowance = self.allowance(owner, spender);
        if allowance < shares {
            msg!("Share allowance exceeded: {} > {}", shares, allowance);
            return Err(VaultError::InsufficientAllowance.into());
        }

        self.transfer_shares(owner, to, shares)?;

        if allowance != UNLIMITED_ALLOWANCE {
            self.state.allowances.insert((*owner, *spender), allowance - shares);
        }

        Ok(())
    }

    fn transfer_shares(&mut self, from: &Pubkey, to: &Pubkey, shares: u64) -> Result<(), ProgramError> {
        if *to == self.state.address || *to == Pubkey::default() {
            return Err(VaultError::InvalidRecipient.into());
        }

        let from_balance = self.balance_of(from);
        if from_balance < shares {
            msg!("Insufficient shares: {} > {}", shares, from_balance);
            return Err(VaultError::InsufficientShares.into());
        }

        if from != to {
            let to_balance = checked_add(self.balance_of(to), shares)?;
            self.state.balances.insert(*from, from_balance - shares);
            self.state.balances.insert(*to, to_balance);
        }

        events::Transfer {
            from: *from,
            to: *to,
            shares,
        }
        .emit();

        Ok(())
    }

    pub(crate) fn mint_shares(&mut self, to: &Pubkey, shares: u64) -> Result<(), ProgramError> {
        let supply = checked_add(self.state.total_supply, shares)?;
        let balance = checked_add(self.balance_of(to), shares)?;

        self.state.total_supply = supply;
        self.state.balances.insert(*to, balance);
        Ok(())
    }

    pub(crate) fn burn_shares(&mut self, from: &Pubkey, shares: u64) -> Result<(), ProgramError> {
        let balance = self.balance_of(from);
        if balance < shares {
            return Err(VaultError::InsufficientShares.into());
        }

        self.state.total_supply = checked_sub(self.state.total_supply, shares)?;
        if balance == shares {
            self.state.balances.remove(from);
        } else {
            self.state.balances.insert(*from, balance - shares);
        }
        Ok(())
    }
}
