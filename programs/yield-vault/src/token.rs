//! Asset token interface
//!
//! The vault only relies on balance conservation across transfers. Any
//! fungible ledger with balances and allowances can back it.

use std::collections::BTreeMap;

use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::UNLIMITED_ALLOWANCE,
    error::VaultError,
    math::{checked_add, checked_sub},
};

/// Fungible asset held by the vault and its strategies
pub trait AssetToken {
    fn address(&self) -> Pubkey;

    fn decimals(&self) -> u8;

    fn total_supply(&self) -> u64;

    fn balance_of(&self, owner: &Pubkey) -> u64;

    fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u64;

    fn approve(&mut self, owner: &Pubkey, spender: &Pubkey, amount: u64) -> Result<(), ProgramError>;

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), ProgramError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`
    fn transfer_from(
        &mut self,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), ProgramError>;
}

/// Balance-and-allowance token ledger kept in memory
#[derive(Debug, Clone)]
pub struct InMemoryToken {
    address: Pubkey,
    decimals: u8,
    total_supply: u64,
    balances: BTreeMap<Pubkey, u64>,
    allowances: BTreeMap<(Pubkey, Pubkey), u64>,
}

impl InMemoryToken {
    pub fn new(address: Pubkey, decimals: u8) -> Self {
        Self {
            address,
            decimals,
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    /// Create new supply for `to`
    pub fn mint(&mut self, to: &Pubkey, amount: u64) -> Result<(), ProgramError> {
        let supply = checked_add(self.total_supply, amount)?;
        let balance = checked_add(self.balance_of(to), amount)?;

        self.total_supply = supply;
        self.balances.insert(*to, balance);
        Ok(())
    }

    /// Destroy supply held by `from`
    pub fn burn(&mut self, from: &Pubkey, amount: u64) -> Result<(), ProgramError> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(VaultError::InsufficientBalance.into());
        }

        self.balances.insert(*from, balance - amount);
        self.total_supply = checked_sub(self.total_supply, amount)?;
        Ok(())
    }

    fn move_balance(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), ProgramError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            msg!("Token transfer exceeds balance: {} > {}", amount, from_balance);
            return Err(VaultError::InsufficientBalance.into());
        }

        if from == to {
            return Ok(());
        }

        let to_balance = checked_add(self.balance_of(to), amount)?;
        self.balances.insert(*from, from_balance - amount);
        self.balances.insert(*to, to_balance);
        Ok(())
    }
}

impl AssetToken for InMemoryToken {
    fn address(&self) -> Pubkey {
        self.address
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn total_supply(&self) -> u64 {
        self.total_supply
    }

    fn balance_of(&self, owner: &Pubkey) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u64 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn approve(&mut self, owner: &Pubkey, spender: &Pubkey, amount: u64) -> Result<(), ProgramError> {
        self.allowances.insert((*owner, *spender), amount);
        Ok(())
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), ProgramError> {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), ProgramError> {
        let allowance = self.allowance(from, spender);
        if allowance < amount {
            msg!("Token allowance exceeded: {} > {}", amount, allowance);
            return Err(VaultError::InsufficientAllowance.into());
        }

        self.move_balance(from, to, amount)?;

        if allowance != UNLIMITED_ALLOWANCE {
            self.allowances.insert((*from, *spender), allowance - amount);
        }
        Ok(())
    }
}
