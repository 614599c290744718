//! Yield sources a strategy deploys into

use solana_program::{
    clock::{Clock, UnixTimestamp},
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    constants::{MAX_BPS, SECS_PER_YEAR},
    error::VaultError,
    math::{checked_add, checked_sub, mul_div_wide},
    token::AssetToken,
};

/// External position a strategy holds the vault's asset in
pub trait YieldSource {
    fn address(&self) -> Pubkey;

    /// Asset value of the position at `clock`
    fn valuation(&self, clock: &Clock) -> Result<u64, ProgramError>;

    /// Move `amount` from `from` into the position
    fn deposit(
        &mut self,
        token: &mut dyn AssetToken,
        from: &Pubkey,
        amount: u64,
        clock: &Clock,
    ) -> Result<(), ProgramError>;

    /// Free up to `amount` to `to`; may return less when illiquid
    fn liquidate(
        &mut self,
        token: &mut dyn AssetToken,
        to: &Pubkey,
        amount: u64,
        clock: &Clock,
    ) -> Result<u64, ProgramError>;
}

/// Simple-interest position paying `apr_bps` per year
///
/// Interest is paid out of the token balance held at `address`, so the
/// account must be pre-funded with a reserve.
#[derive(Debug, Clone)]
pub struct AccruingYieldSource {
    address: Pubkey,
    apr_bps: u64,
    principal: u64,
    checkpoint: UnixTimestamp,
    liquidity_cap: Option<u64>,
}

impl AccruingYieldSource {
    pub fn new(address: Pubkey, apr_bps: u64, clock: &Clock) -> Self {
        Self {
            address,
            apr_bps,
            principal: 0,
            checkpoint: clock.unix_timestamp,
            liquidity_cap: None,
        }
    }

    pub fn apr_bps(&self) -> u64 {
        self.apr_bps
    }

    pub fn principal(&self) -> u64 {
        self.principal
    }

    /// Cap each liquidation at `cap`; `None` removes the cap
    pub fn set_liquidity_cap(&mut self, cap: Option<u64>) {
        self.liquidity_cap = cap;
    }

    /// Mark the position down by `amount`
    pub fn write_down(&mut self, amount: u64, clock: &Clock) -> Result<u64, ProgramError> {
        self.accrue(clock)?;
        let amount = amount.min(self.principal);
        self.principal -= amount;

        msg!("Yield source {} written down by {}", self.address, amount);
        Ok(amount)
    }

    fn accrued(&self, clock: &Clock) -> Result<u64, ProgramError> {
        let elapsed = clock.unix_timestamp.saturating_sub(self.checkpoint).max(0) as u128;
        mul_div_wide(
            self.principal,
            elapsed * self.apr_bps as u128,
            MAX_BPS as u128 * SECS_PER_YEAR as u128,
        )
    }

    /// Fold accrued interest into principal
    fn accrue(&mut self, clock: &Clock) -> Result<(), ProgramError> {
        self.principal = checked_add(self.principal, self.accrued(clock)?)?;
        self.checkpoint = clock.unix_timestamp.max(self.checkpoint);
        Ok(())
    }
}

impl YieldSource for AccruingYieldSource {
    fn address(&self) -> Pubkey {
        self.address
    }

    fn valuation(&self, clock: &Clock) -> Result<u64, ProgramError> {
        checked_add(self.principal, self.accrued(clock)?)
    }

    fn deposit(
        &mut self,
        token: &mut dyn AssetToken,
        from: &Pubkey,
        amount: u64,
        clock: &Clock,
    ) -> Result<(), ProgramError> {
        if amount == 0 {
            return Err(VaultError::InvalidAmount.into());
        }

        self.accrue(clock)?;
        token.transfer(from, &self.address, amount)?;
        self.principal = checked_add(self.principal, amount)?;
        Ok(())
    }

    fn liquidate(
        &mut self,
        token: &mut dyn AssetToken,
        to: &Pubkey,
        amount: u64,
        clock: &Clock,
    ) -> Result<u64, ProgramError> {
        self.accrue(clock)?;

        let mut freed = amount.min(self.principal).min(token.balance_of(&self.address));
        if let Some(cap) = self.liquidity_cap {
            freed = freed.min(cap);
        }

        if freed > 0 {
            token.transfer(&self.address, to, freed)?;
            self.principal = checked_sub(self.principal, freed)?;
        }

        if freed < amount {
            msg!("Yield source {} freed {} of {}", self.address, freed, amount);
        }

        Ok(freed)
    }
}
