//! Strategy Runner
//!
//! A strategy borrows idle asset from its vault, deploys it into a
//! [`YieldSource`] and reports the result back on every harvest.

pub mod yield_source;

pub use yield_source::{AccruingYieldSource, YieldSource};

use solana_program::{clock::Clock, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::UNLIMITED_ALLOWANCE,
    error::VaultError,
    events::{self, Event},
    math::checked_add,
    state::HarvestReport,
    token::AssetToken,
    vault::Vault,
};

/// What the vault needs from a strategy when pulling funds for a withdrawal
pub trait StrategyRunner {
    fn address(&self) -> Pubkey;

    fn vault(&self) -> Pubkey;

    /// Idle asset plus the value of the deployed position
    fn estimated_total_assets(&self, token: &dyn AssetToken, clock: &Clock) -> Result<u64, ProgramError>;

    /// Free up to `amount_needed` and send it to the vault; returns the amount sent
    fn withdraw(
        &mut self,
        caller: &Pubkey,
        amount_needed: u64,
        token: &mut dyn AssetToken,
        clock: &Clock,
    ) -> Result<u64, ProgramError>;
}

#[derive(Debug, Clone)]
pub struct Strategy<Y: YieldSource> {
    address: Pubkey,
    vault: Pubkey,
    asset: Pubkey,
    strategist: Pubkey,
    keeper: Pubkey,
    emergency_exit: bool,
    yield_source: Y,
}

impl<Y: YieldSource> Strategy<Y> {
    /// Create a strategy for `vault` and approve the vault to pull its asset
    pub fn new(
        address: Pubkey,
        vault: &Vault,
        strategist: Pubkey,
        yield_source: Y,
        token: &mut dyn AssetToken,
    ) -> Result<Self, ProgramError> {
        if token.address() != vault.asset() {
            return Err(VaultError::AssetMismatch.into());
        }

        if address == Pubkey::default() || address == vault.address() {
            return Err(VaultError::InvalidRecipient.into());
        }

        token.approve(&address, &vault.address(), UNLIMITED_ALLOWANCE)?;

        msg!("Strategy {} created for vault {}", address, vault.address());

        Ok(Self {
            address,
            vault: vault.address(),
            asset: vault.asset(),
            strategist,
            keeper: strategist,
            emergency_exit: false,
            yield_source,
        })
    }

    pub fn strategist(&self) -> Pubkey {
        self.strategist
    }

    pub fn keeper(&self) -> Pubkey {
        self.keeper
    }

    pub fn emergency_exit(&self) -> bool {
        self.emergency_exit
    }

    pub fn yield_source(&self) -> &Y {
        &self.yield_source
    }

    pub fn yield_source_mut(&mut self) -> &mut Y {
        &mut self.yield_source
    }

    /// Realize profit or loss, settle with the vault and redeploy
    pub fn harvest(
        &mut self,
        caller: &Pubkey,
        vault: &mut Vault,
        token: &mut dyn AssetToken,
        clock: &Clock,
    ) -> Result<HarvestReport, ProgramError> {
        self.ensure_vault(vault)?;
        self.ensure_asset(token)?;

        if *caller != self.keeper && *caller != self.strategist && *caller != vault.governance() {
            msg!("Caller {} may not harvest {}", caller, self.address);
            return Err(VaultError::Unauthorized.into());
        }

        let debt_outstanding = vault.debt_outstanding(&self.address)?;
        let total_debt = vault
            .strategies(&self.address)
            .map(|params| params.total_debt)
            .ok_or(VaultError::StrategyNotRegistered)?;

        let (profit, loss, debt_payment) = if self.emergency_exit {
            self.exit_position(total_debt, debt_outstanding, token, clock)?
        } else {
            self.prepare_return(total_debt, debt_outstanding, token, clock)?
        };

        let report = vault.report(&self.address, profit, loss, debt_payment, token, clock)?;

        if !self.emergency_exit {
            self.adjust_position(report.debt_outstanding, token, clock)?;
        }

        msg!(
            "Harvested {}: profit={}, loss={}, payment={}, outstanding={}",
            self.address,
            profit,
            loss,
            report.debt_payment,
            report.debt_outstanding
        );

        events::Harvested {
            profit,
            loss,
            debt_payment: report.debt_payment,
            debt_outstanding: report.debt_outstanding,
        }
        .emit();

        Ok(report)
    }

    pub fn set_keeper(&mut self, caller: &Pubkey, keeper: &Pubkey, vault: &Vault) -> Result<(), ProgramError> {
        self.only_authorized(caller, vault)?;
        self.keeper = *keeper;

        events::UpdatedKeeper { keeper: *keeper }.emit();
        Ok(())
    }

    pub fn set_strategist(&mut self, caller: &Pubkey, strategist: &Pubkey, vault: &Vault) -> Result<(), ProgramError> {
        self.only_authorized(caller, vault)?;

        if *strategist == Pubkey::default() {
            return Err(VaultError::InvalidRecipient.into());
        }

        self.strategist = *strategist;

        events::UpdatedStrategist { strategist: *strategist }.emit();
        Ok(())
    }

    /// Stop borrowing and return everything on the next harvest
    pub fn set_emergency_exit(&mut self, caller: &Pubkey, vault: &mut Vault) -> Result<(), ProgramError> {
        self.only_authorized(caller, vault)?;
        self.ensure_vault(vault)?;

        vault.revoke_strategy(&self.address, &self.address)?;
        self.emergency_exit = true;

        msg!("Emergency exit enabled for {}", self.address);
        events::EmergencyExitEnabled { strategy: self.address }.emit();

        Ok(())
    }

    /// Profit and loss against `total_debt`, freeing `profit + debt_outstanding`
    fn prepare_return(
        &mut self,
        total_debt: u64,
        debt_outstanding: u64,
        token: &mut dyn AssetToken,
        clock: &Clock,
    ) -> Result<(u64, u64, u64), ProgramError> {
        let total_assets = self.estimated_total_assets(token, clock)?;

        let (mut profit, loss) = if total_assets > total_debt {
            (total_assets - total_debt, 0)
        } else {
            (0, total_debt - total_assets)
        };

        let freed = self.liquidate_position(checked_add(profit, debt_outstanding)?, token, clock)?;

        // Illiquid: profit is realized first, the rest stays as debt
        let debt_payment = if freed < profit {
            profit = freed;
            0
        } else {
            (freed - profit).min(debt_outstanding)
        };

        Ok((profit, loss, debt_payment))
    }

    /// Liquidate everything; anything above the debt is profit
    fn exit_position(
        &mut self,
        total_debt: u64,
        debt_outstanding: u64,
        token: &mut dyn AssetToken,
        clock: &Clock,
    ) -> Result<(u64, u64, u64), ProgramError> {
        let total_assets = self.estimated_total_assets(token, clock)?;
        let freed = self.liquidate_position(total_assets.max(debt_outstanding), token, clock)?;

        if freed > debt_outstanding {
            return Ok((freed - debt_outstanding, 0, debt_outstanding));
        }

        // Nothing left to recover: the rest of the debt is lost
        let loss = if self.yield_source.valuation(clock)? == 0 {
            total_debt.saturating_sub(freed)
        } else {
            0
        };

        Ok((0, loss, freed.min(total_debt - loss)))
    }

    /// Deploy idle asset beyond what the vault wants back
    fn adjust_position(
        &mut self,
        debt_outstanding: u64,
        token: &mut dyn AssetToken,
        clock: &Clock,
    ) -> Result<(), ProgramError> {
        let idle = token.balance_of(&self.address);
        if idle <= debt_outstanding {
            return Ok(());
        }

        let amount = idle - debt_outstanding;
        self.yield_source.deposit(token, &self.address, amount, clock)?;

        msg!("Deployed {} into {}", amount, self.yield_source.address());
        Ok(())
    }

    /// Make up to `amount_needed` idle; returns the idle amount available for it
    fn liquidate_position(
        &mut self,
        amount_needed: u64,
        token: &mut dyn AssetToken,
        clock: &Clock,
    ) -> Result<u64, ProgramError> {
        let idle = token.balance_of(&self.address);
        if idle < amount_needed {
            self.yield_source
                .liquidate(token, &self.address, amount_needed - idle, clock)?;
        }

        Ok(token.balance_of(&self.address).min(amount_needed))
    }

    fn ensure_vault(&self, vault: &Vault) -> Result<(), ProgramError> {
        if vault.address() != self.vault {
            return Err(VaultError::VaultMismatch.into());
        }
        Ok(())
    }

    fn ensure_asset(&self, token: &dyn AssetToken) -> Result<(), ProgramError> {
        if token.address() != self.asset {
            return Err(VaultError::AssetMismatch.into());
        }
        Ok(())
    }

    fn only_authorized(&self, caller: &Pubkey, vault: &Vault) -> Result<(), ProgramError> {
        if *caller != self.strategist && *caller != vault.governance() {
            msg!("Caller {} is neither strategist nor governance", caller);
            return Err(VaultError::Unauthorized.into());
        }
        Ok(())
    }
}

impl<Y: YieldSource> StrategyRunner for Strategy<Y> {
    fn address(&self) -> Pubkey {
        self.address
    }

    fn vault(&self) -> Pubkey {
        self.vault
    }

    fn estimated_total_assets(&self, token: &dyn AssetToken, clock: &Clock) -> Result<u64, ProgramError> {
        self.ensure_asset(token)?;
        checked_add(token.balance_of(&self.address), self.yield_source.valuation(clock)?)
    }

    fn withdraw(
        &mut self,
        caller: &Pubkey,
        amount_needed: u64,
        token: &mut dyn AssetToken,
        clock: &Clock,
    ) -> Result<u64, ProgramError> {
        if *caller != self.vault {
            return Err(VaultError::Unauthorized.into());
        }
        self.ensure_asset(token)?;

        let freed = self.liquidate_position(amount_needed, token, clock)?;
        if freed > 0 {
            token.transfer(&self.address, &self.vault, freed)?;
        }

        msg!("Strategy {} returned {} of {} to vault", self.address, freed, amount_needed);
        Ok(freed)
    }
}
