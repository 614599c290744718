//! Debt Allocator
//!
//! Strategy registry, credit lines and the withdrawal queue.

use solana_program::{clock::Clock, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::{MAXIMUM_STRATEGIES, MAX_PERFORMANCE_FEE_BPS},
    error::VaultError,
    events::{self, Event},
    math::mul_div_wide,
    state::StrategyParams,
    token::AssetToken,
};

use super::Vault;

impl Vault {
    /// Register `strategy` with a credit line
    pub fn add_strategy(
        &mut self,
        caller: &Pubkey,
        strategy: &Pubkey,
        debt_limit: u64,
        rate_limit: u64,
        performance_fee: u64,
        clock: &Clock,
    ) -> Result<(), ProgramError> {
        self.only_governance(caller)?;

        if self.state.emergency_shutdown {
            return Err(VaultError::EmergencyShutdownActive.into());
        }

        if *strategy == Pubkey::default() || *strategy == self.state.address {
            return Err(VaultError::InvalidRecipient.into());
        }

        if self.state.strategies.contains_key(strategy) {
            msg!("Strategy {} already registered", strategy);
            return Err(VaultError::StrategyAlreadyRegistered.into());
        }

        if debt_limit == 0 {
            return Err(VaultError::InvalidDebtLimit.into());
        }

        if performance_fee > MAX_PERFORMANCE_FEE_BPS {
            msg!("Strategist fee above cap: {} > {}", performance_fee, MAX_PERFORMANCE_FEE_BPS);
            return Err(VaultError::FeeAboveMaximum.into());
        }

        if self.state.withdrawal_queue.len() >= MAXIMUM_STRATEGIES {
            return Err(VaultError::WithdrawalQueueFull.into());
        }

        let params = StrategyParams::new(
            debt_limit,
            rate_limit,
            performance_fee,
            clock.unix_timestamp,
            clock.epoch,
        );
        self.state.strategies.insert(*strategy, params);
        self.state.withdrawal_queue.push(*strategy);

        msg!(
            "Strategy {} added: debt_limit={}, rate_limit={}, fee={}",
            strategy,
            debt_limit,
            rate_limit,
            performance_fee
        );

        events::StrategyAdded {
            strategy: *strategy,
            debt_limit,
            rate_limit,
            performance_fee,
        }
        .emit();

        Ok(())
    }

    /// Change the debt limit; lowering it to zero revokes the strategy
    pub fn update_strategy_debt_limit(
        &mut self,
        caller: &Pubkey,
        strategy: &Pubkey,
        debt_limit: u64,
    ) -> Result<(), ProgramError> {
        self.only_governance(caller)?;
        self.strategy_params_mut(strategy)?.debt_limit = debt_limit;

        msg!("Strategy {} debt limit set to {}", strategy, debt_limit);
        events::StrategyUpdateDebtLimit {
            strategy: *strategy,
            debt_limit,
        }
        .emit();

        Ok(())
    }

    pub fn update_strategy_rate_limit(
        &mut self,
        caller: &Pubkey,
        strategy: &Pubkey,
        rate_limit: u64,
    ) -> Result<(), ProgramError> {
        self.only_governance(caller)?;
        self.strategy_params_mut(strategy)?.rate_limit = rate_limit;

        msg!("Strategy {} rate limit set to {}", strategy, rate_limit);
        events::StrategyUpdateRateLimit {
            strategy: *strategy,
            rate_limit,
        }
        .emit();

        Ok(())
    }

    pub fn update_strategy_performance_fee(
        &mut self,
        caller: &Pubkey,
        strategy: &Pubkey,
        performance_fee: u64,
    ) -> Result<(), ProgramError> {
        self.only_governance(caller)?;

        if performance_fee > MAX_PERFORMANCE_FEE_BPS {
            return Err(VaultError::FeeAboveMaximum.into());
        }

        self.strategy_params_mut(strategy)?.performance_fee = performance_fee;

        events::StrategyUpdatePerformanceFee {
            strategy: *strategy,
            performance_fee,
        }
        .emit();

        Ok(())
    }

    /// Stop lending to `strategy`; its debt is called back on later harvests
    pub fn revoke_strategy(&mut self, caller: &Pubkey, strategy: &Pubkey) -> Result<(), ProgramError> {
        if *caller != self.state.governance && caller != strategy {
            msg!("Caller {} may not revoke {}", caller, strategy);
            return Err(VaultError::Unauthorized.into());
        }

        self.strategy_params_mut(strategy)?.debt_limit = 0;

        msg!("Strategy {} revoked", strategy);
        events::StrategyRevoked { strategy: *strategy }.emit();

        Ok(())
    }

    pub fn add_strategy_to_queue(&mut self, caller: &Pubkey, strategy: &Pubkey) -> Result<(), ProgramError> {
        self.only_governance(caller)?;
        self.strategy_params(strategy)?;

        if self.state.withdrawal_queue.contains(strategy) {
            return Err(VaultError::StrategyAlreadyQueued.into());
        }

        if self.state.withdrawal_queue.len() >= MAXIMUM_STRATEGIES {
            return Err(VaultError::WithdrawalQueueFull.into());
        }

        self.state.withdrawal_queue.push(*strategy);
        events::StrategyAddedToQueue { strategy: *strategy }.emit();

        Ok(())
    }

    pub fn remove_strategy_from_queue(
        &mut self,
        caller: &Pubkey,
        strategy: &Pubkey,
    ) -> Result<(), ProgramError> {
        self.only_governance(caller)?;

        let position = self
            .state
            .withdrawal_queue
            .iter()
            .position(|s| s == strategy)
            .ok_or(VaultError::StrategyNotQueued)?;
        self.state.withdrawal_queue.remove(position);

        events::StrategyRemovedFromQueue { strategy: *strategy }.emit();

        Ok(())
    }

    /// Credit `strategy` may draw right now: min(debt headroom, epoch rate headroom, idle)
    pub fn credit_available(
        &self,
        strategy: &Pubkey,
        token: &dyn AssetToken,
        clock: &Clock,
    ) -> Result<u64, ProgramError> {
        if self.state.emergency_shutdown {
            return Ok(0);
        }

        let params = match self.state.strategies.get(strategy) {
            Some(params) => params,
            None => return Ok(0),
        };

        let headroom = params.debt_limit.saturating_sub(params.total_debt);
        let rate_headroom = params.rate_headroom(clock.epoch);
        let idle = self.idle(token)?;

        Ok(headroom.min(rate_headroom).min(idle))
    }

    /// Debt `strategy` should hand back on its next report
    pub fn debt_outstanding(&self, strategy: &Pubkey) -> Result<u64, ProgramError> {
        let params = self.strategy_params(strategy)?;

        if self.state.emergency_shutdown {
            Ok(params.total_debt)
        } else {
            Ok(params.total_debt.saturating_sub(params.debt_limit))
        }
    }

    /// Gain expected at the next report, extrapolated from the strategy's history
    pub fn expected_return(&self, strategy: &Pubkey, clock: &Clock) -> Result<u64, ProgramError> {
        let params = self.strategy_params(strategy)?;

        let since_report = clock.unix_timestamp.saturating_sub(params.last_report);
        let lifetime = params.last_report.saturating_sub(params.activation);

        if since_report <= 0 || lifetime <= 0 {
            return Ok(0);
        }

        mul_div_wide(params.total_gain, since_report as u128, lifetime as u128)
    }
}
