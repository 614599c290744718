//! Report accounting
//!
//! A strategy reports its realized gain, loss and debt repayment once per
//! harvest. The vault settles the net asset movement in a single transfer
//! and takes fees by minting new shares out of the reported gain.

use solana_program::{clock::Clock, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::{MAX_BPS, SECS_PER_YEAR},
    error::VaultError,
    events::{self, Event},
    math::{apply_bps, checked_add, checked_sub, mul_div, mul_div_wide},
    state::HarvestReport,
    token::AssetToken,
};

use super::Vault;

/// Net asset movement of a report
enum Settlement {
    /// Vault sends credit to the strategy
    Lend(u64),
    /// Vault pulls gain and repayment from the strategy
    Collect(u64),
    None,
}

impl Vault {
    /// Record a harvest by `strategy`; the strategy must hold `gain + debt_payment`
    pub fn report(
        &mut self,
        strategy: &Pubkey,
        gain: u64,
        loss: u64,
        debt_payment: u64,
        token: &mut dyn AssetToken,
        clock: &Clock,
    ) -> Result<HarvestReport, ProgramError> {
        self.ensure_asset(token)?;

        let params = self.strategy_params(strategy)?.clone();
        let vault = self.state.address;

        let available = token.balance_of(strategy);
        if checked_add(gain, debt_payment)? > available {
            msg!(
                "Strategy {} cannot cover report: gain={} payment={} balance={}",
                strategy,
                gain,
                debt_payment,
                available
            );
            return Err(VaultError::InsufficientStrategyBalance.into());
        }

        if loss > params.total_debt {
            msg!("Reported loss {} exceeds debt {}", loss, params.total_debt);
            return Err(VaultError::LossExceedsDebt.into());
        }

        // Loss shrinks both the debt and the line of credit
        let debt_after_loss = params.total_debt - loss;
        let debt_limit = params.debt_limit.saturating_sub(loss);

        let outstanding = if self.state.emergency_shutdown {
            debt_after_loss
        } else {
            debt_after_loss.saturating_sub(debt_limit)
        };
        let debt_payment = debt_payment.min(outstanding);
        let debt_after_payment = debt_after_loss - debt_payment;

        let credit = if self.state.emergency_shutdown {
            0
        } else {
            debt_limit
                .saturating_sub(debt_after_payment)
                .min(params.rate_headroom(clock.epoch))
                .min(token.balance_of(&vault))
        };

        let returned = gain + debt_payment;
        let settlement = if credit > returned {
            Settlement::Lend(credit - returned)
        } else if returned > credit {
            Settlement::Collect(returned - credit)
        } else {
            Settlement::None
        };

        if let Settlement::Collect(amount) = settlement {
            if token.allowance(strategy, &vault) < amount {
                msg!("Strategy {} has not approved the vault for {}", strategy, amount);
                return Err(VaultError::InsufficientAllowance.into());
            }
        }

        let total_debt = checked_add(
            checked_sub(self.state.total_debt, loss + debt_payment)?,
            credit,
        )?;
        let strategy_debt = checked_add(debt_after_payment, credit)?;
        let management_fee = self.management_fee_since_report(clock)?;

        // Commit
        {
            let params = self.strategy_params_mut(strategy)?;
            params.total_loss = checked_add(params.total_loss, loss)?;
            params.total_gain = checked_add(params.total_gain, gain)?;
            params.debt_limit = debt_limit;
            params.total_debt = strategy_debt;
            params.last_report = clock.unix_timestamp;
            if credit > 0 {
                params.record_draw(clock.epoch, credit);
            }
        }
        self.state.total_debt = total_debt;

        match settlement {
            Settlement::Lend(amount) => token.transfer(&vault, strategy, amount)?,
            Settlement::Collect(amount) => token.transfer_from(&vault, strategy, &vault, amount)?,
            Settlement::None => {}
        }

        let fee_shares =
            self.assess_fees(strategy, gain, management_fee, params.performance_fee, token)?;
        self.state.last_report = clock.unix_timestamp;

        let params = self.strategy_params(strategy)?.clone();
        msg!(
            "Strategy reported: strategy={}, gain={}, loss={}, payment={}, credit={}, debt={}",
            strategy,
            gain,
            loss,
            debt_payment,
            credit,
            params.total_debt
        );

        events::StrategyReported {
            strategy: *strategy,
            gain,
            loss,
            debt_payment,
            credit,
            total_gain: params.total_gain,
            total_loss: params.total_loss,
            total_debt: params.total_debt,
            debt_limit: params.debt_limit,
        }
        .emit();

        Ok(HarvestReport {
            strategy: *strategy,
            gain,
            loss,
            debt_payment,
            credit,
            debt_outstanding: self.debt_outstanding(strategy)?,
            total_debt: params.total_debt,
            fee_shares,
            epoch: clock.epoch,
        })
    }

    /// Management fee accrued on lent assets since the previous report
    fn management_fee_since_report(&self, clock: &Clock) -> Result<u64, ProgramError> {
        let elapsed = clock.unix_timestamp.saturating_sub(self.state.last_report).max(0) as u128;
        let numerator = elapsed * self.state.config.management_fee as u128;
        let denominator = MAX_BPS as u128 * SECS_PER_YEAR as u128;

        mul_div_wide(self.state.total_debt, numerator, denominator)
    }

    /// Mint fee shares out of `gain`; returns the number of shares minted
    fn assess_fees(
        &mut self,
        strategy: &Pubkey,
        gain: u64,
        management_fee: u64,
        strategist_fee_bps: u64,
        token: &dyn AssetToken,
    ) -> Result<u64, ProgramError> {
        if gain == 0 {
            return Ok(0);
        }

        let performance_fee = apply_bps(gain, self.state.config.performance_fee)?;
        let strategist_fee = apply_bps(gain, strategist_fee_bps)?;

        let total_fee = management_fee
            .saturating_add(performance_fee)
            .saturating_add(strategist_fee)
            .min(gain);
        if total_fee == 0 {
            return Ok(0);
        }

        let supply = self.state.total_supply;
        let total_assets = self.total_assets(token)?;
        let fee_shares = if supply == 0 || total_assets <= total_fee {
            total_fee
        } else {
            // Dilute existing holders by exactly `total_fee` of value
            mul_div(total_fee, supply, total_assets - total_fee)?
        };

        let strategist_shares = mul_div(fee_shares, strategist_fee.min(total_fee), total_fee)?;
        let rewards_shares = fee_shares - strategist_shares;

        if strategist_shares > 0 {
            self.mint_shares(strategy, strategist_shares)?;
        }
        if rewards_shares > 0 {
            let rewards = self.state.rewards;
            self.mint_shares(&rewards, rewards_shares)?;
        }

        msg!(
            "Fees assessed: total={}, shares={}, strategist_shares={}",
            total_fee,
            fee_shares,
            strategist_shares
        );

        Ok(fee_shares)
    }
}
