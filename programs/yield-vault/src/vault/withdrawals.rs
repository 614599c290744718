//! Withdrawal Management
//!
//! Redeems shares for asset. When idle asset is short, strategies are drawn
//! down in withdrawal-queue order; whatever they cannot free is reported back
//! as a shortfall and only the shares covering the delivered amount are burned.

use solana_program::{clock::Clock, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    error::VaultError,
    events::{self, Event},
    math::{checked_sub, mul_div},
    state::WithdrawOutcome,
    strategy::StrategyRunner,
    token::AssetToken,
};

use super::Vault;

impl Vault {
    /// Redeem `shares` owned by `owner`, sending the asset to `recipient`
    pub fn withdraw(
        &mut self,
        owner: &Pubkey,
        shares: u64,
        recipient: &Pubkey,
        token: &mut dyn AssetToken,
        strategies: &mut [&mut dyn StrategyRunner],
        clock: &Clock,
    ) -> Result<WithdrawOutcome, ProgramError> {
        self.ensure_asset(token)?;

        if shares == 0 {
            return Err(VaultError::InvalidAmount.into());
        }

        if *recipient == self.state.address || *recipient == Pubkey::default() {
            return Err(VaultError::InvalidRecipient.into());
        }

        let balance = self.balance_of(owner);
        if shares > balance {
            msg!("Insufficient shares: {} > {}", shares, balance);
            return Err(VaultError::InsufficientShares.into());
        }

        let requested = self.share_value(shares, token)?;
        let vault = self.state.address;
        let mut idle = token.balance_of(&vault);

        if requested > idle {
            idle = self.pull_from_strategies(requested, token, strategies, clock)?;
        }

        let (shares_burned, delivered) = if requested > idle {
            // Strategies could not free enough; burn only what idle covers
            let total_assets = self.total_assets(token)?;
            let burned = mul_div(idle, self.state.total_supply, total_assets)?.min(shares);
            (burned, self.share_value(burned, token)?)
        } else {
            (shares, requested)
        };
        let shortfall = requested.saturating_sub(delivered);

        self.burn_shares(owner, shares_burned)?;
        token.transfer(&vault, recipient, delivered)?;

        msg!(
            "Processed withdrawal: owner={}, shares={}, amount={}, shortfall={}",
            owner,
            shares_burned,
            delivered,
            shortfall
        );

        events::Withdraw {
            owner: *owner,
            recipient: *recipient,
            shares: shares_burned,
            amount: delivered,
            shortfall,
        }
        .emit();

        Ok(WithdrawOutcome {
            shares_burned,
            requested,
            delivered,
            shortfall,
        })
    }

    /// Walk the withdrawal queue until idle covers `value`; returns the new idle balance
    fn pull_from_strategies(
        &mut self,
        value: u64,
        token: &mut dyn AssetToken,
        strategies: &mut [&mut dyn StrategyRunner],
        clock: &Clock,
    ) -> Result<u64, ProgramError> {
        let vault = self.state.address;
        let mut idle = token.balance_of(&vault);

        for address in self.state.withdrawal_queue.clone() {
            if value <= idle {
                break;
            }

            let debt = self.strategy_params(&address)?.total_debt;
            let amount_needed = (value - idle).min(debt);
            if amount_needed == 0 {
                continue;
            }

            let runner = match strategies.iter_mut().find(|s| s.address() == address) {
                Some(runner) => runner,
                None => {
                    msg!("Strategy {} not supplied, skipping", address);
                    continue;
                }
            };

            if let Err(err) = runner.withdraw(&vault, amount_needed, token, clock) {
                msg!("Strategy {} failed to free {}: {:?}", address, amount_needed, err);
                continue;
            }

            let after = token.balance_of(&vault);
            let withdrawn = after.saturating_sub(idle).min(debt);
            idle = after;

            let params = self.strategy_params_mut(&address)?;
            params.total_debt = checked_sub(params.total_debt, withdrawn)?;
            self.state.total_debt = checked_sub(self.state.total_debt, withdrawn)?;

            msg!("Pulled {} from strategy {}", withdrawn, address);
        }

        Ok(idle)
    }
}
