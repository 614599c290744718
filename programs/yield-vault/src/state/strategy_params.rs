use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::clock::{Epoch, UnixTimestamp};

/// Per-strategy debt record kept by the vault
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct StrategyParams {
    /// Strategist share of realized gain, in basis points
    pub performance_fee: u64,

    /// Registration timestamp
    pub activation: UnixTimestamp,

    /// Maximum assets the strategy may borrow
    pub debt_limit: u64,

    /// Maximum additional draw per epoch
    pub rate_limit: u64,

    /// Timestamp of the last report
    pub last_report: UnixTimestamp,

    /// Outstanding debt
    pub total_debt: u64,

    /// Lifetime realized gain
    pub total_gain: u64,

    /// Lifetime realized loss
    pub total_loss: u64,

    /// Epoch the draw tracker refers to
    pub draw_epoch: Epoch,

    /// Credit already drawn during `draw_epoch`
    pub drawn_in_epoch: u64,
}

/// Lifecycle of a registered strategy
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyStatus {
    /// Registered, no outstanding debt
    Active,
    /// Registered and holding vault assets
    ActiveWithDebt,
    /// Debt limit is zero; remaining debt is wound down on harvest
    Revoked,
}

impl StrategyParams {
    pub fn new(
        debt_limit: u64,
        rate_limit: u64,
        performance_fee: u64,
        activation: UnixTimestamp,
        epoch: Epoch,
    ) -> Self {
        Self {
            performance_fee,
            activation,
            debt_limit,
            rate_limit,
            last_report: activation,
            total_debt: 0,
            total_gain: 0,
            total_loss: 0,
            draw_epoch: epoch,
            drawn_in_epoch: 0,
        }
    }

    pub fn status(&self) -> StrategyStatus {
        if self.debt_limit == 0 {
            StrategyStatus::Revoked
        } else if self.total_debt > 0 {
            StrategyStatus::ActiveWithDebt
        } else {
            StrategyStatus::Active
        }
    }

    /// Credit still drawable in `epoch` under the rate limit
    pub fn rate_headroom(&self, epoch: Epoch) -> u64 {
        if epoch != self.draw_epoch {
            self.rate_limit
        } else {
            self.rate_limit.saturating_sub(self.drawn_in_epoch)
        }
    }

    /// Record a draw against the rate limit of `epoch`
    pub fn record_draw(&mut self, epoch: Epoch, amount: u64) {
        if epoch != self.draw_epoch {
            self.draw_epoch = epoch;
            self.drawn_in_epoch = 0;
        }
        self.drawn_in_epoch = self.drawn_in_epoch.saturating_add(amount);
    }
}
