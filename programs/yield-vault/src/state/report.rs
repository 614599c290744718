use solana_program::{clock::Epoch, pubkey::Pubkey};

/// Outcome of a single strategy report, consumed by the harvest that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestReport {
    pub strategy: Pubkey,
    pub gain: u64,
    pub loss: u64,
    /// Debt repaid, after clamping to what was outstanding
    pub debt_payment: u64,
    /// New credit extended during this report
    pub credit: u64,
    /// Debt the strategy should free before its next report
    pub debt_outstanding: u64,
    /// Strategy debt after the report
    pub total_debt: u64,
    /// Fee shares minted to rewards and the strategist
    pub fee_shares: u64,
    pub epoch: Epoch,
}

/// Result of a share redemption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawOutcome {
    pub shares_burned: u64,
    /// Asset value of the shares requested
    pub requested: u64,
    /// Asset actually sent to the recipient
    pub delivered: u64,
    /// Value that strategies could not free
    pub shortfall: u64,
}

impl WithdrawOutcome {
    pub fn is_partial(&self) -> bool {
        self.shortfall > 0
    }
}
