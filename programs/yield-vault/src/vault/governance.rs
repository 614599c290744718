//! Governance controls
//!
//! Role management, fee parameters, the deposit limit and emergency shutdown.

use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::{MAX_MANAGEMENT_FEE_BPS, MAX_PERFORMANCE_FEE_BPS},
    error::{error_msg, VaultError},
    events::{self, Event},
};

use super::Vault;

impl Vault {
    /// Nominate a new governance; takes effect once accepted
    pub fn set_governance(&mut self, caller: &Pubkey, governance: &Pubkey) -> Result<(), ProgramError> {
        self.only_governance(caller)?;
        self.state.pending_governance = Some(*governance);

        msg!("Governance transfer proposed to {}", governance);
        Ok(())
    }

    pub fn accept_governance(&mut self, caller: &Pubkey) -> Result<(), ProgramError> {
        match self.state.pending_governance {
            Some(pending) if pending == *caller => {}
            Some(_) => return Err(VaultError::Unauthorized.into()),
            None => return error_msg(VaultError::NoPendingGovernance, "no governance nominated"),
        }

        self.state.governance = *caller;
        self.state.pending_governance = None;

        msg!("Governance accepted by {}", caller);
        events::UpdateGovernance { governance: *caller }.emit();

        Ok(())
    }

    pub fn pending_governance(&self) -> Option<Pubkey> {
        self.state.pending_governance
    }

    pub fn set_guardian(&mut self, caller: &Pubkey, guardian: &Pubkey) -> Result<(), ProgramError> {
        if *caller != self.state.governance && *caller != self.state.guardian {
            return Err(VaultError::Unauthorized.into());
        }

        self.state.guardian = *guardian;
        events::UpdateGuardian { guardian: *guardian }.emit();

        Ok(())
    }

    pub fn set_rewards(&mut self, caller: &Pubkey, rewards: &Pubkey) -> Result<(), ProgramError> {
        self.only_governance(caller)?;

        if *rewards == self.state.address || *rewards == Pubkey::default() {
            return Err(VaultError::InvalidRecipient.into());
        }

        self.state.rewards = *rewards;
        events::UpdateRewards { rewards: *rewards }.emit();

        Ok(())
    }

    pub fn set_deposit_limit(&mut self, caller: &Pubkey, deposit_limit: u64) -> Result<(), ProgramError> {
        self.only_governance(caller)?;
        self.state.config.deposit_limit = deposit_limit;

        msg!("Deposit limit set to {}", deposit_limit);
        events::UpdateDepositLimit { deposit_limit }.emit();

        Ok(())
    }

    pub fn set_management_fee(&mut self, caller: &Pubkey, management_fee: u64) -> Result<(), ProgramError> {
        self.only_governance(caller)?;

        if management_fee > MAX_MANAGEMENT_FEE_BPS {
            return Err(VaultError::FeeAboveMaximum.into());
        }

        self.state.config.management_fee = management_fee;
        events::UpdateManagementFee { management_fee }.emit();

        Ok(())
    }

    pub fn set_performance_fee(&mut self, caller: &Pubkey, performance_fee: u64) -> Result<(), ProgramError> {
        self.only_governance(caller)?;

        if performance_fee > MAX_PERFORMANCE_FEE_BPS {
            return Err(VaultError::FeeAboveMaximum.into());
        }

        self.state.config.performance_fee = performance_fee;
        events::UpdatePerformanceFee { performance_fee }.emit();

        Ok(())
    }

    /// Guardian or governance may activate; only governance may lift it
    pub fn set_emergency_shutdown(&mut self, caller: &Pubkey, active: bool) -> Result<(), ProgramError> {
        let is_governance = *caller == self.state.governance;
        let is_guardian = *caller == self.state.guardian;

        let allowed = if active {
            is_governance || is_guardian
        } else {
            is_governance
        };
        if !allowed {
            msg!("Caller {} may not set emergency shutdown to {}", caller, active);
            return Err(VaultError::Unauthorized.into());
        }

        self.state.emergency_shutdown = active;

        msg!("Emergency shutdown: {}", active);
        events::EmergencyShutdown { active }.emit();

        Ok(())
    }
}
