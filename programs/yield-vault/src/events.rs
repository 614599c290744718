//! Event logging for vault and strategy state changes
//!
//! Events are borsh-encoded and written to the program log as base58.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

/// Event type discriminator
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq)]
pub enum EventType {
    // Share ledger events
    Deposit = 1,
    Withdraw = 2,
    Transfer = 3,
    Approval = 4,

    // Debt allocator events
    StrategyAdded = 10,
    StrategyReported = 11,
    StrategyUpdateDebtLimit = 12,
    StrategyUpdateRateLimit = 13,
    StrategyUpdatePerformanceFee = 14,
    StrategyRevoked = 15,
    StrategyAddedToQueue = 16,
    StrategyRemovedFromQueue = 17,

    // Governance events
    UpdateGovernance = 20,
    UpdateGuardian = 21,
    UpdateRewards = 22,
    UpdateDepositLimit = 23,
    UpdateManagementFee = 24,
    UpdatePerformanceFee = 25,
    EmergencyShutdown = 26,

    // Strategy runner events
    Harvested = 30,
    UpdatedKeeper = 31,
    UpdatedStrategist = 32,
    EmergencyExitEnabled = 33,
}

/// Base event trait
pub trait Event: BorshSerialize {
    fn event_type() -> EventType;

    fn emit(&self) {
        msg!("YIELD_VAULT_EVENT");
        msg!("TYPE:{:?}", Self::event_type());

        if let Ok(data) = self.try_to_vec() {
            msg!("DATA:{}", bs58::encode(&data).into_string());
        }
    }
}

/// Define an event struct whose name matches its `EventType` variant
#[macro_export]
macro_rules! define_event {
    ($name:ident { $($field:ident: $type:ty),* $(,)? }) => {
        #[derive(::borsh::BorshSerialize, ::borsh::BorshDeserialize, Debug, Clone, PartialEq)]
        pub struct $name {
            $(pub $field: $type,)*
        }

        impl $crate::events::Event for $name {
            fn event_type() -> $crate::events::EventType {
                $crate::events::EventType::$name
            }
        }
    };
}

define_event!(Deposit {
    depositor: Pubkey,
    amount: u64,
    shares: u64,
});

define_event!(Withdraw {
    owner: Pubkey,
    recipient: Pubkey,
    shares: u64,
    amount: u64,
    shortfall: u64,
});

define_event!(Transfer {
    from: Pubkey,
    to: Pubkey,
    shares: u64,
});

define_event!(Approval {
    owner: Pubkey,
    spender: Pubkey,
    shares: u64,
});

define_event!(StrategyAdded {
    strategy: Pubkey,
    debt_limit: u64,
    rate_limit: u64,
    performance_fee: u64,
});

define_event!(StrategyReported {
    strategy: Pubkey,
    gain: u64,
    loss: u64,
    debt_payment: u64,
    credit: u64,
    total_gain: u64,
    total_loss: u64,
    total_debt: u64,
    debt_limit: u64,
});

define_event!(StrategyUpdateDebtLimit {
    strategy: Pubkey,
    debt_limit: u64,
});

define_event!(StrategyUpdateRateLimit {
    strategy: Pubkey,
    rate_limit: u64,
});

define_event!(StrategyUpdatePerformanceFee {
    strategy: Pubkey,
    performance_fee: u64,
});

define_event!(StrategyRevoked { strategy: Pubkey });

define_event!(StrategyAddedToQueue { strategy: Pubkey });

define_event!(StrategyRemovedFromQueue { strategy: Pubkey });

define_event!(UpdateGovernance { governance: Pubkey });

define_event!(UpdateGuardian { guardian: Pubkey });

define_event!(UpdateRewards { rewards: Pubkey });

define_event!(UpdateDepositLimit { deposit_limit: u64 });

define_event!(UpdateManagementFee { management_fee: u64 });

define_event!(UpdatePerformanceFee { performance_fee: u64 });

define_event!(EmergencyShutdown { active: bool });

define_event!(Harvested {
    profit: u64,
    loss: u64,
    debt_payment: u64,
    debt_outstanding: u64,
});

define_event!(UpdatedKeeper { keeper: Pubkey });

define_event!(UpdatedStrategist { strategist: Pubkey });

define_event!(EmergencyExitEnabled { strategy: Pubkey });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_mapping() {
        assert_eq!(Deposit::event_type(), EventType::Deposit);
        assert_eq!(StrategyReported::event_type(), EventType::StrategyReported);
        assert_eq!(EmergencyExitEnabled::event_type(), EventType::EmergencyExitEnabled);
    }

    #[test]
    fn test_event_payload_decodes() {
        let event = Deposit {
            depositor: Pubkey::new_unique(),
            amount: 1_000,
            shares: 1_000,
        };
        event.emit();

        let bytes = event.try_to_vec().unwrap();
        let decoded = Deposit::try_from_slice(&bytes).unwrap();
        assert_eq!(decoded, event);
    }
}
