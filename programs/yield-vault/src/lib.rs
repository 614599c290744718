// Yield Vault
// Pooled share ledger lending to yield strategies under debt and rate limits

pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod math;
pub mod state;
pub mod strategy;
pub mod token;
pub mod vault;

pub use chain::SimulatedChain;
pub use config::VaultConfig;
pub use error::VaultError;
pub use state::{HarvestReport, StrategyParams, StrategyStatus, WithdrawOutcome};
pub use strategy::{AccruingYieldSource, Strategy, StrategyRunner, YieldSource};
pub use token::{AssetToken, InMemoryToken};
pub use vault::Vault;

// Declare program ID
solana_program::declare_id!("YieLdVau1t111111111111111111111111111111111");
