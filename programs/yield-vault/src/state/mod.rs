pub mod report;
pub mod strategy_params;
pub mod vault_state;

pub use report::*;
pub use strategy_params::*;
pub use vault_state::*;
