#![allow(dead_code)]

use solana_program::pubkey::Pubkey;
use yield_vault::{
    AccruingYieldSource, AssetToken, HarvestReport, InMemoryToken, SimulatedChain, Strategy,
    StrategyRunner, Vault, VaultConfig, WithdrawOutcome, YieldSource,
};

pub const GENESIS_TIMESTAMP: i64 = 1_600_000_000;
pub const WHALE_FUNDS: u64 = 2_000_000_000_000;
pub const INITIAL_DEPOSIT: u64 = 1_000_000_000_000;
pub const YIELD_RESERVE: u64 = 1_000_000_000_000;
pub const SAMPLE_BLOCKS: u64 = 200;
pub const DEFAULT_APR_BPS: u64 = 1_000;
pub const STRATEGIST_FEE_BPS: u64 = 50;

pub struct TestEnv {
    pub chain: SimulatedChain,
    pub token: InMemoryToken,
    pub vault: Vault,
    pub strategy: Strategy<AccruingYieldSource>,
    pub gov: Pubkey,
    pub guardian: Pubkey,
    pub strategist: Pubkey,
    pub keeper: Pubkey,
    pub whale: Pubkey,
}

impl TestEnv {
    pub fn strategy_address(&self) -> Pubkey {
        self.strategy.address()
    }

    pub fn strategy_debt(&self) -> u64 {
        self.vault
            .strategies(&self.strategy.address())
            .map(|params| params.total_debt)
            .unwrap_or_default()
    }

    pub fn estimated_total_assets(&self) -> u64 {
        self.strategy
            .estimated_total_assets(&self.token, self.chain.clock())
            .unwrap()
    }

    pub fn price_per_share(&self) -> u64 {
        self.vault.price_per_share(&self.token).unwrap()
    }
}

/// Whale has deposited, strategy registered at 50% of supply with a 0.1% rate limit
pub fn setup() -> TestEnv {
    let supply = WHALE_FUNDS + YIELD_RESERVE;
    setup_with(DEFAULT_APR_BPS, supply / 2, supply / 1_000)
}

pub fn setup_with(apr_bps: u64, debt_limit: u64, rate_limit: u64) -> TestEnv {
    let chain = SimulatedChain::new(GENESIS_TIMESTAMP);
    let mut token = InMemoryToken::new(Pubkey::new_unique(), 6);

    let gov = Pubkey::new_unique();
    let guardian = Pubkey::new_unique();
    let strategist = Pubkey::new_unique();
    let keeper = Pubkey::new_unique();
    let whale = Pubkey::new_unique();

    let config = VaultConfig {
        management_fee: 0,
        ..VaultConfig::new("yvUSDC-Vault", "yvUSDC")
    };
    let mut vault = Vault::new(
        Pubkey::new_unique(),
        &token,
        gov,
        gov,
        guardian,
        config,
        chain.clock(),
    )
    .unwrap();

    token.mint(&whale, WHALE_FUNDS).unwrap();
    token.approve(&whale, &vault.address(), u64::MAX).unwrap();
    vault
        .deposit(&whale, INITIAL_DEPOSIT, &mut token, chain.clock())
        .unwrap();
    assert_eq!(token.balance_of(&vault.address()), INITIAL_DEPOSIT);
    assert_eq!(vault.balance_of(&whale), INITIAL_DEPOSIT);
    assert_eq!(vault.total_debt(), 0);

    let source = AccruingYieldSource::new(Pubkey::new_unique(), apr_bps, chain.clock());
    token.mint(&source.address(), YIELD_RESERVE).unwrap();

    let mut strategy =
        Strategy::new(Pubkey::new_unique(), &vault, strategist, source, &mut token).unwrap();
    strategy.set_keeper(&strategist, &keeper, &vault).unwrap();
    vault
        .add_strategy(
            &gov,
            &strategy.address(),
            debt_limit,
            rate_limit,
            STRATEGIST_FEE_BPS,
            chain.clock(),
        )
        .unwrap();

    TestEnv {
        chain,
        token,
        vault,
        strategy,
        gov,
        guardian,
        strategist,
        keeper,
        whale,
    }
}

/// Let `SAMPLE_BLOCKS` blocks and their wall-clock time pass
pub fn sleep(env: &mut TestEnv) {
    env.chain.advance_blocks(SAMPLE_BLOCKS);
}

pub fn harvest(env: &mut TestEnv) -> HarvestReport {
    env.strategy
        .harvest(&env.keeper, &mut env.vault, &mut env.token, env.chain.clock())
        .unwrap()
}

/// Redeem `shares` of `owner`, letting the vault pull from the strategy
pub fn withdraw(env: &mut TestEnv, owner: &Pubkey, shares: u64) -> WithdrawOutcome {
    let mut runners: [&mut dyn StrategyRunner; 1] = [&mut env.strategy];
    env.vault
        .withdraw(
            owner,
            shares,
            owner,
            &mut env.token,
            &mut runners,
            env.chain.clock(),
        )
        .unwrap()
}
