mod common;

use common::*;
use solana_program::pubkey::Pubkey;
use yield_vault::{AssetToken, StrategyRunner, StrategyStatus, VaultError};

#[test]
fn test_vault_deposit() {
    let mut env = setup();
    let whale = env.whale;

    let before = env.vault.balance_of(&whale);
    let deposit = env.token.balance_of(&whale);
    env.vault
        .deposit(&whale, deposit, &mut env.token, env.chain.clock())
        .unwrap();

    let vault = env.vault.address();
    assert_eq!(env.vault.balance_of(&whale), before + deposit);
    assert_eq!(env.token.balance_of(&vault), before + deposit);
    assert_eq!(env.vault.total_debt(), 0);
    assert_eq!(env.price_per_share(), 10u64.pow(env.token.decimals() as u32));
}

#[test]
fn test_vault_withdraw() {
    let mut env = setup();
    let whale = env.whale;

    let balance = env.token.balance_of(&whale) + env.vault.balance_of(&whale);
    let shares = env.vault.balance_of(&whale);
    let outcome = withdraw(&mut env, &whale, shares);

    let vault = env.vault.address();
    assert!(!outcome.is_partial());
    assert_eq!(env.vault.total_supply(), 0);
    assert_eq!(env.token.balance_of(&vault), 0);
    assert_eq!(env.vault.total_debt(), 0);
    assert_eq!(env.token.balance_of(&whale), balance);
}

#[test]
fn test_strategy_harvest() {
    let mut env = setup();
    let whale = env.whale;
    let user_before = env.token.balance_of(&whale) + env.vault.balance_of(&whale);
    let strategy = env.strategy_address();

    sleep(&mut env);
    let credit = env
        .vault
        .credit_available(&strategy, &env.token, env.chain.clock())
        .unwrap();
    assert!(credit > 0);

    // Give the strategy some debt
    let report = harvest(&mut env);
    assert!(report.total_debt <= env.vault.strategies(&strategy).unwrap().rate_limit);
    let before = env.estimated_total_assets();
    let mut price = env.price_per_share();

    // Run the strategy for a while
    for _ in 0..3 {
        sleep(&mut env);
        harvest(&mut env);
        harvest(&mut env);

        let next = env.price_per_share();
        assert!(next >= price);
        price = next;
    }

    let after = env.estimated_total_assets();
    assert!(after > before);

    let shares = env.vault.balance_of(&whale);
    let outcome = withdraw(&mut env, &whale, shares);
    assert!(!outcome.is_partial());
    assert!(env.token.balance_of(&whale) >= user_before);
}

#[test]
fn test_strategy_withdraw() {
    let mut env = setup();
    let whale = env.whale;
    let user_before = env.token.balance_of(&whale) + env.vault.balance_of(&whale);

    let remaining = env.token.balance_of(&whale);
    env.vault
        .deposit(&whale, remaining, &mut env.token, env.chain.clock())
        .unwrap();

    // First harvest adds initial deposits
    sleep(&mut env);
    harvest(&mut env);
    let initial_deposits = env.estimated_total_assets();

    // Later harvests secure profits and draw more credit
    sleep(&mut env);
    harvest(&mut env);
    sleep(&mut env);
    harvest(&mut env);
    let deposits_after_savings = env.estimated_total_assets();
    assert!(deposits_after_savings > initial_deposits);

    let shares = env.vault.balance_of(&whale);
    withdraw(&mut env, &whale, shares);
    assert!(env.token.balance_of(&whale) >= user_before);
}

#[test]
fn test_rate_limit_spreads_draws_over_epochs() {
    let mut env = setup();
    let strategy = env.strategy_address();
    let rate_limit = env.vault.strategies(&strategy).unwrap().rate_limit;

    sleep(&mut env);
    harvest(&mut env);
    assert_eq!(env.strategy_debt(), rate_limit);

    // Same epoch, no new credit
    let report = harvest(&mut env);
    assert_eq!(report.credit, 0);
    assert_eq!(env.strategy_debt(), rate_limit);

    sleep(&mut env);
    let report = harvest(&mut env);
    assert_eq!(report.credit, rate_limit);
    assert_eq!(env.strategy_debt(), 2 * rate_limit);
}

#[test]
fn test_illiquid_source_repays_over_several_harvests() {
    let mut env = setup();
    let gov = env.gov;
    let strategy = env.strategy_address();

    sleep(&mut env);
    harvest(&mut env);
    let debt = env.strategy_debt();
    assert!(debt > 0);

    env.vault.revoke_strategy(&gov, &strategy).unwrap();
    env.strategy.yield_source_mut().set_liquidity_cap(Some(debt / 3));

    sleep(&mut env);
    let report = harvest(&mut env);
    assert!(report.debt_payment > 0);
    assert!(report.debt_payment < debt);
    assert!(report.debt_outstanding > 0);
    assert_eq!(report.debt_outstanding, env.strategy_debt());

    let mut harvests = 1;
    while env.strategy_debt() > 0 {
        assert!(harvests < 10, "debt never wound down");
        sleep(&mut env);
        harvest(&mut env);
        harvests += 1;
    }

    let params = env.vault.strategies(&strategy).unwrap();
    assert_eq!(params.status(), StrategyStatus::Revoked);
    assert_eq!(env.vault.total_debt(), 0);
    assert_eq!(
        env.vault
            .credit_available(&strategy, &env.token, env.chain.clock())
            .unwrap(),
        0
    );
}

#[test]
fn test_revoked_strategy_winds_down() {
    let mut env = setup();
    let gov = env.gov;
    let strategy = env.strategy_address();

    sleep(&mut env);
    harvest(&mut env);
    sleep(&mut env);
    harvest(&mut env);
    assert!(env.strategy_debt() > 0);

    env.vault.revoke_strategy(&gov, &strategy).unwrap();
    assert_eq!(
        env.vault.debt_outstanding(&strategy).unwrap(),
        env.strategy_debt()
    );

    sleep(&mut env);
    let report = harvest(&mut env);
    assert_eq!(report.credit, 0);
    assert_eq!(report.debt_outstanding, 0);
    assert_eq!(env.strategy_debt(), 0);
    assert_eq!(env.estimated_total_assets(), 0);
}

#[test]
fn test_loss_lowers_share_price() {
    let mut env = setup();
    sleep(&mut env);
    harvest(&mut env);

    let debt = env.strategy_debt();
    let price = env.price_per_share();
    let clock = env.chain.clock().clone();
    env.strategy
        .yield_source_mut()
        .write_down(debt / 2, &clock)
        .unwrap();

    let report = harvest(&mut env);
    assert_eq!(report.loss, debt / 2);
    assert_eq!(report.gain, 0);
    assert_eq!(env.strategy_debt(), debt - debt / 2);
    assert!(env.price_per_share() < price);
    assert_eq!(env.vault.strategies(&env.strategy_address()).unwrap().total_loss, debt / 2);
}

#[test]
fn test_emergency_shutdown_recalls_debt() {
    let mut env = setup();
    let guardian = env.guardian;
    let whale = env.whale;
    let strategy = env.strategy_address();

    sleep(&mut env);
    harvest(&mut env);
    assert!(env.strategy_debt() > 0);

    env.vault.set_emergency_shutdown(&guardian, true).unwrap();
    assert_eq!(
        env.vault
            .credit_available(&strategy, &env.token, env.chain.clock())
            .unwrap(),
        0
    );
    assert_eq!(
        env.vault.deposit(&whale, 1, &mut env.token, env.chain.clock()),
        Err(VaultError::EmergencyShutdownActive.into())
    );

    sleep(&mut env);
    let report = harvest(&mut env);
    assert_eq!(report.credit, 0);
    assert_eq!(env.vault.total_debt(), 0);

    // Withdrawals keep working
    let shares = env.vault.balance_of(&whale);
    let outcome = withdraw(&mut env, &whale, shares);
    assert!(!outcome.is_partial());
}

#[test]
fn test_emergency_exit_returns_all_funds() {
    let mut env = setup();
    let strategist = env.strategist;

    sleep(&mut env);
    harvest(&mut env);
    sleep(&mut env);

    env.strategy
        .set_emergency_exit(&strategist, &mut env.vault)
        .unwrap();
    let report = harvest(&mut env);

    assert!(report.gain > 0);
    assert_eq!(env.vault.total_debt(), 0);
    assert_eq!(env.estimated_total_assets(), 0);
    assert_eq!(
        env.vault.strategies(&env.strategy_address()).unwrap().status(),
        StrategyStatus::Revoked
    );
}

#[test]
fn test_withdraw_shortfall_is_reported() {
    let mut env = setup();
    let whale = env.whale;
    let vault = env.vault.address();

    sleep(&mut env);
    harvest(&mut env);
    let debt = env.strategy_debt();
    let idle = env.token.balance_of(&vault);

    // Strategy cannot free anything
    env.strategy.yield_source_mut().set_liquidity_cap(Some(0));
    let shares = env.vault.balance_of(&whale);
    let outcome = withdraw(&mut env, &whale, shares);

    assert!(outcome.is_partial());
    assert_eq!(outcome.delivered, idle);
    assert_eq!(outcome.shortfall, debt);
    assert_eq!(outcome.shares_burned, idle);
    assert_eq!(env.vault.balance_of(&whale), debt);
    assert_eq!(env.strategy_debt(), debt);

    // Once liquid again the rest comes out
    env.strategy.yield_source_mut().set_liquidity_cap(None);
    let outcome = withdraw(&mut env, &whale, debt);
    assert!(!outcome.is_partial());
    assert_eq!(env.token.balance_of(&whale), WHALE_FUNDS);
    assert_eq!(env.vault.total_supply(), 0);
}

#[test]
fn test_withdraw_skips_strategies_not_supplied() {
    let mut env = setup();
    let whale = env.whale;

    sleep(&mut env);
    harvest(&mut env);
    let debt = env.strategy_debt();

    let shares = env.vault.balance_of(&whale);
    let outcome = env
        .vault
        .withdraw(&whale, shares, &whale, &mut env.token, &mut [], env.chain.clock())
        .unwrap();
    assert_eq!(outcome.shortfall, debt);
}

#[test]
fn test_only_vault_pulls_from_strategy() {
    let mut env = setup();
    let stranger = Pubkey::new_unique();
    assert_eq!(
        env.strategy
            .withdraw(&stranger, 1, &mut env.token, env.chain.clock()),
        Err(VaultError::Unauthorized.into())
    );
}
