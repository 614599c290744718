mod common;

use common::*;
use proptest::prelude::*;
use solana_program::pubkey::Pubkey;
use yield_vault::AssetToken;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_deposit_then_withdraw_returns_amount(amount in 1u64..=1_000_000_000_000) {
        let mut env = setup();
        let user = Pubkey::new_unique();
        let vault = env.vault.address();
        env.token.mint(&user, amount).unwrap();
        env.token.approve(&user, &vault, amount).unwrap();

        let shares = env
            .vault
            .deposit(&user, amount, &mut env.token, env.chain.clock())
            .unwrap();
        let outcome = withdraw(&mut env, &user, shares);

        prop_assert_eq!(outcome.delivered, amount);
        prop_assert_eq!(env.token.balance_of(&user), amount);
        prop_assert_eq!(env.vault.balance_of(&user), 0);
    }

    #[test]
    fn test_idle_vault_keeps_unit_price(
        ops in prop::collection::vec((any::<bool>(), 1u64..1_000_000_000), 1..20)
    ) {
        let mut env = setup();
        let user = Pubkey::new_unique();
        let vault = env.vault.address();
        env.token.mint(&user, 1_000_000_000_000).unwrap();
        env.token.approve(&user, &vault, u64::MAX).unwrap();

        let mut deposited = INITIAL_DEPOSIT;
        for (is_deposit, amount) in ops {
            if is_deposit {
                env.vault
                    .deposit(&user, amount, &mut env.token, env.chain.clock())
                    .unwrap();
                deposited += amount;
            } else {
                let shares = amount.min(env.vault.balance_of(&user));
                if shares == 0 {
                    continue;
                }
                let outcome = withdraw(&mut env, &user, shares);
                deposited -= outcome.delivered;
            }

            prop_assert_eq!(env.token.balance_of(&vault), deposited);
            prop_assert_eq!(env.price_per_share(), 1_000_000);
        }
    }

    #[test]
    fn test_credit_within_limits(
        debt_limit in 1u64..2_000_000_000_000,
        rate_limit in 0u64..50_000_000_000,
        rounds in 1usize..6,
    ) {
        let mut env = setup_with(DEFAULT_APR_BPS, debt_limit, rate_limit);
        let strategy = env.strategy_address();

        for _ in 0..rounds {
            sleep(&mut env);

            let params = env.vault.strategies(&strategy).unwrap().clone();
            let credit = env
                .vault
                .credit_available(&strategy, &env.token, env.chain.clock())
                .unwrap();
            let bound = params
                .debt_limit
                .saturating_sub(params.total_debt)
                .min(params.rate_limit);
            prop_assert!(credit <= bound);

            let report = harvest(&mut env);
            prop_assert!(report.credit <= credit);
            prop_assert!(report.total_debt <= params.debt_limit);
        }
    }

    #[test]
    fn test_profitable_source_never_lowers_price(
        apr_bps in 1u64..5_000,
        rounds in 2usize..6,
    ) {
        let supply = WHALE_FUNDS + YIELD_RESERVE;
        let mut env = setup_with(apr_bps, supply / 2, supply / 1_000);

        sleep(&mut env);
        harvest(&mut env);
        let mut assets = env.estimated_total_assets();
        let mut price = env.price_per_share();

        for _ in 0..rounds {
            sleep(&mut env);
            harvest(&mut env);

            let next_assets = env.estimated_total_assets();
            let next_price = env.price_per_share();
            prop_assert!(next_assets >= assets);
            prop_assert!(next_price >= price);
            assets = next_assets;
            price = next_price;
        }
    }
}
