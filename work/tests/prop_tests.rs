use proptest::prelude::*;

use volt_work::{meets_difficulty, validate_work, PowVariant, WorkConfig, WorkGenerator};

fn variant_strategy() -> impl Strategy<Value = PowVariant> {
    prop_oneof![
        Just(PowVariant::Standard),
        Just(PowVariant::CounterMode),
        Just(PowVariant::Clockwork),
        Just(PowVariant::Feistel),
    ]
}

fn generator(variant: PowVariant) -> WorkGenerator {
    WorkGenerator::new(WorkConfig::new(variant).with_clockwork_rounds(32))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// A returned hash always carries at least `difficulty` leading zeros.
    #[test]
    fn solved_hash_meets_difficulty(
        variant in variant_strategy(),
        payload in "[a-zA-Z0-9|:.]{0,96}",
        difficulty in 0u32..=2,
    ) {
        let g = generator(variant);
        let solution = g.try_solve(&payload, difficulty).unwrap();
        prop_assert!(meets_difficulty(&solution.hash, difficulty));
        prop_assert!(validate_work(&g, &payload, solution.nonce, difficulty));
    }

    /// Same payload, same config: same nonce and hash.
    #[test]
    fn solving_is_deterministic(
        variant in variant_strategy(),
        payload in "[a-z0-9]{1,32}",
    ) {
        let g = generator(variant);
        prop_assert_eq!(g.try_solve(&payload, 1).unwrap(), g.try_solve(&payload, 1).unwrap());
    }

    /// Lower difficulty is easier to meet: if valid at D, then valid at D-1.
    #[test]
    fn lower_difficulty_is_easier(hash in "[0-9a-f]{64}", difficulty in 1u32..=64) {
        if meets_difficulty(&hash, difficulty) {
            prop_assert!(meets_difficulty(&hash, difficulty - 1));
        }
    }

    /// Zero difficulty always passes regardless of nonce.
    #[test]
    fn zero_difficulty_always_passes(
        variant in variant_strategy(),
        payload in "[a-z]{0,16}",
        nonce in 0u64..1_000_000,
    ) {
        prop_assert!(validate_work(&generator(variant), &payload, nonce, 0));
    }
}
