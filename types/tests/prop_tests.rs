use proptest::prelude::*;

use agora_types::{BlockHeight, Bps, CoinBag};

fn coin_bag() -> impl Strategy<Value = CoinBag> {
    prop::collection::vec((prop::sample::select(vec!["agr", "atom", "btc"]), 0u128..1_000_000), 0..4)
        .prop_map(|coins| {
            coins.into_iter().fold(CoinBag::new(), |bag, (denom, amount)| {
                bag.checked_add(&CoinBag::single(denom, amount)).unwrap()
            })
        })
}

proptest! {
    /// BlockHeight ordering: new(a) <= new(b) iff a <= b, and key bytes sort the same way.
    #[test]
    fn height_ordering_matches_key_bytes(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ha = BlockHeight::new(a);
        let hb = BlockHeight::new(b);
        prop_assert_eq!(ha <= hb, a <= b);
        prop_assert_eq!(ha.to_be_bytes() <= hb.to_be_bytes(), a <= b);
    }

    /// BlockHeight has_expired agrees with manual arithmetic.
    #[test]
    fn height_has_expired_correct(
        start in 0u64..500_000,
        period in 1u64..500_000,
        offset in 0u64..1_000_000,
    ) {
        let h = BlockHeight::new(start);
        let now = BlockHeight::new(start + offset);
        prop_assert_eq!(h.has_expired(period, now), offset >= period);
    }

    /// (a + b) - b == a for coin bags.
    #[test]
    fn coin_bag_add_then_sub(a in coin_bag(), b in coin_bag()) {
        let sum = a.checked_add(&b).unwrap();
        prop_assert!(sum.is_all_gte(&a));
        prop_assert!(sum.is_all_gte(&b));
        prop_assert_eq!(sum.checked_sub(&b), Some(a));
    }

    /// Addition is commutative regardless of denomination order.
    #[test]
    fn coin_bag_add_commutes(a in coin_bag(), b in coin_bag()) {
        prop_assert_eq!(a.checked_add(&b).unwrap(), b.checked_add(&a).unwrap());
    }

    /// Display and parse agree.
    #[test]
    fn coin_bag_display_parses_back(a in coin_bag()) {
        let parsed: CoinBag = a.to_string().parse().unwrap();
        prop_assert_eq!(parsed, a);
    }

    /// Applying a fraction never yields more than the input.
    #[test]
    fn bps_apply_bounded(bps in 0u32..=10_000, value in 0u128..u64::MAX as u128) {
        let fraction = Bps::new(bps).unwrap();
        prop_assert!(fraction.apply(value) <= value);
    }
}
