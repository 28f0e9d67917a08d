use appfit_model::{CompatStatus, PackageId, RatingAggregate, SCORE_DENOMINATOR};
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(256))]
    #[test]
    fn tested_aggregates_never_resolve_to_untested(
        score in 0.0f32..=4.0f32,
        total in 1u32..10_000u32,
    ) {
        let agg = RatingAggregate::new(score, SCORE_DENOMINATOR, "native".to_string(), total);
        prop_assert!(agg.status().is_tested());
    }

    #[test]
    fn status_is_monotonic_in_score(
        lo in 0.0f32..=4.0f32,
        hi in 0.0f32..=4.0f32,
        total in 1u32..100u32,
    ) {
        prop_assume!(lo <= hi);
        let a = RatingAggregate::new(lo, SCORE_DENOMINATOR, "native".to_string(), total);
        let b = RatingAggregate::new(hi, SCORE_DENOMINATOR, "native".to_string(), total);
        prop_assert!(a.status().rank() <= b.status().rank());
    }

    #[test]
    fn untested_rank_is_strictly_below_every_tested_rank(
        score in 0.0f32..=4.0f32,
        total in 1u32..100u32,
    ) {
        let agg = RatingAggregate::new(score, SCORE_DENOMINATOR, "native".to_string(), total);
        prop_assert!(agg.status().rank() > CompatStatus::Untested.rank());
    }

    #[test]
    fn package_id_parse_accepts_reverse_dns_shapes(
        id in "[a-z][a-z0-9_]{0,20}(\\.[a-z][a-z0-9_]{0,20}){1,4}",
    ) {
        let parsed = PackageId::parse(&id).expect("reverse-dns id");
        prop_assert_eq!(parsed.as_str(), id.as_str());
    }
}
