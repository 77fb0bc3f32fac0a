//! Property tests for the status evaluator and effects mapper.

use chrono::{DateTime, Duration, TimeZone, Utc};
use contract_guard_core::{
    evaluate, ContractConfig, ContractSettings, DegradationEffects, GuardProfile, GuardTier,
};
use proptest::prelude::*;

fn due() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 30, 23, 59, 59).unwrap()
}

fn config(grace_days: u32) -> ContractConfig {
    ContractConfig::try_from(ContractSettings::new("2025-09-30T23:59:59", i64::from(grace_days)))
        .unwrap()
}

const SPAN_SECS: i64 = 60 * 60 * 24 * 60;

proptest! {
    #[test]
    fn before_due_is_always_active(grace in 0u32..30, secs_before in 1i64..SPAN_SECS) {
        let status = evaluate(&config(grace), due() - Duration::seconds(secs_before));
        prop_assert_eq!(status.tier, GuardTier::Active);
        prop_assert!(!status.is_overdue);
        for profile in [GuardProfile::Standard, GuardProfile::Lite] {
            prop_assert_eq!(
                DegradationEffects::for_status(&status, profile),
                DegradationEffects::NONE
            );
        }
    }

    #[test]
    fn severity_never_improves_as_time_advances(
        grace in 0u32..30,
        a in -SPAN_SECS..SPAN_SECS,
        b in -SPAN_SECS..SPAN_SECS,
    ) {
        let cfg = config(grace);
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let first = evaluate(&cfg, due() + Duration::seconds(early));
        let second = evaluate(&cfg, due() + Duration::seconds(late));
        prop_assert!(first.tier <= second.tier);
        prop_assert!(first.fade_level >= second.fade_level);
        prop_assert!(first.days_late <= second.days_late);
    }

    #[test]
    fn grace_fade_never_drops_below_floor(grace in 0u32..60, secs in 0i64..SPAN_SECS) {
        let status = evaluate(&config(grace), due() + Duration::seconds(secs));
        if status.tier == GuardTier::Grace {
            prop_assert!(status.fade_level >= 0.6);
            prop_assert!(status.fade_level <= 1.0);
        }
        prop_assert!(status.fade_level > 0.0);
    }

    #[test]
    fn evaluation_is_deterministic(grace in 0u32..30, secs in -SPAN_SECS..SPAN_SECS) {
        let cfg = config(grace);
        let now = due() + Duration::seconds(secs);
        prop_assert_eq!(evaluate(&cfg, now), evaluate(&cfg, now));
    }
}
