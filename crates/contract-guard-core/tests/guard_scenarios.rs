//! Integration tests for the contract guard.
//!
//! Walks a contract through its whole lifetime: evaluator, effects and the
//! presentation shell together.

use chrono::{DateTime, Duration, TimeZone, Utc};
use contract_guard_core::{
    evaluate, ContractConfig, ContractSettings, DegradationEffects, GuardProfile, GuardTier,
    PresentationShell,
};

fn due() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 30, 23, 59, 59).unwrap()
}

fn config() -> ContractConfig {
    ContractConfig::try_from(
        ContractSettings::new("2025-09-30T23:59:59", 3)
            .with_labels("UGEL Arequipa Norte", "Portal de Convocatorias")
            .with_contact(Some("+51 954 000 111"), Some("soporte@example.com"))
            .with_amount(2400.0, "PEN"),
    )
    .unwrap()
}

#[test]
fn test_overdue_scenario() {
    let cfg = config();

    let warning = evaluate(&cfg, Utc.with_ymd_and_hms(2025, 10, 4, 0, 0, 1).unwrap());
    assert_eq!(warning.tier, GuardTier::Warning);
    assert_eq!(warning.days_late, 4);
    assert!(warning.is_overdue);
    assert!(!warning.is_in_grace);

    let blocked = evaluate(&cfg, Utc.with_ymd_and_hms(2025, 10, 9, 0, 0, 1).unwrap());
    assert_eq!(blocked.tier, GuardTier::Blocked);

    let effects = DegradationEffects::for_status(&blocked, cfg.profile());
    assert!(!effects.pointer_events_enabled);

    let view = PresentationShell::new(cfg).view(&blocked);
    assert!(view.modal.is_some());
    assert!(!view.is_interactive());
}

#[test]
fn test_boundary_exactness() {
    let cfg = config();

    let at_due = evaluate(&cfg, due());
    assert_eq!(at_due.tier, GuardTier::Grace);
    assert_eq!(at_due.days_late, 0);
    assert_eq!(at_due.fade_level, 1.0);

    let one_second = Duration::seconds(1);
    assert_eq!(evaluate(&cfg, due() + Duration::days(3) + one_second).tier, GuardTier::Warning);
    assert_eq!(evaluate(&cfg, due() + Duration::days(5) + one_second).tier, GuardTier::Critical);
    assert_eq!(evaluate(&cfg, due() + Duration::days(8) + one_second).tier, GuardTier::Blocked);
}

#[test]
fn test_pre_deadline_has_no_effects_or_overlays() {
    let cfg = config();
    let shell = PresentationShell::new(cfg.clone());

    for hours_before in [1, 24, 24 * 30, 24 * 365] {
        let status = evaluate(&cfg, due() - Duration::hours(hours_before));
        assert_eq!(status.tier, GuardTier::Active);
        assert_eq!(
            DegradationEffects::for_status(&status, GuardProfile::Standard),
            DegradationEffects::NONE
        );
        let view = shell.view(&status);
        assert!(view.notification.is_none());
        assert!(view.modal.is_none());
        assert!(view.debug.is_none());
    }
}

#[test]
fn test_evaluation_is_idempotent() {
    let cfg = config();
    let now = due() + Duration::days(2) + Duration::minutes(17);
    assert_eq!(evaluate(&cfg, now), evaluate(&cfg, now));
}

#[test]
fn test_extending_due_date_lifts_the_block() {
    let now = due() + Duration::days(12);
    assert_eq!(evaluate(&config(), now).tier, GuardTier::Blocked);

    let extended = ContractConfig::try_from(
        ContractSettings::new("2025-10-31T23:59:59", 3)
            .with_labels("UGEL Arequipa Norte", "Portal de Convocatorias"),
    )
    .unwrap();
    let status = evaluate(&extended, now);
    assert_eq!(status.tier, GuardTier::Active);
    assert!(PresentationShell::new(extended).view(&status).is_interactive());
}

#[test]
fn test_notification_details_follow_status() {
    let cfg = config();
    let status = evaluate(&cfg, due() + Duration::days(6));
    let view = PresentationShell::new(cfg).view(&status);

    let notification = view.notification.expect("critical shows a notification");
    assert_eq!(notification.tier, GuardTier::Critical);
    assert_eq!(notification.details.client_label, "UGEL Arequipa Norte");
    assert_eq!(notification.details.days_late, 6);
    assert_eq!(notification.details.hours_late, 144);
    assert_eq!(notification.details.amount.as_deref(), Some("2400.00 PEN"));
    assert_eq!(notification.actions.len(), 2);
}
