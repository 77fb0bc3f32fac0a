//! Status evaluator.
//!
//! A pure mapping from `(ContractConfig, now)` to a [`GuardStatus`]. It is the
//! only place where elapsed time is turned into a severity tier.
//!
//! ## Tiers
//!
//! ```text
//! active ──(now >= due_at)──> grace ──> warning ──> critical ──> blocked
//! ```
//!
//! `days_late` counts started days since `due_at` (not since the end of the
//! grace window). With `over = days_late - grace_days`:
//!
//! - `over <= 0`                          -> grace
//! - `0 < over <= warning_days`           -> warning
//! - `warning_days < over <= critical_days` -> critical
//! - `over > critical_days`               -> blocked

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::{ContractConfig, WARNING_FADE};


pub const CRITICAL_FADE: f64 = 0.2;
pub const BLOCKED_FADE: f64 = 0.05;

/// Severity tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardTier {
    Active,
    Grace,
    Warning,
    Critical,
    Blocked,
}

impl GuardTier {
    pub const ALL: [GuardTier; 5] = [
        GuardTier::Active,
        GuardTier::Grace,
        GuardTier::Warning,
        GuardTier::Critical,
        GuardTier::Blocked,
    ];

    /// Numeric severity (0-4)
    pub fn as_u8(self) -> u8 {
        match self {
            GuardTier::Active => 0,
            GuardTier::Grace => 1,
            GuardTier::Warning => 2,
            GuardTier::Critical => 3,
            GuardTier::Blocked => 4,
        }
    }

    /// Human title used by notifications.
    pub fn title(self) -> &'static str {
        match self {
            GuardTier::Active => "Service active",
            GuardTier::Grace => "Payment overdue",
            GuardTier::Warning => "Grace period expired",
            GuardTier::Critical => "Access about to be blocked",
            GuardTier::Blocked => "Access blocked",
        }
    }
}

impl fmt::Display for GuardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GuardTier::Active => "active",
            GuardTier::Grace => "grace",
            GuardTier::Warning => "warning",
            GuardTier::Critical => "critical",
            GuardTier::Blocked => "blocked",
        };
        f.write_str(name)
    }
}

/// Snapshot of the guard at one instant. Replaced wholesale on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardStatus {
    pub tier: GuardTier,
    /// `now >= due_at`
    pub is_overdue: bool,
    /// Overdue but still inside the grace window.
    pub is_in_grace: bool,
    /// Started days since `due_at` (0 when not overdue).
    pub days_late: u64,
    /// Whole hours since `due_at` (0 when not overdue).
    pub hours_late: u64,
    /// Opacity driver in (0, 1]; lower means more degraded.
    pub fade_level: f64,
    /// `due_at - now` in milliseconds; negative once overdue.
    pub time_until_due_ms: i64,
    pub message: String,
    pub due_at: DateTime<Utc>,
    pub evaluated_at: DateTime<Utc>,
}

impl GuardStatus {
    pub fn time_until_due(&self) -> Duration {
        Duration::milliseconds(self.time_until_due_ms)
    }

    /// True once pointer interaction with the content must be disabled.
    pub fn is_blocked(&self) -> bool {
        self.tier == GuardTier::Blocked
    }
}

/// Evaluate the guard for `config` at `now`.
///
/// Pure and deterministic: the same inputs always give an identical status.
pub fn evaluate(config: &ContractConfig, now: DateTime<Utc>) -> GuardStatus {
    let due_at = config.due_at();
    let elapsed = now - due_at;
    let time_until_due_ms = -elapsed.num_milliseconds();

    if elapsed < Duration::zero() {
        return GuardStatus {
            tier: GuardTier::Active,
            is_overdue: false,
            is_in_grace: false,
            days_late: 0,
            hours_late: 0,
            fade_level: 1.0,
            time_until_due_ms,
            message: active_message(config, -elapsed),
            due_at,
            evaluated_at: now,
        };
    }

    // Any started day counts, down to sub-millisecond remainders.
    let whole_days = elapsed.num_days();
    let started = i64::from(elapsed > Duration::days(whole_days));
    let days_late = (whole_days + started) as u64;
    let hours_late = elapsed.num_hours() as u64;

    let thresholds = config.escalation();
    let grace_days = u64::from(config.grace_days());
    let (tier, fade_level) = if days_late <= grace_days {
        let fade = (1.0 - thresholds.grace_fade_step * days_late as f64)
            .max(thresholds.grace_fade_floor);
        (GuardTier::Grace, fade)
    } else {
        let over = days_late - grace_days;
        if over <= u64::from(thresholds.warning_days) {
            (GuardTier::Warning, WARNING_FADE)
        } else if over <= u64::from(thresholds.critical_days) {
            (GuardTier::Critical, CRITICAL_FADE)
        } else {
            (GuardTier::Blocked, BLOCKED_FADE)
        }
    };

    let message = overdue_message(config, tier, days_late, grace_days);

    GuardStatus {
        tier,
        is_overdue: true,
        is_in_grace: tier == GuardTier::Grace,
        days_late,
        hours_late,
        fade_level,
        time_until_due_ms,
        message,
        due_at,
        evaluated_at: now,
    }
}

fn subject(config: &ContractConfig) -> String {
    match config.project_label() {
        "" => String::new(),
        project => format!("{project}: "),
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn active_message(config: &ContractConfig, remaining: Duration) -> String {
    let days = remaining.num_days();
    let hours = remaining.num_hours() - days * 24;
    format!(
        "{}service active. Payment due in {days}d {hours}h.",
        subject(config)
    )
}

fn overdue_message(
    config: &ContractConfig,
    tier: GuardTier,
    days_late: u64,
    grace_days: u64,
) -> String {
    let subject = subject(config);
    match tier {
        GuardTier::Active => format!("{subject}service active."),
        GuardTier::Grace => {
            let left = grace_days - days_late;
            format!(
                "{subject}payment overdue by {days_late} day{}. Grace period ends in {left} day{}.",
                plural(days_late),
                plural(left)
            )
        }
        GuardTier::Warning => format!(
            "{subject}grace period expired {} day{} ago. Service degradation in progress.",
            days_late - grace_days,
            plural(days_late - grace_days)
        ),
        GuardTier::Critical => {
            format!("{subject}payment {days_late} days late. Access will be blocked soon.")
        }
        GuardTier::Blocked => format!(
            "{subject}access blocked for non-payment ({days_late} days late). Contact support to restore service."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractSettings;
    use chrono::TimeZone;

    fn config(grace_days: i64) -> ContractConfig {
        ContractConfig::try_from(
            ContractSettings::new("2025-09-30T23:59:59", grace_days).with_labels("UGEL", "Portal"),
        )
        .unwrap()
    }

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 30, 23, 59, 59).unwrap()
    }

    #[test]
    fn before_due_is_active() {
        let status = evaluate(&config(3), due() - Duration::seconds(1));
        assert_eq!(status.tier, GuardTier::Active);
        assert!(!status.is_overdue);
        assert_eq!(status.days_late, 0);
        assert_eq!(status.hours_late, 0);
        assert_eq!(status.fade_level, 1.0);
        assert_eq!(status.time_until_due_ms, 1000);
    }

    #[test]
    fn sub_millisecond_past_threshold_escalates() {
        let cfg = config(3);
        let just_past = due() + Duration::days(3) + Duration::microseconds(500);
        let status = evaluate(&cfg, just_past);
        assert_eq!(status.tier, GuardTier::Warning);
        assert_eq!(status.days_late, 4);
        assert_eq!(status.hours_late, 72);

        let first_instant = evaluate(&cfg, due() + Duration::nanoseconds(1));
        assert_eq!(first_instant.days_late, 1);
        assert_eq!(first_instant.hours_late, 0);
    }

    #[test]
    fn exactly_due_is_grace_without_fade() {
        let status = evaluate(&config(3), due());
        assert_eq!(status.tier, GuardTier::Grace);
        assert!(status.is_overdue);
        assert!(status.is_in_grace);
        assert_eq!(status.days_late, 0);
        assert_eq!(status.fade_level, 1.0);
        assert_eq!(status.time_until_due_ms, 0);
    }

    #[test]
    fn boundaries_with_three_grace_days() {
        let cfg = config(3);
        let at = |d: i64| evaluate(&cfg, due() + Duration::days(d) + Duration::seconds(1)).tier;
        assert_eq!(evaluate(&cfg, due() + Duration::days(3)).tier, GuardTier::Grace);
        assert_eq!(at(3), GuardTier::Warning);
        assert_eq!(evaluate(&cfg, due() + Duration::days(5)).tier, GuardTier::Warning);
        assert_eq!(at(5), GuardTier::Critical);
        assert_eq!(evaluate(&cfg, due() + Duration::days(8)).tier, GuardTier::Critical);
        assert_eq!(at(8), GuardTier::Blocked);
    }

    #[test]
    fn grace_fade_steps_down() {
        let cfg = config(10);
        let fade = |d: i64| evaluate(&cfg, due() + Duration::days(d)).fade_level;
        assert!((fade(1) - 0.9).abs() < 1e-9);
        assert!((fade(2) - 0.8).abs() < 1e-9);
        assert!((fade(4) - 0.6).abs() < 1e-9);
        assert!((fade(9) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn hours_late_floor_while_days_late_ceils() {
        let status = evaluate(&config(3), due() + Duration::hours(25) + Duration::minutes(59));
        assert_eq!(status.hours_late, 25);
        assert_eq!(status.days_late, 2);
        assert_eq!(status.time_until_due(), -(Duration::hours(25) + Duration::minutes(59)));
    }

    #[test]
    fn zero_grace_goes_straight_to_warning() {
        let cfg = config(0);
        assert_eq!(evaluate(&cfg, due()).tier, GuardTier::Grace);
        assert_eq!(
            evaluate(&cfg, due() + Duration::seconds(1)).tier,
            GuardTier::Warning
        );
    }

    #[test]
    fn fixed_fade_levels_after_grace() {
        let cfg = config(0);
        assert_eq!(evaluate(&cfg, due() + Duration::days(1)).fade_level, WARNING_FADE);
        assert_eq!(evaluate(&cfg, due() + Duration::days(4)).fade_level, CRITICAL_FADE);
        assert_eq!(evaluate(&cfg, due() + Duration::days(30)).fade_level, BLOCKED_FADE);
    }

    #[test]
    fn messages_are_tier_specific() {
        let cfg = config(3);
        let grace = evaluate(&cfg, due() + Duration::hours(1));
        assert!(grace.message.starts_with("Portal: payment overdue by 1 day."));
        assert!(grace.message.contains("ends in 2 days"));

        let blocked = evaluate(&cfg, due() + Duration::days(20));
        assert!(blocked.message.contains("access blocked"));
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(GuardTier::Active < GuardTier::Grace);
        assert!(GuardTier::Critical < GuardTier::Blocked);
        assert_eq!(GuardTier::Blocked.as_u8(), 4);
        assert_eq!(GuardTier::Warning.to_string(), "warning");
    }
}
