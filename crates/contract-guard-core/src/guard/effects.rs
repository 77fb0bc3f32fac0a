//! Effects mapper: tier -> visual and interaction parameters.

use serde::{Deserialize, Serialize};

use super::status::{GuardStatus, GuardTier};
use crate::contract::GuardProfile;

/// How much of the content the user may still select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    All,
    TextOnly,
    None,
}

impl SelectionMode {
    /// CSS `user-select` value.
    pub fn css_value(self) -> &'static str {
        match self {
            SelectionMode::All => "auto",
            SelectionMode::TextOnly => "text",
            SelectionMode::None => "none",
        }
    }
}

/// Visual/interaction parameters applied to the protected content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegradationEffects {
    /// 0.0 ..= 1.0
    pub opacity: f64,
    pub blur_px: f64,
    /// 0.0 ..= 100.0
    pub grayscale_pct: f64,
    /// (0.0, 1.0]
    pub scale: f64,
    pub pointer_events_enabled: bool,
    pub selection: SelectionMode,
}

impl DegradationEffects {
    /// The untouched rendering used for `active` and every pre-deadline status.
    pub const NONE: DegradationEffects = DegradationEffects {
        opacity: 1.0,
        blur_px: 0.0,
        grayscale_pct: 0.0,
        scale: 1.0,
        pointer_events_enabled: true,
        selection: SelectionMode::All,
    };

    /// Look up the effects for a status.
    ///
    /// A status that is not overdue always maps to [`DegradationEffects::NONE`],
    /// whatever its other fields say.
    pub fn for_status(status: &GuardStatus, profile: GuardProfile) -> Self {
        if !status.is_overdue {
            return Self::NONE;
        }

        let (blur_px, grayscale_pct, scale, pointer_events_enabled, selection) = match status.tier {
            GuardTier::Active => return Self::NONE,
            GuardTier::Grace => (1.0, 20.0, 1.0, true, SelectionMode::All),
            GuardTier::Warning => (3.0, 40.0, 0.98, true, SelectionMode::All),
            GuardTier::Critical => (6.0, 70.0, 0.95, true, SelectionMode::TextOnly),
            GuardTier::Blocked => (10.0, 90.0, 0.90, false, SelectionMode::None),
        };

        let effects = Self {
            opacity: status.fade_level.clamp(0.0, 1.0),
            blur_px,
            grayscale_pct,
            scale,
            pointer_events_enabled,
            selection,
        };

        match profile {
            GuardProfile::Standard => effects,
            GuardProfile::Lite => Self {
                blur_px: 0.0,
                scale: 1.0,
                ..effects
            },
        }
    }

    pub fn text_selectable(&self) -> bool {
        self.selection != SelectionMode::None
    }

    pub fn is_degraded(&self) -> bool {
        *self != Self::NONE
    }

    /// Inline CSS declarations for the content wrapper.
    pub fn to_css(&self) -> String {
        let filter = if self.blur_px == 0.0 && self.grayscale_pct == 0.0 {
            "none".to_string()
        } else {
            format!(
                "blur({}px) grayscale({}%)",
                css_number(self.blur_px),
                css_number(self.grayscale_pct)
            )
        };
        let transform = if self.scale == 1.0 {
            "none".to_string()
        } else {
            format!("scale({})", css_number(self.scale))
        };
        format!(
            "opacity: {}; filter: {filter}; transform: {transform}; pointer-events: {}; user-select: {};",
            css_number(self.opacity),
            if self.pointer_events_enabled { "auto" } else { "none" },
            self.selection.css_value(),
        )
    }
}

/// Render with at most three decimals and no trailing zeros.
fn css_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ContractConfig, ContractSettings};
    use crate::guard::status::evaluate;
    use chrono::{Duration, TimeZone, Utc};

    fn status_at(days: i64) -> GuardStatus {
        let config =
            ContractConfig::try_from(ContractSettings::new("2025-09-30T23:59:59", 3)).unwrap();
        let due = Utc.with_ymd_and_hms(2025, 9, 30, 23, 59, 59).unwrap();
        evaluate(&config, due + Duration::days(days) + Duration::seconds(1))
    }

    #[test]
    fn not_overdue_is_untouched_even_with_inconsistent_fields() {
        let mut status = status_at(20);
        status.is_overdue = false;
        assert_eq!(
            DegradationEffects::for_status(&status, GuardProfile::Standard),
            DegradationEffects::NONE
        );
    }

    #[test]
    fn table_rows_match_tiers() {
        let grace = DegradationEffects::for_status(&status_at(0), GuardProfile::Standard);
        assert_eq!(grace.blur_px, 1.0);
        assert_eq!(grace.grayscale_pct, 20.0);
        assert!((grace.opacity - 0.9).abs() < 1e-9);

        let warning = DegradationEffects::for_status(&status_at(3), GuardProfile::Standard);
        assert_eq!(warning.opacity, 0.4);
        assert_eq!(warning.scale, 0.98);

        let critical = DegradationEffects::for_status(&status_at(5), GuardProfile::Standard);
        assert_eq!(critical.selection, SelectionMode::TextOnly);
        assert!(critical.text_selectable());
        assert!(critical.pointer_events_enabled);

        let blocked = DegradationEffects::for_status(&status_at(8), GuardProfile::Standard);
        assert_eq!(blocked.opacity, 0.05);
        assert_eq!(blocked.blur_px, 10.0);
        assert_eq!(blocked.grayscale_pct, 90.0);
        assert_eq!(blocked.scale, 0.90);
        assert!(!blocked.pointer_events_enabled);
        assert!(!blocked.text_selectable());
    }

    #[test]
    fn lite_profile_drops_blur_and_scale() {
        let blocked = DegradationEffects::for_status(&status_at(8), GuardProfile::Lite);
        assert_eq!(blocked.blur_px, 0.0);
        assert_eq!(blocked.scale, 1.0);
        assert_eq!(blocked.grayscale_pct, 90.0);
        assert!(!blocked.pointer_events_enabled);
    }

    #[test]
    fn css_for_untouched_and_blocked() {
        assert_eq!(
            DegradationEffects::NONE.to_css(),
            "opacity: 1; filter: none; transform: none; pointer-events: auto; user-select: auto;"
        );
        let blocked = DegradationEffects::for_status(&status_at(8), GuardProfile::Standard);
        assert_eq!(
            blocked.to_css(),
            "opacity: 0.05; filter: blur(10px) grayscale(90%); transform: scale(0.9); pointer-events: none; user-select: none;"
        );
    }
}
