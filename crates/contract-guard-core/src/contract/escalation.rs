//! Escalation thresholds and effect profiles.
//!
//! The thresholds are counted in days past the end of the grace window,
//! where "days late" is always measured from the due date itself.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fade level assigned to the first tier after grace. The grace fade floor
/// may not go below it, otherwise fading would stop being monotonic.
pub const WARNING_FADE: f64 = 0.4;

/// Day counts that separate the post-grace tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationThresholds {
    /// Days after grace during which the tier stays `warning` (default: 2)
    #[serde(default = "default_warning_days")]
    pub warning_days: u32,
    /// Days after grace before the tier becomes `blocked` (default: 5)
    #[serde(default = "default_critical_days")]
    pub critical_days: u32,
    /// Fade lost per late day while in grace (default: 0.1)
    #[serde(default = "default_grace_fade_step")]
    pub grace_fade_step: f64,
    /// Lowest fade level reachable in grace (default: 0.6)
    #[serde(default = "default_grace_fade_floor")]
    pub grace_fade_floor: f64,
}

fn default_warning_days() -> u32 {
    2
}
fn default_critical_days() -> u32 {
    5
}
fn default_grace_fade_step() -> f64 {
    0.1
}
fn default_grace_fade_floor() -> f64 {
    0.6
}

impl Default for EscalationThresholds {
    fn default() -> Self {
        Self {
            warning_days: default_warning_days(),
            critical_days: default_critical_days(),
            grace_fade_step: default_grace_fade_step(),
            grace_fade_floor: default_grace_fade_floor(),
        }
    }
}

impl EscalationThresholds {
    /// Check ordering and ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThresholds`] when `warning_days` is not
    /// strictly below `critical_days`, or when the grace fade parameters are
    /// out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.warning_days == 0 || self.warning_days >= self.critical_days {
            return Err(ConfigError::InvalidThresholds(format!(
                "need 0 < warning_days ({}) < critical_days ({})",
                self.warning_days, self.critical_days
            )));
        }
        if !self.grace_fade_step.is_finite() || self.grace_fade_step < 0.0 {
            return Err(ConfigError::InvalidThresholds(format!(
                "grace_fade_step must be a non-negative number, got {}",
                self.grace_fade_step
            )));
        }
        if !(WARNING_FADE..=1.0).contains(&self.grace_fade_floor) {
            return Err(ConfigError::InvalidThresholds(format!(
                "grace_fade_floor must be within [{WARNING_FADE}, 1.0], got {}",
                self.grace_fade_floor
            )));
        }
        Ok(())
    }
}

/// Which effects table the guard applies.
///
/// `Lite` is the reduced profile: same tiers and interaction rules, but
/// only opacity and grayscale change (no blur, no scaling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardProfile {
    #[default]
    Standard,
    Lite,
}
