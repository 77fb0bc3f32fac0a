//! Declarative view model produced by the presentation shell.
//!
//! Hosts render a [`ShellView`] however they like; [`super::html`] provides
//! an HTML rendition.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::actions::ActionKind;
use crate::guard::{DegradationEffects, GuardTier};

/// Easing curve for the effect transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    EaseInOut,
    Linear,
}

impl Easing {
    pub fn css_value(self) -> &'static str {
        match self {
            Easing::EaseInOut => "ease-in-out",
            Easing::Linear => "linear",
        }
    }
}

/// Cosmetic interpolation between successive effect snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration_ms: 2_000,
            easing: Easing::EaseInOut,
        }
    }
}

/// The protected content. Always rendered; only its effects change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentFrame {
    pub effects: DegradationEffects,
    pub transition: Transition,
}

impl ContentFrame {
    /// Effects CSS plus the transition declaration.
    pub fn style(&self) -> String {
        format!(
            "{} transition: all {}ms {};",
            self.effects.to_css(),
            self.transition.duration_ms,
            self.transition.easing.css_value()
        )
    }
}

/// Fields shown in the expandable detail panel and the lockout modal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPanel {
    pub client_label: String,
    pub project_label: String,
    pub due_at: DateTime<Utc>,
    pub days_late: u64,
    pub hours_late: u64,
    pub fade_level: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// An action button. `href` is set when the action resolves to a fallback
/// link; `None` means a caller callback handles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    pub kind: ActionKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Floating, non-blocking status notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub tier: GuardTier,
    pub title: String,
    pub message: String,
    pub dismissible: bool,
    pub details_expanded: bool,
    pub details: DetailPanel,
    pub actions: Vec<ActionButton>,
}

/// Full-viewport overlay shown once the tier is `blocked`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockoutModal {
    pub title: String,
    pub message: String,
    pub interaction_notice: String,
    pub details: DetailPanel,
    pub actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugEntry {
    pub key: String,
    pub value: String,
}

/// Bottom-corner overlay with raw status fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugOverlay {
    pub entries: Vec<DebugEntry>,
}

/// Everything the host needs to draw the guarded subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellView {
    pub tier: GuardTier,
    pub content: ContentFrame,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal: Option<LockoutModal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugOverlay>,
}

impl ShellView {
    /// Content accepts pointer input (no modal, pointer events on).
    pub fn is_interactive(&self) -> bool {
        self.modal.is_none() && self.content.effects.pointer_events_enabled
    }
}
