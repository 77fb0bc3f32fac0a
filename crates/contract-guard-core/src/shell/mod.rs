//! Presentation shell.
//!
//! Wraps the protected content with the current degradation effects and
//! decides which overlays are visible:
//!
//! - `active`: nothing but the untouched content
//! - `grace` / `warning` / `critical`: floating notification
//! - `blocked`: notification plus a full-viewport lockout modal
//!
//! The shell only reads [`GuardStatus`] snapshots; it never mutates them.

mod actions;
pub mod html;
mod view;

pub use actions::{
    fallback_link, ActionCallback, ActionContext, ActionHandlers, ActionKind, ActionOutcome,
};
pub use view::{
    ActionButton, ContentFrame, DebugEntry, DebugOverlay, DetailPanel, Easing, LockoutModal,
    Notification, ShellView, Transition,
};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::contract::ContractConfig;
use crate::error::ShellError;
use crate::guard::{DegradationEffects, GuardStatus, GuardTier};

/// Shell switches, stored in the `[shell]` config section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOptions {
    /// Show raw status fields in a fixed bottom-corner overlay.
    #[serde(default)]
    pub debug_overlay: bool,
}

pub struct PresentationShell {
    config: Arc<ContractConfig>,
    options: ShellOptions,
    handlers: ActionHandlers,
    transition: Transition,
    /// Highest tier at which the user dismissed the notification.
    dismissed_at: Option<GuardTier>,
    details_expanded: bool,
}

impl PresentationShell {
    pub fn new(config: impl Into<Arc<ContractConfig>>) -> Self {
        Self {
            config: config.into(),
            options: ShellOptions::default(),
            handlers: ActionHandlers::default(),
            transition: Transition::default(),
            dismissed_at: None,
            details_expanded: false,
        }
    }

    pub fn with_options(mut self, options: ShellOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    pub fn on_payment_request<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ActionContext) + Send + Sync + 'static,
    {
        self.handlers.on_payment_request = Some(Arc::new(callback));
        self
    }

    pub fn on_contact_support<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ActionContext) + Send + Sync + 'static,
    {
        self.handlers.on_contact_support = Some(Arc::new(callback));
        self
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Swap in a new contract, e.g. after the due date was extended.
    /// Dismissal state belongs to the old contract and is cleared.
    pub fn set_config(&mut self, config: impl Into<Arc<ContractConfig>>) {
        self.config = config.into();
        self.dismissed_at = None;
    }

    /// Hide the floating notification until the tier escalates.
    ///
    /// Returns `false` when there is nothing dismissible (`active`, `blocked`).
    pub fn dismiss_notification(&mut self, status: &GuardStatus) -> bool {
        if !is_dismissible(status.tier) {
            return false;
        }
        debug!(tier = %status.tier, "notification dismissed");
        self.dismissed_at = Some(status.tier);
        true
    }

    pub fn toggle_details(&mut self) -> bool {
        self.details_expanded = !self.details_expanded;
        self.details_expanded
    }

    /// Build the view for `status`.
    pub fn view(&self, status: &GuardStatus) -> ShellView {
        let effects = DegradationEffects::for_status(status, self.config.profile());
        let content = ContentFrame {
            effects,
            transition: self.transition,
        };

        if status.tier == GuardTier::Active {
            return ShellView {
                tier: status.tier,
                content,
                notification: None,
                modal: None,
                debug: None,
            };
        }

        let details = self.details(status);
        let actions = self.actions(status);

        let hidden = self
            .dismissed_at
            .is_some_and(|dismissed| is_dismissible(status.tier) && status.tier <= dismissed);
        let notification = (!hidden).then(|| Notification {
            tier: status.tier,
            title: status.tier.title().to_string(),
            message: status.message.clone(),
            dismissible: is_dismissible(status.tier),
            details_expanded: self.details_expanded,
            details: details.clone(),
            actions: actions.clone(),
        });

        let modal = (status.tier == GuardTier::Blocked).then(|| LockoutModal {
            title: GuardTier::Blocked.title().to_string(),
            message: status.message.clone(),
            interaction_notice: "Interaction with this application is disabled until the \
                                 contract due date is extended."
                .to_string(),
            details,
            actions,
        });

        let debug = self.options.debug_overlay.then(|| debug_overlay(status));

        ShellView {
            tier: status.tier,
            content,
            notification,
            modal,
            debug,
        }
    }

    /// Actions that can currently be offered. An action with neither a
    /// callback nor a usable contact channel is omitted.
    pub fn actions(&self, status: &GuardStatus) -> Vec<ActionButton> {
        ActionKind::ALL
            .into_iter()
            .filter_map(|kind| {
                if self.handlers.get(kind).is_some() {
                    return Some(ActionButton {
                        kind,
                        label: kind.label().to_string(),
                        href: None,
                    });
                }
                match fallback_link(kind, &self.config, status) {
                    Ok(Some(link)) => Some(ActionButton {
                        kind,
                        label: kind.label().to_string(),
                        href: Some(link.to_string()),
                    }),
                    Ok(None) => None,
                    Err(e) => {
                        debug!(action = %kind, error = %e, "omitting action");
                        None
                    }
                }
            })
            .collect()
    }

    /// Run the callback for `kind`, or produce the fallback link.
    ///
    /// # Errors
    ///
    /// [`ShellError::ActionUnavailable`] when neither exists, or
    /// [`ShellError::InvalidLink`] when the contact channel is malformed.
    pub fn trigger(
        &self,
        kind: ActionKind,
        status: &GuardStatus,
    ) -> Result<ActionOutcome, ShellError> {
        if let Some(callback) = self.handlers.get(kind) {
            info!(action = %kind, tier = %status.tier, "action handled by callback");
            callback(&ActionContext::new(kind, &self.config, status));
            return Ok(ActionOutcome::Handled);
        }
        match fallback_link(kind, &self.config, status)? {
            Some(link) => {
                info!(action = %kind, scheme = link.scheme(), "action resolved to link");
                Ok(ActionOutcome::OpenLink(link))
            }
            None => Err(ShellError::ActionUnavailable(kind)),
        }
    }

    fn details(&self, status: &GuardStatus) -> DetailPanel {
        DetailPanel {
            client_label: self.config.client_label().to_string(),
            project_label: self.config.project_label().to_string(),
            due_at: status.due_at,
            days_late: status.days_late,
            hours_late: status.hours_late,
            fade_level: status.fade_level,
            amount: self.config.amount_label(),
        }
    }
}

fn is_dismissible(tier: GuardTier) -> bool {
    matches!(tier, GuardTier::Grace | GuardTier::Warning | GuardTier::Critical)
}

fn debug_overlay(status: &GuardStatus) -> DebugOverlay {
    let entry = |key: &str, value: String| DebugEntry {
        key: key.to_string(),
        value,
    };
    DebugOverlay {
        entries: vec![
            entry("tier", status.tier.to_string()),
            entry("is_overdue", status.is_overdue.to_string()),
            entry("is_in_grace", status.is_in_grace.to_string()),
            entry("days_late", status.days_late.to_string()),
            entry("hours_late", status.hours_late.to_string()),
            entry("fade_level", format!("{:.2}", status.fade_level)),
            entry("time_until_due_ms", status.time_until_due_ms.to_string()),
            entry("evaluated_at", status.evaluated_at.to_rfc3339()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractSettings;
    use crate::guard::evaluate;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 30, 23, 59, 59).unwrap()
    }

    fn config(email: Option<&str>) -> ContractConfig {
        ContractConfig::try_from(
            ContractSettings::new("2025-09-30T23:59:59", 3)
                .with_labels("UGEL Norte", "Portal Docente")
                .with_contact(None, email),
        )
        .unwrap()
    }

    fn status(config: &ContractConfig, offset: Duration) -> GuardStatus {
        evaluate(config, due() + offset)
    }

    #[test]
    fn active_renders_nothing_extra() {
        let cfg = config(Some("help@example.com"));
        let shell = PresentationShell::new(cfg.clone()).with_options(ShellOptions {
            debug_overlay: true,
        });
        let view = shell.view(&status(&cfg, -Duration::days(2)));

        assert!(view.notification.is_none());
        assert!(view.modal.is_none());
        assert!(view.debug.is_none());
        assert!(view.is_interactive());
        assert_eq!(view.content.effects, DegradationEffects::NONE);
    }

    #[test]
    fn warning_shows_notification_only() {
        let cfg = config(Some("help@example.com"));
        let shell = PresentationShell::new(cfg.clone());
        let view = shell.view(&status(&cfg, Duration::days(4)));

        let notification = view.notification.as_ref().expect("notification");
        assert_eq!(notification.tier, GuardTier::Warning);
        assert!(notification.dismissible);
        assert_eq!(notification.details.days_late, 4);
        assert_eq!(notification.details.project_label, "Portal Docente");
        assert_eq!(notification.actions.len(), 2);
        assert!(view.modal.is_none());
        assert!(view.is_interactive());
    }

    #[test]
    fn blocked_shows_modal_and_disables_interaction() {
        let cfg = config(Some("help@example.com"));
        let mut shell = PresentationShell::new(cfg.clone());
        let blocked = status(&cfg, Duration::days(9));

        assert!(!shell.dismiss_notification(&blocked));
        let view = shell.view(&blocked);
        assert!(view.modal.is_some());
        assert!(!view.notification.as_ref().unwrap().dismissible);
        assert!(!view.is_interactive());
        assert!(!view.content.effects.pointer_events_enabled);
    }

    #[test]
    fn dismissed_notification_returns_on_escalation() {
        let cfg = config(None);
        let mut shell = PresentationShell::new(cfg.clone());
        let grace = status(&cfg, Duration::days(1));
        let warning = status(&cfg, Duration::days(4));

        assert!(shell.dismiss_notification(&grace));
        assert!(shell.view(&grace).notification.is_none());
        assert!(shell.view(&warning).notification.is_some());
    }

    #[test]
    fn missing_channels_omit_actions() {
        let cfg = config(None);
        let shell = PresentationShell::new(cfg.clone());
        let warning = status(&cfg, Duration::days(4));

        assert!(shell.actions(&warning).is_empty());
        assert!(matches!(
            shell.trigger(ActionKind::ContactSupport, &warning),
            Err(ShellError::ActionUnavailable(ActionKind::ContactSupport))
        ));
    }

    #[test]
    fn callbacks_take_precedence_over_links() {
        let cfg = config(Some("help@example.com"));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let shell = PresentationShell::new(cfg.clone()).on_payment_request(move |ctx| {
            assert_eq!(ctx.kind, ActionKind::RequestPayment);
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let warning = status(&cfg, Duration::days(4));

        let buttons = shell.actions(&warning);
        assert_eq!(buttons[0].href, None);
        assert!(buttons[1].href.as_deref().unwrap().starts_with("mailto:"));

        assert_eq!(
            shell.trigger(ActionKind::RequestPayment, &warning).unwrap(),
            ActionOutcome::Handled
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            shell.trigger(ActionKind::ContactSupport, &warning).unwrap(),
            ActionOutcome::OpenLink(_)
        ));
    }

    #[test]
    fn debug_overlay_is_opt_in() {
        let cfg = config(None);
        let warning = status(&cfg, Duration::days(4));
        assert!(PresentationShell::new(cfg.clone()).view(&warning).debug.is_none());

        let shell = PresentationShell::new(cfg).with_options(ShellOptions {
            debug_overlay: true,
        });
        let debug = shell.view(&warning).debug.expect("debug overlay");
        assert_eq!(debug.entries[0].value, "warning");
    }

    #[test]
    fn extending_the_due_date_clears_dismissal() {
        let cfg = config(None);
        let mut shell = PresentationShell::new(cfg.clone());
        let grace = status(&cfg, Duration::days(1));
        shell.dismiss_notification(&grace);

        shell.set_config(cfg);
        assert!(shell.view(&grace).notification.is_some());
    }
}
