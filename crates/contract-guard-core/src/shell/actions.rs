//! User actions offered by the shell: "request payment" and "contact support".
//!
//! A caller-supplied callback always wins. Without one, the shell falls back
//! to an outbound link built from the contract's contact channels:
//!
//! - payment request: `https://wa.me/<digits>?text=...`, else `mailto:`
//! - contact support: `mailto:`, else `tel:`
//!
//! No callback and no usable channel means the action is not offered.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::contract::ContractConfig;
use crate::error::ShellError;
use crate::guard::{GuardStatus, GuardTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    RequestPayment,
    ContactSupport,
}

impl ActionKind {
    pub const ALL: [ActionKind; 2] = [ActionKind::RequestPayment, ActionKind::ContactSupport];

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::RequestPayment => "Request payment",
            ActionKind::ContactSupport => "Contact support",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::RequestPayment => "request_payment",
            ActionKind::ContactSupport => "contact_support",
        })
    }
}

/// What a callback gets to know about the action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionContext {
    pub kind: ActionKind,
    pub client_label: String,
    pub project_label: String,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub tier: GuardTier,
    pub days_late: u64,
}

impl ActionContext {
    pub fn new(kind: ActionKind, config: &ContractConfig, status: &GuardStatus) -> Self {
        Self {
            kind,
            client_label: config.client_label().to_string(),
            project_label: config.project_label().to_string(),
            amount: config.amount(),
            currency: config.currency().map(str::to_string),
            tier: status.tier,
            days_late: status.days_late,
        }
    }
}

pub type ActionCallback = Arc<dyn Fn(&ActionContext) + Send + Sync>;

/// Optional caller-supplied callbacks.
#[derive(Clone, Default)]
pub struct ActionHandlers {
    pub on_payment_request: Option<ActionCallback>,
    pub on_contact_support: Option<ActionCallback>,
}

impl ActionHandlers {
    pub fn get(&self, kind: ActionKind) -> Option<&ActionCallback> {
        match kind {
            ActionKind::RequestPayment => self.on_payment_request.as_ref(),
            ActionKind::ContactSupport => self.on_contact_support.as_ref(),
        }
    }
}

impl fmt::Debug for ActionHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandlers")
            .field("on_payment_request", &self.on_payment_request.is_some())
            .field("on_contact_support", &self.on_contact_support.is_some())
            .finish()
    }
}

/// Result of triggering an action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// A caller callback ran.
    Handled,
    /// No callback; the host should open this link.
    OpenLink(Url),
}

/// Build the fallback link for `kind`.
///
/// Returns `Ok(None)` when the contract has no channel for it.
///
/// # Errors
///
/// Returns [`ShellError::InvalidLink`] when a configured channel cannot be
/// turned into a valid URL (for example an email without `@`).
pub fn fallback_link(
    kind: ActionKind,
    config: &ContractConfig,
    status: &GuardStatus,
) -> Result<Option<Url>, ShellError> {
    let contact = config.contact();
    match kind {
        ActionKind::RequestPayment => {
            if let Some(digits) = contact.phone_digits() {
                let text = payment_body(config);
                return parse_link(format!(
                    "https://wa.me/{digits}?text={}",
                    urlencoding::encode(&text)
                ))
                .map(Some);
            }
            match contact.email_address() {
                Some(email) => {
                    mailto(email, &payment_subject(config), &payment_body(config)).map(Some)
                }
                None => Ok(None),
            }
        }
        ActionKind::ContactSupport => {
            if let Some(email) = contact.email_address() {
                return mailto(email, &support_subject(config), &support_body(config, status))
                    .map(Some);
            }
            match contact.phone_digits() {
                Some(digits) => parse_link(format!("tel:+{digits}")).map(Some),
                None => Ok(None),
            }
        }
    }
}

fn mailto(email: &str, subject: &str, body: &str) -> Result<Url, ShellError> {
    let valid = email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
        && !email.chars().any(|c| c.is_whitespace() || c == '?' || c == '&');
    if !valid {
        return Err(ShellError::InvalidLink {
            link: format!("mailto:{email}"),
            message: "not an email address".into(),
        });
    }
    parse_link(format!(
        "mailto:{email}?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    ))
}

fn parse_link(link: String) -> Result<Url, ShellError> {
    Url::parse(&link).map_err(|e| ShellError::InvalidLink {
        message: e.to_string(),
        link,
    })
}

fn describe(config: &ContractConfig) -> String {
    match (config.project_label(), config.client_label()) {
        ("", "") => "the contracted service".to_string(),
        (project, "") => project.to_string(),
        ("", client) => format!("the service for {client}"),
        (project, client) => format!("{project} ({client})"),
    }
}

fn payment_subject(config: &ContractConfig) -> String {
    format!("Payment: {}", describe(config))
}

fn payment_body(config: &ContractConfig) -> String {
    let mut body = format!(
        "Hello, I would like to settle the pending payment for {}.",
        describe(config)
    );
    if let Some(amount) = config.amount_label() {
        body.push_str(&format!(" Amount: {amount}."));
    }
    body
}

fn support_subject(config: &ContractConfig) -> String {
    format!("Support: {}", describe(config))
}

fn support_body(config: &ContractConfig, status: &GuardStatus) -> String {
    format!(
        "Hello, I need help with {}. Current status: {} ({} days late).",
        describe(config),
        status.tier,
        status.days_late
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractSettings;
    use crate::guard::evaluate;
    use chrono::{TimeZone, Utc};

    fn setup(phone: Option<&str>, email: Option<&str>) -> (ContractConfig, GuardStatus) {
        let config = ContractConfig::try_from(
            ContractSettings::new("2025-09-30T23:59:59", 3)
                .with_labels("UGEL Norte", "Portal Docente")
                .with_contact(phone, email)
                .with_amount(1500.0, "PEN"),
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 10, 4, 0, 0, 1).unwrap();
        let status = evaluate(&config, now);
        (config, status)
    }

    #[test]
    fn payment_prefers_messaging_link() {
        let (config, status) = setup(Some("+51 987 654 321"), Some("billing@example.com"));
        let link = fallback_link(ActionKind::RequestPayment, &config, &status)
            .unwrap()
            .unwrap();
        assert_eq!(link.scheme(), "https");
        assert_eq!(link.host_str(), Some("wa.me"));
        assert_eq!(link.path(), "/51987654321");
        let text = link.query().unwrap();
        assert!(text.contains("Portal%20Docente%20%28UGEL%20Norte%29"));
        assert!(text.contains("1500.00%20PEN"));
    }

    #[test]
    fn payment_falls_back_to_mailto() {
        let (config, status) = setup(None, Some("billing@example.com"));
        let link = fallback_link(ActionKind::RequestPayment, &config, &status)
            .unwrap()
            .unwrap();
        assert_eq!(link.scheme(), "mailto");
        assert!(link.as_str().starts_with("mailto:billing@example.com?subject=Payment%3A%20"));
    }

    #[test]
    fn support_prefers_email_then_phone() {
        let (config, status) = setup(Some("987-654-321"), Some("help@example.com"));
        let link = fallback_link(ActionKind::ContactSupport, &config, &status)
            .unwrap()
            .unwrap();
        assert!(link.as_str().contains("warning"));
        assert_eq!(link.scheme(), "mailto");

        let (config, status) = setup(Some("987-654-321"), None);
        let link = fallback_link(ActionKind::ContactSupport, &config, &status)
            .unwrap()
            .unwrap();
        assert_eq!(link.as_str(), "tel:+987654321");
    }

    #[test]
    fn missing_channels_yield_no_link() {
        let (config, status) = setup(None, None);
        for kind in ActionKind::ALL {
            assert!(fallback_link(kind, &config, &status).unwrap().is_none());
        }
    }

    #[test]
    fn malformed_email_is_an_error() {
        let (config, status) = setup(None, Some("not-an-email"));
        assert!(matches!(
            fallback_link(ActionKind::ContactSupport, &config, &status),
            Err(ShellError::InvalidLink { .. })
        ));
    }
}
