//! Raw contract settings as they come from TOML or the embedding host.
//!
//! Nothing here is trusted: [`ContractSettings`] is turned into a
//! [`ContractConfig`](super::ContractConfig) by validation, which is where a
//! malformed due date or a negative grace period is rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::escalation::{EscalationThresholds, GuardProfile};
use crate::error::ConfigError;

/// Default re-evaluation period.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;

/// Outbound contact channels used to build fallback action links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactChannels {
    /// Phone number in any human format; only digits and a leading `+` are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ContactChannels {
    /// Phone with formatting removed, `None` if nothing dialable remains.
    pub fn phone_digits(&self) -> Option<String> {
        let digits: String = self
            .phone
            .as_deref()?
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        (!digits.is_empty()).then_some(digits)
    }

    /// Trimmed email, `None` when blank.
    pub fn email_address(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// Unvalidated contract description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSettings {
    /// Contractual deadline as text.
    #[serde(default)]
    pub due_at: String,
    #[serde(default = "default_grace_days")]
    pub grace_days: i64,
    #[serde(default)]
    pub client_label: String,
    #[serde(default)]
    pub project_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub profile: GuardProfile,
    #[serde(default)]
    pub contact: ContactChannels,
    #[serde(default)]
    pub escalation: EscalationThresholds,
}

fn default_grace_days() -> i64 {
    3
}
fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for ContractSettings {
    fn default() -> Self {
        Self {
            due_at: String::new(),
            grace_days: default_grace_days(),
            client_label: String::new(),
            project_label: String::new(),
            amount: None,
            currency: None,
            poll_interval_ms: default_poll_interval_ms(),
            profile: GuardProfile::default(),
            contact: ContactChannels::default(),
            escalation: EscalationThresholds::default(),
        }
    }
}

impl ContractSettings {
    /// Settings with a due date and grace period, everything else default.
    pub fn new(due_at: impl Into<String>, grace_days: i64) -> Self {
        Self {
            due_at: due_at.into(),
            grace_days,
            ..Self::default()
        }
    }

    pub fn with_labels(mut self, client: impl Into<String>, project: impl Into<String>) -> Self {
        self.client_label = client.into();
        self.project_label = project.into();
        self
    }

    pub fn with_contact(mut self, phone: Option<&str>, email: Option<&str>) -> Self {
        self.contact = ContactChannels {
            phone: phone.map(str::to_string),
            email: email.map(str::to_string),
        };
        self
    }

    pub fn with_amount(mut self, amount: f64, currency: impl Into<String>) -> Self {
        self.amount = Some(amount);
        self.currency = Some(currency.into());
        self
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    pub fn with_profile(mut self, profile: GuardProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// Parse a due date.
///
/// Accepts RFC 3339, a naive date-time (UTC) with `T` or space separator,
/// and a bare date, which means the last second of that day in UTC.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDueAt`] if none of the forms match.
pub fn parse_due_at(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(end_of_day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 59))
    {
        return Ok(end_of_day.and_utc());
    }

    Err(ConfigError::InvalidDueAt {
        value: value.to_string(),
    })
}
