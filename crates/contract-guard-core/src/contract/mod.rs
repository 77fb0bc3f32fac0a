mod escalation;
mod settings;

pub use escalation::{EscalationThresholds, GuardProfile, WARNING_FADE};
pub use settings::{parse_due_at, ContactChannels, ContractSettings, DEFAULT_POLL_INTERVAL_MS};

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::ConfigError;

/// Validated, immutable description of one contractual deadline.
///
/// Built from [`ContractSettings`] via `TryFrom`; once constructed every
/// field is known to be usable by the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractConfig {
    due_at: DateTime<Utc>,
    grace_days: u32,
    client_label: String,
    project_label: String,
    contact: ContactChannels,
    amount: Option<f64>,
    currency: Option<String>,
    poll_interval: Duration,
    profile: GuardProfile,
    escalation: EscalationThresholds,
}

impl ContractConfig {
    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    pub fn grace_days(&self) -> u32 {
        self.grace_days
    }

    pub fn client_label(&self) -> &str {
        &self.client_label
    }

    pub fn project_label(&self) -> &str {
        &self.project_label
    }

    pub fn contact(&self) -> &ContactChannels {
        &self.contact
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn profile(&self) -> GuardProfile {
        self.profile
    }

    pub fn escalation(&self) -> &EscalationThresholds {
        &self.escalation
    }

    /// "1500.00 PEN", "1500.00", or `None` when no amount is configured.
    pub fn amount_label(&self) -> Option<String> {
        let amount = self.amount?;
        Some(match self.currency() {
            Some(currency) => format!("{amount:.2} {currency}"),
            None => format!("{amount:.2}"),
        })
    }
}

impl TryFrom<&ContractSettings> for ContractConfig {
    type Error = ConfigError;

    fn try_from(settings: &ContractSettings) -> Result<Self, Self::Error> {
        let due_at = parse_due_at(&settings.due_at)?;

        if settings.grace_days < 0 {
            return Err(ConfigError::NegativeGraceDays(settings.grace_days));
        }
        let grace_days = u32::try_from(settings.grace_days).map_err(|_| ConfigError::InvalidValue {
            key: "grace_days".into(),
            message: format!("{} is too large", settings.grace_days),
        })?;

        if settings.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        if let Some(amount) = settings.amount {
            if !amount.is_finite() {
                return Err(ConfigError::InvalidValue {
                    key: "amount".into(),
                    message: format!("{amount} is not a finite number"),
                });
            }
        }

        settings.escalation.validate()?;

        Ok(Self {
            due_at,
            grace_days,
            client_label: settings.client_label.clone(),
            project_label: settings.project_label.clone(),
            contact: settings.contact.clone(),
            amount: settings.amount,
            currency: settings.currency.clone(),
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            profile: settings.profile,
            escalation: settings.escalation.clone(),
        })
    }
}

impl TryFrom<ContractSettings> for ContractConfig {
    type Error = ConfigError;

    fn try_from(settings: ContractSettings) -> Result<Self, Self::Error> {
        Self::try_from(&settings)
    }
}
