//! Guard controller.
//!
//! Owns the polling task that re-evaluates the contract every
//! `poll_interval` and keeps the latest [`GuardStatus`] snapshot.
//!
//! ## Lifecycle
//!
//! ```text
//! Stopped --start()--> Running --stop()/drop--> Stopped
//!                      Running --restart()--> Running (new config)
//! ```
//!
//! `start()` evaluates once synchronously before the first timer tick.
//!
//! Two locks are involved, always taken in this order: `delivery`, then
//! `state`. Status changes happen under `state`; sinks are called after
//! `state` is released but while `delivery` is held. `stop()` bumps the
//! generation under both, so once it returns no tick can publish again.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::status::{evaluate, GuardStatus, GuardTier};
use crate::clock::{Clock, SystemClock};
use crate::contract::{ContractConfig, ContractSettings};
use crate::error::{CoreError, Result};
use crate::events::GuardEvent;

/// Receives guard events.
///
/// Sinks may read the guard through a [`GuardHandle`] but must not start,
/// stop or re-evaluate the controller.
pub trait StatusSink: Send + Sync {
    fn publish(&self, event: &GuardEvent);
}

impl<F> StatusSink for F
where
    F: Fn(&GuardEvent) + Send + Sync,
{
    fn publish(&self, event: &GuardEvent) {
        self(event)
    }
}

#[derive(Default)]
struct Inner {
    generation: u64,
    running: bool,
    config: Option<Arc<ContractConfig>>,
    status: Option<GuardStatus>,
    sinks: Vec<Arc<dyn StatusSink>>,
}

impl Inner {
    /// Replace the snapshot and return the events to publish.
    fn apply(&mut self, status: GuardStatus) -> Vec<GuardEvent> {
        let previous = self.status.as_ref().map(|s| s.tier);
        debug!(
            tier = %status.tier,
            days_late = status.days_late,
            fade_level = status.fade_level,
            "guard evaluated"
        );

        self.status = Some(status.clone());
        let at = status.evaluated_at;
        let to = status.tier;
        let mut events = vec![GuardEvent::StatusEvaluated { status }];

        if previous != Some(to) {
            if to == GuardTier::Blocked {
                warn!(from = ?previous, "guard entered blocked tier; content is locked");
            } else {
                info!(from = ?previous, to = %to, "guard tier changed");
            }
            events.push(GuardEvent::TierChanged {
                from: previous,
                to,
                at,
            });
        }
        events
    }
}

/// Events waiting for delivery, together with the sinks registered when
/// they were produced.
struct Outbox {
    sinks: Vec<Arc<dyn StatusSink>>,
    events: Vec<GuardEvent>,
}

impl Outbox {
    fn new(inner: &Inner, events: Vec<GuardEvent>) -> Self {
        Self {
            sinks: inner.sinks.clone(),
            events,
        }
    }

    fn deliver(self) {
        for event in &self.events {
            for sink in &self.sinks {
                sink.publish(event);
            }
        }
    }
}

#[derive(Default)]
struct Shared {
    state: Mutex<Inner>,
    delivery: Mutex<()>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, Inner> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn delivery(&self) -> MutexGuard<'_, ()> {
        self.delivery
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cloneable read-only view of a controller's latest state.
#[derive(Clone)]
pub struct GuardHandle {
    shared: Arc<Shared>,
}

impl GuardHandle {
    pub fn is_running(&self) -> bool {
        self.shared.state().running
    }

    /// Most recent snapshot, if the guard was ever started.
    pub fn current_status(&self) -> Option<GuardStatus> {
        self.shared.state().status.clone()
    }

    pub fn config(&self) -> Option<Arc<ContractConfig>> {
        self.shared.state().config.clone()
    }
}

/// Stateful orchestrator around the evaluator.
pub struct GuardController {
    clock: Arc<dyn Clock>,
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl GuardController {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            shared: Arc::new(Shared::default()),
            task: None,
        }
    }

    /// Controller driven by the system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn handle(&self) -> GuardHandle {
        GuardHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn add_sink<S: StatusSink + 'static>(&self, sink: S) {
        self.shared.state().sinks.push(Arc::new(sink));
    }

    /// Validate `settings`, evaluate immediately and begin polling.
    ///
    /// Starting a running controller restarts it against the new settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid due date, grace period,
    /// poll interval or thresholds; the controller is left untouched in that
    /// case. Returns [`CoreError::RuntimeUnavailable`] outside a tokio runtime.
    pub fn start(&mut self, settings: &ContractSettings) -> Result<GuardStatus> {
        let config = ContractConfig::try_from(settings)?;
        self.start_config(config)
    }

    /// Same as [`start`](Self::start) for an already validated config.
    pub fn start_config(&mut self, config: ContractConfig) -> Result<GuardStatus> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| CoreError::RuntimeUnavailable(e.to_string()))?;

        self.stop();

        let config = Arc::new(config);
        let period = config.poll_interval();
        let (generation, status) = {
            let _delivery = self.shared.delivery();
            let (generation, status, outbox) = {
                let mut inner = self.shared.state();
                inner.generation += 1;
                inner.running = true;
                inner.config = Some(Arc::clone(&config));

                let now = self.clock.now();
                info!(
                    due_at = %config.due_at(),
                    grace_days = config.grace_days(),
                    poll_interval_ms = period.as_millis() as u64,
                    "guard started"
                );
                let mut events = vec![GuardEvent::GuardStarted {
                    due_at: config.due_at(),
                    grace_days: config.grace_days(),
                    poll_interval_ms: period.as_millis() as u64,
                    at: now,
                }];

                let status = evaluate(&config, now);
                events.extend(inner.apply(status.clone()));
                (inner.generation, status, Outbox::new(&inner, events))
            };
            outbox.deliver();
            (generation, status)
        };

        let shared = Arc::clone(&self.shared);
        let clock = Arc::clone(&self.clock);
        self.task = Some(handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            // A suspended host does not catch up; the next tick just sees the new `now`.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _delivery = shared.delivery();
                let outbox = {
                    let mut inner = shared.state();
                    if inner.generation != generation {
                        break;
                    }
                    let Some(config) = inner.config.clone() else {
                        break;
                    };
                    let events = inner.apply(evaluate(&config, clock.now()));
                    Outbox::new(&inner, events)
                };
                outbox.deliver();
            }
        }));

        Ok(status)
    }

    /// Restart evaluation against new settings.
    pub fn restart(&mut self, settings: &ContractSettings) -> Result<GuardStatus> {
        self.start(settings)
    }

    /// Cancel polling. No status is published after this returns.
    pub fn stop(&mut self) {
        let was_running = {
            let _delivery = self.shared.delivery();
            let (was_running, outbox) = {
                let mut inner = self.shared.state();
                let was_running = inner.running;
                inner.generation += 1;
                inner.running = false;
                let events = if was_running {
                    vec![GuardEvent::GuardStopped {
                        at: self.clock.now(),
                    }]
                } else {
                    Vec::new()
                };
                (was_running, Outbox::new(&inner, events))
            };
            outbox.deliver();
            was_running
        };

        if let Some(task) = self.task.take() {
            task.abort();
        }
        if was_running {
            info!("guard stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle().is_running()
    }

    /// Most recent snapshot, if the guard was ever started.
    pub fn current_status(&self) -> Option<GuardStatus> {
        self.handle().current_status()
    }

    pub fn config(&self) -> Option<Arc<ContractConfig>> {
        self.handle().config()
    }

    /// Evaluate right now against the running config, outside the timer.
    ///
    /// Returns `None` when the controller is stopped.
    pub fn evaluate_now(&self) -> Option<GuardStatus> {
        let _delivery = self.shared.delivery();
        let (status, outbox) = {
            let mut inner = self.shared.state();
            if !inner.running {
                return None;
            }
            let config = inner.config.clone()?;
            let status = evaluate(&config, self.clock.now());
            let events = inner.apply(status.clone());
            (status, Outbox::new(&inner, events))
        };
        outbox.deliver();
        Some(status)
    }
}

impl Drop for GuardController {
    fn drop(&mut self) {
        self.stop();
    }
}
