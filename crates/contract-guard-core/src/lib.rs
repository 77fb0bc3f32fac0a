//! # Contract Guard Core Library
//!
//! This library provides the contract compliance guard for a public-sector
//! recruitment portal. It watches a single contractual deadline and
//! progressively degrades the rendered application once the deadline passes,
//! ending in a lockout modal. The CLI binary and any UI host are thin layers
//! over this crate.
//!
//! ## Architecture
//!
//! - **Clock**: the only environment dependency; swappable for tests
//! - **Contract**: validated, immutable deadline configuration
//! - **Evaluator**: pure `(config, now) -> GuardStatus` state machine
//! - **Effects**: pure tier -> opacity/blur/grayscale/scale/interaction lookup
//! - **Controller**: owns the polling timer and the latest snapshot
//! - **Shell**: view model (notification, modal, debug overlay) and HTML
//!
//! The guard is presentational only. It holds no durable state: every
//! restart begins at whatever tier the current time implies.
//!
//! ## Key Components
//!
//! - [`evaluate`]: Status evaluator
//! - [`DegradationEffects`]: Effects mapper
//! - [`GuardController`]: Polling orchestrator
//! - [`PresentationShell`]: View builder and action dispatch
//! - [`Config`]: TOML configuration management

pub mod clock;
pub mod contract;
pub mod error;
pub mod events;
pub mod guard;
pub mod shell;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use contract::{
    ContactChannels, ContractConfig, ContractSettings, EscalationThresholds, GuardProfile,
};
pub use error::{ConfigError, CoreError, ShellError};
pub use events::GuardEvent;
pub use guard::{
    evaluate, DegradationEffects, GuardController, GuardHandle, GuardStatus, GuardTier,
    SelectionMode, StatusSink,
};
pub use shell::{ActionKind, ActionOutcome, PresentationShell, ShellOptions, ShellView};
pub use storage::Config;
