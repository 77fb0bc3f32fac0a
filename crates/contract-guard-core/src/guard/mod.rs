mod controller;
mod effects;
mod status;

pub use controller::{GuardController, GuardHandle, StatusSink};
pub use effects::{DegradationEffects, SelectionMode};
pub use status::{evaluate, GuardStatus, GuardTier, BLOCKED_FADE, CRITICAL_FADE};
