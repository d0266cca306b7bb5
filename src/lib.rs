//! Foreground location reporting: polls a fused location provider at a
//! fixed cadence and hands every fix to a registered consumer until
//! stopped. The platform pieces (permission check, foreground status
//! indicator, settings check, the provider itself) are injected through
//! the traits in [`platform`], so the whole lifecycle runs unchanged
//! against a real device binding or the simulated doubles.

pub mod logging;
pub mod platform;
pub mod reporter;

pub use reporter::{
    LocationReporter, LocationSample, PollingConfig, Priority, ReporterError, ReporterState,
    ReporterStatus,
};
