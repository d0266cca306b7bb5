mod error;
mod reporter;
mod sample;
mod types;

pub use error::ReporterError;
pub use reporter::{LocationReporter, ReporterState, ReporterStatus};
pub use sample::LocationSample;
pub use types::{PollingConfig, Priority};
