use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One provider-delivered position fix. Never constructed synthetically;
/// every sample a consumer sees originated in the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub timestamp: DateTime<Utc>,
    pub accuracy_m: Option<f64>,
}
