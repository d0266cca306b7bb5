//! Seams to the host platform: permission checks, the foreground status
//! indicator, the location-settings check and the fused provider itself.
//! The reporter only ever talks to these traits, so tests (and embedders)
//! swap in the doubles from [`simulated`].

pub mod simulated;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::reporter::{LocationSample, PollingConfig};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PresenceError(pub String);

/// Content of the persistent status indicator shown while polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNotice {
    pub channel_id: String,
    pub title: String,
    pub text: String,
}

impl Default for StatusNotice {
    fn default() -> Self {
        Self {
            channel_id: "channel_location".to_string(),
            title: "Location reporting".to_string(),
            text: "You are now online".to_string(),
        }
    }
}

/// Outcome of the asynchronous location-settings check, the platform's
/// success/failure/cancel listener triad collapsed into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsVerdict {
    Satisfied,
    Rejected,
    Cancelled,
}

/// Runtime capability check. The reporter only consults this; requesting
/// the permission is the embedder's job.
pub trait PermissionProbe: Send + Sync {
    fn has_location_permission(&self) -> bool;
}

/// Publishes the foreground status indicator. The published notice must
/// stay live for the whole polling session; the reporter withdraws it when
/// the session ends, however it ends.
pub trait ForegroundPresence: Send + Sync {
    fn publish(&self, notice: &StatusNotice) -> Result<(), PresenceError>;
    fn withdraw(&self);
}

/// Asynchronous check that device-level location settings can satisfy the
/// requested config. A dropped sender reads as [`SettingsVerdict::Cancelled`].
pub trait SettingsClient: Send + Sync {
    fn check_settings(&self, config: &PollingConfig) -> oneshot::Receiver<SettingsVerdict>;
}

/// The fused location provider. `subscribe` hands back the session's one
/// subscription handle; the provider keeps the paired [`SampleFeed`] and
/// pushes fixes into it from whatever thread it likes.
pub trait LocationProvider: Send + Sync {
    fn subscribe(&self, config: &PollingConfig) -> Subscription;
}

/// Delivery target for samples, the only egress point. Called on the
/// session task in provider order; implementations must not block, a slow
/// consumer delays every later delivery.
pub trait SampleConsumer: Send + Sync {
    fn on_sample(&self, sample: LocationSample);
}

/// Receiving half of an active provider subscription. Dropping it cancels
/// the subscription: the provider's feed is closed and later deliveries go
/// nowhere.
pub struct Subscription {
    samples: mpsc::UnboundedReceiver<LocationSample>,
}

impl Subscription {
    /// Creates a feed/subscription pair. The channel is unbounded: a
    /// session loop held up by a slow consumer delays deliveries, it never
    /// loses them.
    pub fn feed() -> (SampleFeed, Subscription) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SampleFeed { tx }, Subscription { samples: rx })
    }

    pub async fn next(&mut self) -> Option<LocationSample> {
        self.samples.recv().await
    }
}

/// Sending half held by the provider implementation.
#[derive(Debug, Clone)]
pub struct SampleFeed {
    tx: mpsc::UnboundedSender<LocationSample>,
}

impl SampleFeed {
    /// Pushes one fix towards the session. Returns `false` exactly when
    /// the subscription has been cancelled; an accepted fix is never
    /// dropped, only delayed behind earlier ones.
    pub fn deliver(&self, sample: LocationSample) -> bool {
        self.tx.send(sample).is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.tx.is_closed()
    }
}
