//! Simulated platform collaborators. Used by this crate's own tests and
//! public so embedders can exercise their consumers without a device.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::oneshot;

use super::{
    ForegroundPresence, LocationProvider, PermissionProbe, PresenceError, SampleConsumer,
    SampleFeed, SettingsClient, SettingsVerdict, StatusNotice, Subscription,
};
use crate::reporter::{LocationSample, PollingConfig};

/// Permission probe with a switchable answer, so a grant can be revoked
/// mid-flight.
#[derive(Debug)]
pub struct ScriptedPermissions {
    granted: AtomicBool,
}

impl ScriptedPermissions {
    pub fn granted() -> Self {
        Self {
            granted: AtomicBool::new(true),
        }
    }

    pub fn denied() -> Self {
        Self {
            granted: AtomicBool::new(false),
        }
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }
}

impl PermissionProbe for ScriptedPermissions {
    fn has_location_permission(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }
}

/// Records published notices and withdrawals; can be made to fail.
#[derive(Debug, Default)]
pub struct RecordingPresence {
    published: Mutex<Vec<StatusNotice>>,
    withdrawals: AtomicUsize,
    failing: bool,
}

impl RecordingPresence {
    pub fn new() -> Self {
        Self::default()
    }

    /// A presence whose `publish` always fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<StatusNotice> {
        self.published.lock().unwrap().clone()
    }

    pub fn withdrawals(&self) -> usize {
        self.withdrawals.load(Ordering::SeqCst)
    }

    /// True while a notice is published and not yet withdrawn.
    pub fn is_live(&self) -> bool {
        self.published.lock().unwrap().len() > self.withdrawals()
    }
}

impl ForegroundPresence for RecordingPresence {
    fn publish(&self, notice: &StatusNotice) -> Result<(), PresenceError> {
        if self.failing {
            return Err(PresenceError("notification channel unavailable".into()));
        }
        self.published.lock().unwrap().push(notice.clone());
        Ok(())
    }

    fn withdraw(&self) {
        self.withdrawals.fetch_add(1, Ordering::SeqCst);
    }
}

/// Settings client that either answers immediately or parks the sender for
/// the test to resolve (or abandon) later.
#[derive(Debug)]
pub struct ScriptedSettings {
    verdict: Option<SettingsVerdict>,
    pending: Mutex<Option<oneshot::Sender<SettingsVerdict>>>,
    checks: AtomicUsize,
}

impl ScriptedSettings {
    /// Answers every check with `verdict` as soon as it is submitted.
    pub fn immediate(verdict: SettingsVerdict) -> Self {
        Self {
            verdict: Some(verdict),
            pending: Mutex::new(None),
            checks: AtomicUsize::new(0),
        }
    }

    /// Holds each check open until `resolve` or `abandon` is called.
    pub fn manual() -> Self {
        Self {
            verdict: None,
            pending: Mutex::new(None),
            checks: AtomicUsize::new(0),
        }
    }

    /// Completes the pending check. Returns `false` if none is pending or
    /// the checker went away.
    pub fn resolve(&self, verdict: SettingsVerdict) -> bool {
        match self.pending.lock().unwrap().take() {
            Some(tx) => tx.send(verdict).is_ok(),
            None => false,
        }
    }

    /// Drops the pending sender, which the checker observes as a cancelled
    /// check.
    pub fn abandon(&self) {
        self.pending.lock().unwrap().take();
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.lock().unwrap().is_some()
    }
}

impl SettingsClient for ScriptedSettings {
    fn check_settings(&self, _config: &PollingConfig) -> oneshot::Receiver<SettingsVerdict> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        match self.verdict {
            Some(verdict) => {
                let _ = tx.send(verdict);
            }
            None => {
                *self.pending.lock().unwrap() = Some(tx);
            }
        }
        rx
    }
}

/// Fused-provider stand-in: hands out subscriptions and lets the test push
/// fixes through the latest feed.
#[derive(Debug, Default)]
pub struct SimulatedProvider {
    feed: Mutex<Option<SampleFeed>>,
    subscriptions: AtomicUsize,
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes one fix into the active subscription. Returns `false` when no
    /// subscription was ever made or the last one has been cancelled.
    pub fn deliver(&self, sample: LocationSample) -> bool {
        match self.feed.lock().unwrap().as_ref() {
            Some(feed) => feed.deliver(sample),
            None => false,
        }
    }

    /// Total number of subscriptions handed out.
    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }
}

impl LocationProvider for SimulatedProvider {
    fn subscribe(&self, _config: &PollingConfig) -> Subscription {
        let (feed, subscription) = Subscription::feed();
        *self.feed.lock().unwrap() = Some(feed);
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        subscription
    }
}

/// Consumer that keeps every delivered sample.
#[derive(Debug, Default)]
pub struct CollectingConsumer {
    samples: Mutex<Vec<LocationSample>>,
}

impl CollectingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> Vec<LocationSample> {
        self.samples.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.samples.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SampleConsumer for CollectingConsumer {
    fn on_sample(&self, sample: LocationSample) {
        self.samples.lock().unwrap().push(sample);
    }
}
