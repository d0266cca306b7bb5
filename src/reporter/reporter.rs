use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::logging::{EventLog, FacadeLog};
use crate::platform::{
    ForegroundPresence, LocationProvider, PermissionProbe, SampleConsumer, SettingsClient,
    SettingsVerdict, StatusNotice,
};

use super::error::ReporterError;
use super::sample::LocationSample;
use super::types::PollingConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum ReporterState {
    Idle,
    Polling { started: DateTime<Utc> },
    Stopped,
}

/// Snapshot of the reporter. Failures that resolve after `start` has
/// returned (settings verdicts, a revoked permission) land in `last_error`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterStatus {
    pub state: ReporterState,
    pub last_sample: Option<LocationSample>,
    pub last_error: Option<ReporterError>,
}

#[derive(Debug)]
struct Shared {
    status: ReporterStatus,
}

/// How a session task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// `stop` asked it to wind down.
    Stopped,
    /// The provider closed the sample feed on its own.
    FeedClosed,
}

struct SessionHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<Result<SessionEnd, ReporterError>>,
}

/// Foreground location-polling session manager. Owns at most one provider
/// subscription at a time; `start` and `stop` are the only paths that
/// create or destroy it.
pub struct LocationReporter {
    permissions: Arc<dyn PermissionProbe>,
    presence: Arc<dyn ForegroundPresence>,
    settings: Arc<dyn SettingsClient>,
    provider: Arc<dyn LocationProvider>,
    log: Arc<dyn EventLog>,
    notice: StatusNotice,
    shared: Arc<StdMutex<Shared>>,
    session: Option<SessionHandle>,
}

impl LocationReporter {
    pub fn new(
        permissions: Arc<dyn PermissionProbe>,
        presence: Arc<dyn ForegroundPresence>,
        settings: Arc<dyn SettingsClient>,
        provider: Arc<dyn LocationProvider>,
    ) -> Self {
        Self {
            permissions,
            presence,
            settings,
            provider,
            log: Arc::new(FacadeLog),
            notice: StatusNotice::default(),
            shared: Arc::new(StdMutex::new(Shared {
                status: ReporterStatus {
                    state: ReporterState::Idle,
                    last_sample: None,
                    last_error: None,
                },
            })),
            session: None,
        }
    }

    pub fn with_event_log(mut self, log: Arc<dyn EventLog>) -> Self {
        self.log = log;
        self
    }

    pub fn with_notice(mut self, notice: StatusNotice) -> Self {
        self.notice = notice;
        self
    }

    pub fn status(&self) -> ReporterStatus {
        self.shared.lock().unwrap().status.clone()
    }

    pub fn is_polling(&self) -> bool {
        matches!(self.status().state, ReporterState::Polling { .. })
    }

    /// Begins a reporting session: publishes the foreground notice, submits
    /// the settings check and returns without awaiting it. Samples start
    /// flowing to `consumer` only once the check comes back satisfied and
    /// the permission still holds; failures after this point are logged and
    /// surfaced through [`ReporterStatus::last_error`].
    pub fn start(
        &mut self,
        config: PollingConfig,
        consumer: Arc<dyn SampleConsumer>,
    ) -> Result<(), ReporterError> {
        if let Some(session) = &self.session {
            // A session that ended on its own (failed checks, closed feed)
            // has already left the Polling state; only a live one blocks.
            let live = matches!(
                self.shared.lock().unwrap().status.state,
                ReporterState::Polling { .. }
            ) && !session.join.is_finished();
            if live {
                return Err(ReporterError::AlreadyPolling);
            }
            self.session = None;
        }

        if !self.permissions.has_location_permission() {
            self.log
                .error("location permission not granted, not starting");
            return Err(ReporterError::PermissionDenied);
        }

        if config.fastest_interval_ms > config.interval_ms {
            self.log.warn(&format!(
                "fastest_interval_ms {} exceeds interval_ms {}, proceeding anyway",
                config.fastest_interval_ms, config.interval_ms
            ));
        }

        if let Err(err) = self.presence.publish(&self.notice) {
            self.log
                .error(&format!("failed to publish foreground notice: {}", err));
            return Err(err.into());
        }

        let shared = self.shared.clone();
        let permissions = self.permissions.clone();
        let presence = self.presence.clone();
        let settings = self.settings.clone();
        let provider = self.provider.clone();
        let log = self.log.clone();
        let (stop_tx, stop_rx) = oneshot::channel();

        // Recorded before the task spawns so a session that fails right
        // away cannot be overwritten by this block.
        {
            let mut locked = self.shared.lock().unwrap();
            locked.status.state = ReporterState::Polling {
                started: Utc::now(),
            };
            locked.status.last_sample = None;
            locked.status.last_error = None;
        }

        let join = tokio::spawn(async move {
            let result = run_session(
                shared.clone(),
                permissions,
                settings,
                provider,
                log.clone(),
                config,
                consumer,
                stop_rx,
            )
            .await;

            // The notice must stay live exactly as long as the session.
            presence.withdraw();

            match &result {
                Ok(SessionEnd::Stopped) => {}
                Ok(SessionEnd::FeedClosed) => {
                    log.info("provider closed the sample feed, session over");
                    let mut locked = shared.lock().unwrap();
                    locked.status.state = ReporterState::Idle;
                }
                Err(err) => {
                    log.error(&format!("session failed to start: {}", err));
                    let mut locked = shared.lock().unwrap();
                    locked.status.state = ReporterState::Idle;
                    locked.status.last_error = Some(err.clone());
                }
            }

            result
        });

        self.session = Some(SessionHandle { stop_tx, join });

        Ok(())
    }

    /// Cancels the active session, if any. Idempotent; once this returns,
    /// the session task has joined and the consumer sees no further
    /// samples from it.
    pub async fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            self.log.debug("stop with no active session, nothing to do");
            return;
        };

        let _ = session.stop_tx.send(());
        match session.join.await {
            Ok(Ok(SessionEnd::Stopped)) => {
                self.log.info("polling stopped, subscription released");
                let mut locked = self.shared.lock().unwrap();
                locked.status.state = ReporterState::Stopped;
            }
            // Session was already over; its own teardown recorded the state.
            Ok(Ok(SessionEnd::FeedClosed)) | Ok(Err(_)) => {}
            Err(err) => {
                self.log.error(&format!("session task died: {}", err));
                let mut locked = self.shared.lock().unwrap();
                locked.status.state = ReporterState::Stopped;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_session(
    shared: Arc<StdMutex<Shared>>,
    permissions: Arc<dyn PermissionProbe>,
    settings: Arc<dyn SettingsClient>,
    provider: Arc<dyn LocationProvider>,
    log: Arc<dyn EventLog>,
    config: PollingConfig,
    consumer: Arc<dyn SampleConsumer>,
    mut stop_rx: oneshot::Receiver<()>,
) -> Result<SessionEnd, ReporterError> {
    let mut verdict_rx = settings.check_settings(&config);

    let verdict = tokio::select! {
        biased;
        _ = &mut stop_rx => return Ok(SessionEnd::Stopped),
        verdict = &mut verdict_rx => verdict.unwrap_or(SettingsVerdict::Cancelled),
    };

    match verdict {
        SettingsVerdict::Satisfied => {}
        SettingsVerdict::Rejected => return Err(ReporterError::SettingsRejected),
        SettingsVerdict::Cancelled => return Err(ReporterError::SettingsCheckCancelled),
    }

    // The permission may have been revoked while the check was in flight.
    if !permissions.has_location_permission() {
        return Err(ReporterError::PermissionDenied);
    }

    let mut subscription = provider.subscribe(&config);
    log.info(&format!(
        "polling started: interval {} ms, fastest {} ms, {:?}",
        config.interval_ms, config.fastest_interval_ms, config.priority
    ));

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => return Ok(SessionEnd::Stopped),
            next = subscription.next() => match next {
                Some(sample) => {
                    consumer.on_sample(sample);
                    let mut locked = shared.lock().unwrap();
                    locked.status.last_sample = Some(sample);
                }
                None => return Ok(SessionEnd::FeedClosed),
            },
        }
    }
}
