//! Background heartbeat scheduling.
//!
//! The scheduler never runs on its own timer. Each call to
//! [`HeartbeatScheduler::tick`] checks whether a heartbeat is due and, if so,
//! spawns exactly one onto the runtime. The outcome comes back through a
//! `watch` channel holding a [`HeartbeatState`] value, so readers always get
//! a consistent copy without sharing mutable fields.

use crate::handshake::{Handshake, SessionIdentity};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Result of a completed heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseOutcome {
    Succeeded,
    Failed,
}

/// Snapshot of heartbeat progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeartbeatState {
    /// A heartbeat has been launched and has not completed.
    pub in_flight: bool,
    /// Wall-clock time of the most recent launch.
    pub last_launched_at: Option<DateTime<Utc>>,
    /// Wall-clock time of the most recent completion.
    pub last_completed_at: Option<DateTime<Utc>>,
    /// Outcome of the most recent completed heartbeat, `None` before the first.
    pub last_outcome: Option<PulseOutcome>,
    /// Number of completed heartbeats.
    pub completed: u64,
}

impl HeartbeatState {
    /// True if the most recently completed heartbeat failed.
    #[must_use]
    pub fn last_failed(&self) -> bool {
        self.last_outcome == Some(PulseOutcome::Failed)
    }
}

/// Launches heartbeats lazily, at most one at a time.
pub struct HeartbeatScheduler {
    handshake: Arc<Handshake>,
    identity: Arc<SessionIdentity>,
    runtime: Handle,
    interval: Duration,
    last_launch: Instant,
    task: Option<JoinHandle<()>>,
    state: Arc<watch::Sender<HeartbeatState>>,
}

impl HeartbeatScheduler {
    /// Creates a scheduler. The first heartbeat is due one `interval` from now.
    pub fn new(
        handshake: Arc<Handshake>,
        identity: Arc<SessionIdentity>,
        runtime: Handle,
        interval: Duration,
    ) -> Self {
        let (state, _) = watch::channel(HeartbeatState::default());
        Self {
            handshake,
            identity,
            runtime,
            interval,
            last_launch: Instant::now(),
            task: None,
            state: Arc::new(state),
        }
    }

    /// Launches a heartbeat if none is running and the interval has elapsed.
    ///
    /// Never blocks. The launch time is recorded immediately, so a slow
    /// heartbeat does not cause another launch on the next tick. Returns
    /// true if a heartbeat was launched.
    pub fn tick(&mut self) -> bool {
        if self.in_flight() || self.last_launch.elapsed() < self.interval {
            return false;
        }

        self.last_launch = Instant::now();
        self.state.send_modify(|s| {
            s.in_flight = true;
            s.last_launched_at = Some(Utc::now());
        });

        let handshake = self.handshake.clone();
        let identity = self.identity.clone();
        let state = self.state.clone();
        debug!("Launching heartbeat for instance {}", identity.instance_id());
        let pulse = self
            .runtime
            .spawn(async move { handshake.pulse(&identity).await });
        self.task = Some(self.runtime.spawn(async move {
            // A panicking or cancelled pulse still counts as a completed failure.
            let outcome = match pulse.await {
                Ok(true) => PulseOutcome::Succeeded,
                Ok(false) => PulseOutcome::Failed,
                Err(e) => {
                    warn!("Heartbeat task aborted: {e}");
                    PulseOutcome::Failed
                }
            };
            state.send_modify(|s| {
                s.in_flight = false;
                s.last_completed_at = Some(Utc::now());
                s.last_outcome = Some(outcome);
                s.completed += 1;
            });
        }));
        true
    }

    /// True while a launched heartbeat has not finished.
    pub fn in_flight(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Copy of the current state.
    pub fn state(&self) -> HeartbeatState {
        *self.state.borrow()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<HeartbeatState> {
        self.state.subscribe()
    }
}
