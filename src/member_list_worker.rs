//! Background task that keeps the member-list sidebar up to date.
//!
//! Host events are turned into update requests; the worker throttles them
//! and, whenever a request is released, projects the list for the session's
//! current channel and publishes it on the event bus.

use botcore::directory::GuildDirectory;
use botcore::member_list::MemberListProjector;
use botcore::session::SessionState;
use botcore::throttle::{Clock, Throttle};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::types::events::EventBus;

/// Tokio's clock, so the worker follows paused time in tests.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn instant_at(&self, ms: u64) -> Instant {
        self.origin + Duration::from_millis(ms)
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug)]
pub(crate) enum WorkerCommand {
    /// Request an update; the label names what caused it.
    Refresh(&'static str),
    /// Drop a deferred update, if any.
    Cancel,
}

pub(crate) struct MemberListWorker {
    projector: MemberListProjector,
    directory: Arc<dyn GuildDirectory>,
    session: Arc<Mutex<SessionState>>,
    event_bus: Arc<EventBus>,
    throttle: Throttle<&'static str, TokioClock>,
}

impl MemberListWorker {
    pub(crate) fn new(
        projector: MemberListProjector,
        interval: Duration,
        directory: Arc<dyn GuildDirectory>,
        session: Arc<Mutex<SessionState>>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            projector,
            directory,
            session,
            event_bus,
            throttle: Throttle::new(interval, TokioClock::new()),
        }
    }

    pub(crate) fn spawn(self) -> (mpsc::UnboundedSender<WorkerCommand>, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(self.run(rx));
        (tx, handle)
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<WorkerCommand>) {
        debug!(
            target: "BotClient/MemberList",
            "Worker started with a {:?} throttle", self.throttle.interval()
        );
        loop {
            let deadline = self
                .throttle
                .next_deadline()
                .map(|ms| self.throttle.clock().instant_at(ms));
            let sleep = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now));

            tokio::select! {
                command = commands.recv() => match command {
                    Some(WorkerCommand::Refresh(source)) => {
                        if let Some(source) = self.throttle.trigger(source) {
                            self.emit(source);
                        }
                    }
                    Some(WorkerCommand::Cancel) => {
                        if let Some(source) = self.throttle.cancel() {
                            debug!(
                                target: "BotClient/MemberList",
                                "Cancelled deferred update from {source}"
                            );
                        }
                    }
                    None => break,
                },
                _ = sleep, if deadline.is_some() => {
                    if let Some(source) = self.throttle.poll() {
                        self.emit(source);
                    }
                }
            }
        }
        debug!(target: "BotClient/MemberList", "Command channel closed, stopping worker.");
        self.throttle.dispose();
    }

    fn emit(&self, source: &str) {
        let session = match self.session.lock() {
            Ok(session) => session.clone(),
            Err(poisoned) => {
                warn!(target: "BotClient/MemberList", "Session lock poisoned, using last state");
                poisoned.into_inner().clone()
            }
        };

        let Some(update) = self.projector.project(self.directory.as_ref(), &session) else {
            return;
        };

        info!(
            target: "BotClient/MemberList",
            "Update MemberList: Emitted from {source} (list {}, {} online / {} members)",
            update.id, update.online_count, update.member_count
        );
        // No subscribers is fine; the next update recomputes everything.
        let _ = self.event_bus.member_list_update.send(Arc::new(update));
    }
}
