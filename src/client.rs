use botcore::directory::GuildDirectory;
use botcore::member_list::MemberListProjector;
use botcore::purge;
use botcore::session::SessionState;
use botcore::snowflake::SnowflakeGenerator;
use botcore::token::validate_token;
use botcore::types::MessageId;
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::member_list_worker::{MemberListWorker, WorkerCommand};
use crate::types::events::{EventBus, HostEvent, ReconnectReason, ReconnectRequested};

/// Session owner for a bot login.
///
/// Tracks shards and the channel being viewed, and drives the member-list
/// worker from host events. Must be created inside a Tokio runtime.
pub struct BotClient {
    config: Config,
    session: Arc<Mutex<SessionState>>,
    snowflakes: Mutex<SnowflakeGenerator>,
    event_bus: Arc<EventBus>,
    worker_tx: mpsc::UnboundedSender<WorkerCommand>,
    worker_handle: JoinHandle<()>,
}

impl BotClient {
    pub fn new(config: Config, directory: Arc<dyn GuildDirectory>) -> Self {
        let session = Arc::new(Mutex::new(SessionState::new()));
        let event_bus = Arc::new(EventBus::new());

        let worker = MemberListWorker::new(
            MemberListProjector::new(config.show_member_list),
            config.throttle_interval(),
            directory,
            session.clone(),
            event_bus.clone(),
        );
        let (worker_tx, worker_handle) = worker.spawn();

        Self {
            config,
            session,
            snowflakes: Mutex::new(SnowflakeGenerator::new()),
            event_bus,
            worker_tx,
            worker_handle,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        self.event_bus.clone()
    }

    /// A copy of the current session state.
    pub fn session(&self) -> SessionState {
        self.lock_session().clone()
    }

    fn lock_session(&self) -> MutexGuard<'_, SessionState> {
        self.session
            .lock()
            .expect("Session mutex should not be poisoned")
    }

    /// Applies a host notification and schedules a member-list refresh when
    /// it concerns the guild being viewed.
    pub fn handle_event(&self, event: &HostEvent) -> Result<bool> {
        let current_guild = {
            let mut session = self.lock_session();
            if let HostEvent::ChannelSelect {
                guild_id,
                channel_id,
            } = event
            {
                session.select_channel(*guild_id, *channel_id);
            }
            session.current_guild
        };

        if !event.affects(current_guild) {
            return Ok(false);
        }
        debug!(target: "BotClient/MemberList", "Refresh requested by {}", event.source());
        self.send(WorkerCommand::Refresh(event.source()))?;
        Ok(true)
    }

    /// Drops a deferred member-list update.
    pub fn cancel_pending_update(&self) -> Result<()> {
        self.send(WorkerCommand::Cancel)
    }

    fn send(&self, command: WorkerCommand) -> Result<()> {
        self.worker_tx
            .send(command)
            .map_err(|_| ClientError::WorkerStopped)
    }

    /// Records the shard count reported for the bot.
    pub fn apply_bot_info(&self, total_shards: u32) -> Result<()> {
        self.lock_session().apply_bot_info(total_shards)?;
        Ok(())
    }

    /// Checks the token's format and asks for a fresh connection on shard 0.
    /// The token itself is not kept.
    pub fn login<'a>(&self, token: &'a str) -> Result<&'a str> {
        let token = validate_token(token).inspect_err(|_| {
            warn!(target: "BotClient/Session", "Login Failure: Invalid token");
        })?;
        let shard = {
            let mut session = self.lock_session();
            session.reset_shard();
            session.shard()
        };
        self.request_reconnect(shard, ReconnectReason::Login);
        Ok(token)
    }

    pub fn switch_shard(&self, id: i64) -> Result<u32> {
        let (shard_id, shard) = {
            let mut session = self.lock_session();
            let shard_id = session.switch_shard(id)?;
            (shard_id, session.shard())
        };
        self.request_reconnect(shard, ReconnectReason::ShardSwitch);
        Ok(shard_id)
    }

    /// Moves to the shard owning `raw_guild_id`.
    pub fn switch_guild(&self, raw_guild_id: &str) -> Result<u32> {
        let (shard_id, shard) = {
            let mut session = self.lock_session();
            let shard_id = session.switch_guild(raw_guild_id)?;
            (shard_id, session.shard())
        };
        self.request_reconnect(shard, ReconnectReason::GuildSwitch);
        Ok(shard_id)
    }

    /// Picks which of the last `amount` fetched messages can be bulk
    /// deleted right now.
    pub fn purge_selection(
        &self,
        amount: i64,
        fetched: impl IntoIterator<Item = MessageId>,
    ) -> Result<Vec<MessageId>> {
        self.purge_selection_at(amount, fetched, Utc::now().timestamp_millis())
    }

    /// [`Self::purge_selection`] with an explicit current time.
    pub fn purge_selection_at(
        &self,
        amount: i64,
        fetched: impl IntoIterator<Item = MessageId>,
        now_ms: i64,
    ) -> Result<Vec<MessageId>> {
        let limit = purge::validate_amount(amount).inspect_err(|e| {
            warn!(target: "BotClient/Purge", "{e}");
        })?;
        let mut generator = self
            .snowflakes
            .lock()
            .expect("Snowflake mutex should not be poisoned");
        let messages = purge::bulk_deletable(
            &mut generator,
            fetched.into_iter().take(usize::from(limit)),
            now_ms,
        )?;
        debug!(
            target: "BotClient/Purge",
            "{} of up to {limit} messages can be deleted", messages.len()
        );
        Ok(messages)
    }

    fn request_reconnect(&self, shard: [u32; 2], reason: ReconnectReason) {
        info!(
            target: "BotClient/Session",
            "Reconnect requested ({reason:?}), Shard ID: {} (All: {})", shard[0], shard[1]
        );
        let _ = self
            .event_bus
            .reconnect_requested
            .send(Arc::new(ReconnectRequested { shard, reason }));
    }

    /// Stops the member-list worker, discarding any deferred update.
    pub async fn shutdown(self) {
        drop(self.worker_tx);
        if let Err(e) = self.worker_handle.await {
            warn!(target: "BotClient/MemberList", "Worker task failed: {e}");
        }
    }
}
