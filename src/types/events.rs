use botcore::member_list::MemberListUpdate;
use botcore::types::{ChannelId, GuildId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

// The size of the broadcast channel buffer.
const CHANNEL_CAPACITY: usize = 100;

// Macro to generate EventBus fields and constructor
macro_rules! define_event_bus {
    ($(($field:ident, $type:ty)),* $(,)?) => {
        /// Typed event bus with a separate broadcast channel per event type.
        #[derive(Debug)]
        pub struct EventBus {
            $(
                pub $field: broadcast::Sender<$type>,
            )*
        }

        impl EventBus {
            pub fn new() -> Self {
                Self {
                    $(
                        $field: broadcast::channel(CHANNEL_CAPACITY).0,
                    )*
                }
            }
        }
    };
}

define_event_bus! {
    (member_list_update, Arc<MemberListUpdate>),
    (reconnect_requested, Arc<ReconnectRequested>),
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconnectReason {
    Login,
    ShardSwitch,
    GuildSwitch,
}

/// The gateway connection has to be re-established with a new shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconnectRequested {
    /// `[shard_id, shard_count]` to identify with.
    pub shard: [u32; 2],
    pub reason: ReconnectReason,
}

/// One entry of a `PRESENCE_UPDATES` dispatch. Only the guild matters here;
/// user and status fields are read from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUpdate {
    #[serde(default)]
    pub guild_id: Option<GuildId>,
}

impl PresenceUpdate {
    pub fn in_guild(guild_id: GuildId) -> Self {
        Self {
            guild_id: Some(guild_id),
        }
    }
}

/// Notifications from the host's dispatcher that can change the member list.
///
/// Only ids are carried: the projection always rereads the full state from
/// the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum HostEvent {
    GuildMemberUpdate {
        guild_id: GuildId,
    },
    GuildMemberAdd {
        guild_id: GuildId,
    },
    GuildMemberRemove {
        guild_id: GuildId,
    },
    PresenceUpdates {
        updates: Vec<PresenceUpdate>,
    },
    ChannelSelect {
        #[serde(default)]
        guild_id: Option<GuildId>,
        #[serde(default)]
        channel_id: Option<ChannelId>,
    },
    GuildRoleUpdate {
        guild_id: GuildId,
    },
    GuildRoleCreate {
        guild_id: GuildId,
    },
    GuildRoleDelete {
        guild_id: GuildId,
    },
}

impl HostEvent {
    /// Short name used when logging what caused an update.
    pub fn source(&self) -> &'static str {
        match self {
            HostEvent::GuildMemberUpdate { .. } => "GuildMemberUpdate",
            HostEvent::GuildMemberAdd { .. } => "GuildMemberAdd",
            HostEvent::GuildMemberRemove { .. } => "GuildMemberRemove",
            HostEvent::PresenceUpdates { .. } => "PresenceUpdates",
            HostEvent::ChannelSelect { .. } => "ChannelSelect",
            HostEvent::GuildRoleUpdate { .. } => "GuildRoleUpdate",
            HostEvent::GuildRoleCreate { .. } => "GuildRoleCreate",
            HostEvent::GuildRoleDelete { .. } => "GuildRoleDelete",
        }
    }

    /// Whether the event should refresh the list of `current_guild`.
    /// Channel selection always does.
    pub fn affects(&self, current_guild: Option<GuildId>) -> bool {
        match self {
            HostEvent::ChannelSelect { .. } => true,
            HostEvent::PresenceUpdates { updates } => current_guild
                .is_some_and(|current| updates.iter().any(|u| u.guild_id == Some(current))),
            HostEvent::GuildMemberUpdate { guild_id }
            | HostEvent::GuildMemberAdd { guild_id }
            | HostEvent::GuildMemberRemove { guild_id }
            | HostEvent::GuildRoleUpdate { guild_id }
            | HostEvent::GuildRoleCreate { guild_id }
            | HostEvent::GuildRoleDelete { guild_id } => current_guild == Some(*guild_id),
        }
    }
}
