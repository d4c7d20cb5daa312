//! Read access to the host's guild, member, role and presence stores.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{
    Channel, ChannelId, Guild, GuildId, GuildMember, PresenceStatus, Role, RoleId, RoleTable,
    UserId,
};

/// Synchronous, in-memory lookups a projection pass is computed from.
pub trait GuildDirectory: Send + Sync {
    fn guild(&self, guild_id: GuildId) -> Option<Guild>;

    fn channel(&self, channel_id: ChannelId) -> Option<Channel>;

    /// All known members of the guild, in store order.
    fn members(&self, guild_id: GuildId) -> Vec<GuildMember>;

    fn roles(&self, guild_id: GuildId) -> RoleTable;

    fn presence_status(&self, user_id: UserId) -> PresenceStatus;
}

/// Serialized form of a directory, as loaded from a JSON snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub guilds: Vec<GuildSnapshot>,
    #[serde(default)]
    pub presences: HashMap<UserId, PresenceStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildSnapshot {
    #[serde(flatten)]
    pub guild: Guild,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub members: Vec<GuildMember>,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

#[derive(Debug)]
struct GuildEntry {
    guild: Guild,
    roles: RoleTable,
    members: Vec<GuildMember>,
}

/// Directory backed by concurrent maps, updated from host events.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    guilds: DashMap<GuildId, GuildEntry>,
    channels: DashMap<ChannelId, Channel>,
    presences: DashMap<UserId, PresenceStatus>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: DirectorySnapshot) -> Self {
        let directory = Self::new();
        for guild in snapshot.guilds {
            directory.insert_guild(guild);
        }
        for (user_id, status) in snapshot.presences {
            directory.presences.insert(user_id, status);
        }
        directory
    }

    pub fn insert_guild(&self, snapshot: GuildSnapshot) {
        for channel in snapshot.channels {
            self.channels.insert(channel.id, channel);
        }
        let entry = GuildEntry {
            guild: snapshot.guild,
            roles: snapshot.roles.into_iter().map(|r| (r.id, r)).collect(),
            members: snapshot.members,
        };
        self.guilds.insert(entry.guild.id, entry);
    }

    pub fn upsert_channel(&self, channel: Channel) {
        self.channels.insert(channel.id, channel);
    }

    /// Adds the member, or replaces it in place if already present.
    pub fn upsert_member(&self, member: GuildMember) -> bool {
        let Some(mut entry) = self.guilds.get_mut(&member.guild_id) else {
            return false;
        };
        match entry
            .members
            .iter()
            .position(|m| m.user_id == member.user_id)
        {
            Some(index) => entry.members[index] = member,
            None => entry.members.push(member),
        }
        true
    }

    pub fn remove_member(&self, guild_id: GuildId, user_id: UserId) -> Option<GuildMember> {
        let mut entry = self.guilds.get_mut(&guild_id)?;
        let index = entry.members.iter().position(|m| m.user_id == user_id)?;
        Some(entry.members.remove(index))
    }

    pub fn upsert_role(&self, guild_id: GuildId, role: Role) -> bool {
        match self.guilds.get_mut(&guild_id) {
            Some(mut entry) => {
                entry.roles.insert(role.id, role);
                true
            }
            None => false,
        }
    }

    pub fn remove_role(&self, guild_id: GuildId, role_id: RoleId) -> Option<Role> {
        self.guilds.get_mut(&guild_id)?.roles.remove(&role_id)
    }

    pub fn set_presence(&self, user_id: UserId, status: PresenceStatus) {
        self.presences.insert(user_id, status);
    }
}

impl GuildDirectory for InMemoryDirectory {
    fn guild(&self, guild_id: GuildId) -> Option<Guild> {
        self.guilds.get(&guild_id).map(|e| e.guild.clone())
    }

    fn channel(&self, channel_id: ChannelId) -> Option<Channel> {
        self.channels.get(&channel_id).map(|c| c.clone())
    }

    fn members(&self, guild_id: GuildId) -> Vec<GuildMember> {
        self.guilds
            .get(&guild_id)
            .map(|e| e.members.clone())
            .unwrap_or_default()
    }

    fn roles(&self, guild_id: GuildId) -> RoleTable {
        self.guilds
            .get(&guild_id)
            .map(|e| e.roles.clone())
            .unwrap_or_default()
    }

    fn presence_status(&self, user_id: UserId) -> PresenceStatus {
        self.presences
            .get(&user_id)
            .map(|s| *s)
            .unwrap_or_default()
    }
}
