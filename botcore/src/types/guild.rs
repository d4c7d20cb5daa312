use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::id::{ChannelId, GuildId, RoleId, Snowflake, UserId};
use super::permissions::Permissions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guild {
    pub id: GuildId,
    pub owner_id: UserId,
}

impl Guild {
    /// The `@everyone` role shares its id with the guild.
    pub fn everyone_role_id(&self) -> RoleId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub hoist: bool,
}

pub type RoleTable = HashMap<RoleId, Role>;

/// Position of a role, with unknown ids sorting as position 0.
pub fn role_position(roles: &RoleTable, id: Option<RoleId>) -> i64 {
    id.and_then(|id| roles.get(&id))
        .map(|role| role.position)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteKind {
    Role,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: OverwriteKind,
    #[serde(default)]
    pub allow: Permissions,
    #[serde(default)]
    pub deny: Permissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    #[default]
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildAnnouncement,
    AnnouncementThread,
    PublicThread,
    PrivateThread,
    GuildStageVoice,
    GuildDirectory,
    GuildForum,
    GuildMedia,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    #[serde(rename = "type", default)]
    pub kind: ChannelKind,
    #[serde(default)]
    pub permission_overwrites: Vec<PermissionOverwrite>,
}

impl Channel {
    /// Whether the host renders a member-list sidebar for this channel.
    ///
    /// Private channels, voice-like channels and directories have no
    /// guild member list.
    pub fn has_member_list(&self) -> bool {
        self.guild_id.is_some()
            && !matches!(
                self.kind,
                ChannelKind::Dm
                    | ChannelKind::GroupDm
                    | ChannelKind::GuildVoice
                    | ChannelKind::GuildStageVoice
                    | ChannelKind::GuildDirectory
            )
    }
}
