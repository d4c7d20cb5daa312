use log::{debug, warn};
use serde::Serialize;

use super::classify::{ChannelContext, classify};
use super::groups::{Group, ListEntry, build_groups};
use super::list_id::compute_list_id;
use crate::directory::GuildDirectory;
use crate::session::SessionState;
use crate::types::{GuildId, GuildMember, Permissions, PresenceStatus, UserId};

/// Dispatch type the host's member-list store listens for.
pub const MEMBER_LIST_UPDATE: &str = "GUILD_MEMBER_LIST_UPDATE";

const SYNC_OP: &str = "SYNC";
const SYNC_RANGE: [u32; 2] = [0, 99];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionResult {
    pub ops: Vec<ListEntry>,
    pub groups: Vec<Group>,
    pub online_count: usize,
    pub member_count: usize,
    pub list_id: String,
}

impl ProjectionResult {
    /// Computes the list for one channel from the guild's full membership.
    pub fn compute<F>(ctx: &ChannelContext<'_>, members: &[GuildMember], presence: F) -> Self
    where
        F: Fn(UserId) -> PresenceStatus,
    {
        let everyone_can_view = ctx
            .roles
            .get(&ctx.guild.everyone_role_id())
            .is_some_and(|role| role.permissions.contains(Permissions::VIEW_CHANNEL));
        let list_id = compute_list_id(&ctx.channel.permission_overwrites, everyone_can_view);

        let classified = classify(members, ctx, presence);
        let online_count = classified.online.len();
        let layout = build_groups(classified.online, classified.offline, ctx.roles);

        Self {
            ops: layout.ops,
            groups: layout.groups,
            online_count,
            member_count: classified.member_count,
            list_id,
        }
    }
}

/// A list operation replacing a range of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOp {
    pub items: Vec<ListEntry>,
    pub op: &'static str,
    pub range: [u32; 2],
}

/// Payload handed to the host's dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberListUpdate {
    pub guild_id: GuildId,
    pub id: String,
    pub ops: Vec<SyncOp>,
    pub groups: Vec<Group>,
    pub online_count: usize,
    pub member_count: usize,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl MemberListUpdate {
    pub fn new(guild_id: GuildId, result: ProjectionResult) -> Self {
        Self {
            guild_id,
            id: result.list_id,
            ops: vec![SyncOp {
                items: result.ops,
                op: SYNC_OP,
                range: SYNC_RANGE,
            }],
            groups: result.groups,
            online_count: result.online_count,
            member_count: result.member_count,
            kind: MEMBER_LIST_UPDATE,
        }
    }

    /// Rows of the single sync operation.
    pub fn items(&self) -> &[ListEntry] {
        self.ops.first().map(|op| op.items.as_slice()).unwrap_or_default()
    }
}

/// Builds member-list updates for whatever channel the session is on.
#[derive(Debug, Clone, Copy)]
pub struct MemberListProjector {
    enabled: bool,
}

impl Default for MemberListProjector {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MemberListProjector {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `None` when there is nothing to show: the feature is off, no
    /// guild is selected, or the channel has no member list.
    pub fn project(
        &self,
        directory: &dyn GuildDirectory,
        session: &SessionState,
    ) -> Option<MemberListUpdate> {
        if !self.enabled {
            return None;
        }

        let Some(guild) = session.current_guild.and_then(|id| directory.guild(id)) else {
            debug!(target: "BotClient/MemberList", "No current guild, skipping update");
            return None;
        };

        let channel = session
            .current_channel
            .and_then(|id| directory.channel(id))
            .filter(|c| c.has_member_list() && c.guild_id == Some(guild.id));
        let Some(channel) = channel else {
            warn!(
                target: "BotClient/MemberList",
                "Update MemberList: Invalid Channel {:?}", session.current_channel
            );
            return None;
        };

        let roles = directory.roles(guild.id);
        let members = directory.members(guild.id);
        let ctx = ChannelContext {
            guild: &guild,
            roles: &roles,
            channel: &channel,
        };
        let result =
            ProjectionResult::compute(&ctx, &members, |user_id| directory.presence_status(user_id));

        Some(MemberListUpdate::new(guild.id, result))
    }
}
