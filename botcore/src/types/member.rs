use serde::{Deserialize, Serialize};

use super::id::{GuildId, RoleId, UserId};

/// A guild member as the host's member store holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildMember {
    pub user_id: UserId,
    pub guild_id: GuildId,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<RoleId>,
    #[serde(default)]
    pub hoist_role_id: Option<RoleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
}

/// Presence as reported by the host's presence store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Idle,
    Dnd,
    Streaming,
    Invisible,
    #[default]
    Offline,
    #[serde(other)]
    Unknown,
}

/// Status shown in the member list. Invisible users are indistinguishable
/// from offline ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Online,
    Idle,
    Dnd,
    Offline,
}

impl From<PresenceStatus> for MemberStatus {
    fn from(status: PresenceStatus) -> Self {
        match status {
            PresenceStatus::Online | PresenceStatus::Streaming => MemberStatus::Online,
            PresenceStatus::Idle => MemberStatus::Idle,
            PresenceStatus::Dnd => MemberStatus::Dnd,
            PresenceStatus::Invisible | PresenceStatus::Offline | PresenceStatus::Unknown => {
                MemberStatus::Offline
            }
        }
    }
}

impl MemberStatus {
    pub fn is_offline(self) -> bool {
        self == MemberStatus::Offline
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
}

/// A member as it appears in a projected list: the stored record plus the
/// presence and hoisted-role position computed for the current pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    #[serde(flatten)]
    pub member: GuildMember,
    pub user: UserRef,
    pub status: MemberStatus,
    pub position: i64,
}

impl Member {
    pub fn new(member: GuildMember, status: MemberStatus, position: i64) -> Self {
        let user = UserRef { id: member.user_id };
        Self {
            member,
            user,
            status,
            position,
        }
    }

    pub fn id(&self) -> UserId {
        self.member.user_id
    }

    pub fn hoist_role_id(&self) -> Option<RoleId> {
        self.member.hoist_role_id
    }

    /// Name used for ordering inside a group; members without a nickname
    /// sort as the empty string.
    pub fn sort_name(&self) -> &str {
        self.member.nick.as_deref().unwrap_or("")
    }
}
