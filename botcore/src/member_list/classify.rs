use crate::permissions::compute_permissions;
use crate::types::guild::role_position;
use crate::types::{
    Channel, Guild, GuildMember, Member, MemberStatus, Permissions, PresenceStatus, RoleTable,
    UserId,
};

/// Largest guild for which offline members are listed at all.
pub const OFFLINE_MEMBER_LIMIT: usize = 1000;

/// The guild and channel a projection pass is computed for.
#[derive(Debug, Clone, Copy)]
pub struct ChannelContext<'a> {
    pub guild: &'a Guild,
    pub roles: &'a RoleTable,
    pub channel: &'a Channel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub online: Vec<Member>,
    pub offline: Vec<Member>,
    /// Size of the raw membership, including members filtered out.
    pub member_count: usize,
}

/// Splits the guild's members into those shown as online and those shown
/// as offline in `ctx.channel`.
///
/// Members who cannot view the channel are skipped. In guilds above
/// [`OFFLINE_MEMBER_LIMIT`] offline members are dropped entirely, so they
/// appear in neither bucket.
pub fn classify<F>(members: &[GuildMember], ctx: &ChannelContext<'_>, presence: F) -> Classified
where
    F: Fn(UserId) -> PresenceStatus,
{
    let member_count = members.len();
    let include_offline = member_count <= OFFLINE_MEMBER_LIMIT;
    let mut classified = Classified {
        member_count,
        ..Default::default()
    };

    for raw in members {
        let permissions = compute_permissions(
            raw,
            ctx.guild,
            ctx.roles,
            &ctx.channel.permission_overwrites,
        );
        if !permissions.contains(Permissions::VIEW_CHANNEL) {
            continue;
        }

        let status = MemberStatus::from(presence(raw.user_id));
        let position = role_position(ctx.roles, raw.hoist_role_id);
        let member = Member::new(raw.clone(), status, position);

        if !status.is_offline() {
            classified.online.push(member);
        } else if include_offline {
            classified.offline.push(member);
        }
    }

    classified
}
