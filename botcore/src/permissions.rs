//! Effective channel permissions for a guild member.

use crate::types::{
    Guild, GuildMember, OverwriteKind, PermissionOverwrite, Permissions, RoleTable,
};

/// Permissions granted to `member` at guild level, before any channel
/// overwrite is applied.
pub fn base_permissions(member: &GuildMember, guild: &Guild, roles: &RoleTable) -> Permissions {
    if member.user_id == guild.owner_id {
        return Permissions::all();
    }

    let mut permissions = roles
        .get(&guild.everyone_role_id())
        .map(|role| role.permissions)
        .unwrap_or_default();

    for role in member.roles.iter().filter_map(|id| roles.get(id)) {
        permissions |= role.permissions;
    }

    if permissions.contains(Permissions::ADMINISTRATOR) {
        return Permissions::all();
    }
    permissions
}

/// Applies channel overwrites in host order: `@everyone`, then the member's
/// roles (merged), then the member itself.
pub fn apply_overwrites(
    base: Permissions,
    member: &GuildMember,
    guild: &Guild,
    overwrites: &[PermissionOverwrite],
) -> Permissions {
    if base.contains(Permissions::ADMINISTRATOR) {
        return Permissions::all();
    }

    let mut permissions = base;

    if let Some(everyone) = overwrites
        .iter()
        .find(|ow| ow.kind == OverwriteKind::Role && ow.id == guild.everyone_role_id())
    {
        permissions.remove(everyone.deny);
        permissions.insert(everyone.allow);
    }

    let mut allow = Permissions::empty();
    let mut deny = Permissions::empty();
    for ow in overwrites.iter().filter(|ow| {
        ow.kind == OverwriteKind::Role
            && ow.id != guild.everyone_role_id()
            && member.roles.contains(&ow.id)
    }) {
        allow |= ow.allow;
        deny |= ow.deny;
    }
    permissions.remove(deny);
    permissions.insert(allow);

    if let Some(own) = overwrites
        .iter()
        .find(|ow| ow.kind == OverwriteKind::Member && ow.id == member.user_id)
    {
        permissions.remove(own.deny);
        permissions.insert(own.allow);
    }

    permissions
}

/// Effective permissions of `member` in a channel carrying `overwrites`.
pub fn compute_permissions(
    member: &GuildMember,
    guild: &Guild,
    roles: &RoleTable,
    overwrites: &[PermissionOverwrite],
) -> Permissions {
    let base = base_permissions(member, guild, roles);
    apply_overwrites(base, member, guild, overwrites)
}
