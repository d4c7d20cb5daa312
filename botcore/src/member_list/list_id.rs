use crate::hash::murmur3_str;
use crate::types::{PermissionOverwrite, Permissions};

/// List id shared by every channel that all members of the guild can see.
pub const EVERYONE_LIST_ID: &str = "everyone";

/// Identifies the audience of a channel's member list.
///
/// Channels whose view-channel overwrites are equivalent share a list id, so
/// the host can reuse one sidebar for all of them. Token order does not
/// matter: the tokens are sorted before hashing.
pub fn compute_list_id(overwrites: &[PermissionOverwrite], everyone_can_view: bool) -> String {
    let mut tokens = Vec::with_capacity(overwrites.len());
    let mut has_deny = false;

    for ow in overwrites {
        if ow.allow.contains(Permissions::VIEW_CHANNEL) {
            tokens.push(format!("allow:{}", ow.id));
        } else if ow.deny.contains(Permissions::VIEW_CHANNEL) {
            tokens.push(format!("deny:{}", ow.id));
            has_deny = true;
        }
    }

    if !has_deny && everyone_can_view {
        return EVERYONE_LIST_ID.to_string();
    }

    tokens.sort();
    murmur3_str(&tokens.join(",")).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OverwriteKind, Snowflake};

    fn ow(id: u64, allow: Permissions, deny: Permissions) -> PermissionOverwrite {
        PermissionOverwrite {
            id: Snowflake(id),
            kind: OverwriteKind::Role,
            allow,
            deny,
        }
    }

    #[test]
    fn test_everyone_when_no_deny_and_default_view() {
        assert_eq!(compute_list_id(&[], true), EVERYONE_LIST_ID);
        let allows = [
            ow(1, Permissions::VIEW_CHANNEL, Permissions::empty()),
            ow(2, Permissions::SEND_MESSAGES, Permissions::empty()),
            ow(3, Permissions::empty(), Permissions::SEND_MESSAGES),
        ];
        assert_eq!(compute_list_id(&allows, true), EVERYONE_LIST_ID);
    }

    #[test]
    fn test_deny_produces_hash() {
        let overwrites = [
            ow(2, Permissions::empty(), Permissions::VIEW_CHANNEL),
            ow(1, Permissions::VIEW_CHANNEL, Permissions::empty()),
        ];
        // murmur3("allow:1,deny:2")
        assert_eq!(compute_list_id(&overwrites, true), "172257501");
    }

    #[test]
    fn test_hidden_from_everyone_produces_hash() {
        assert_eq!(compute_list_id(&[], false), "0");
        let overwrites = [ow(111, Permissions::VIEW_CHANNEL, Permissions::empty())];
        assert_eq!(compute_list_id(&overwrites, false), "717720020");
    }

    #[test]
    fn test_allow_wins_when_both_bits_set() {
        let both = [ow(111, Permissions::VIEW_CHANNEL, Permissions::VIEW_CHANNEL)];
        assert_eq!(compute_list_id(&both, true), EVERYONE_LIST_ID);
    }

    #[test]
    fn test_order_independent() {
        let a = ow(10, Permissions::VIEW_CHANNEL, Permissions::empty());
        let b = ow(20, Permissions::empty(), Permissions::VIEW_CHANNEL);
        let c = ow(30, Permissions::empty(), Permissions::VIEW_CHANNEL);
        let forward = compute_list_id(&[a.clone(), b.clone(), c.clone()], true);
        let shuffled = compute_list_id(&[c.clone(), a.clone(), b.clone()], true);
        let reversed = compute_list_id(&[c, b, a], false);
        assert_eq!(forward, shuffled);
        assert_eq!(forward, reversed);
    }
}
