use serde::{Serialize, Serializer};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use crate::types::guild::role_position;
use crate::types::{Member, RoleId, RoleTable};

/// Heading a member is listed under: a hoisted role, or one of the two
/// synthetic buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupId {
    Role(RoleId),
    Online,
    Offline,
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Role(id) => write!(f, "{id}"),
            GroupId::Online => f.write_str("online"),
            GroupId::Offline => f.write_str("offline"),
        }
    }
}

impl Serialize for GroupId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: GroupId,
    pub count: usize,
}

/// One row of the sidebar: a group header or a member under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListEntry {
    Group(Group),
    Member(Member),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupLayout {
    pub ops: Vec<ListEntry>,
    pub groups: Vec<Group>,
}

fn group_position(roles: &RoleTable, id: GroupId) -> i64 {
    match id {
        GroupId::Role(role) => role_position(roles, Some(role)),
        GroupId::Online | GroupId::Offline => 0,
    }
}

/// Lays out online members under their hoisted roles and appends the
/// offline bucket.
///
/// Online groups are ordered by descending role position; groups with the
/// same position keep the order in which they were first seen. Members in an
/// online group are sorted by nickname ignoring case, members without a
/// nickname first. Offline members are emitted in the order given.
pub fn build_groups(online: Vec<Member>, offline: Vec<Member>, roles: &RoleTable) -> GroupLayout {
    let mut buckets: Vec<(GroupId, Vec<Member>)> = Vec::new();
    let mut index: HashMap<GroupId, usize> = HashMap::new();

    for member in online {
        let id = member.hoist_role_id().map_or(GroupId::Online, GroupId::Role);
        let slot = *index.entry(id).or_insert_with(|| {
            buckets.push((id, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(member);
    }

    buckets.sort_by_key(|(id, _)| Reverse(group_position(roles, *id)));

    let mut layout = GroupLayout::default();
    for (id, mut members) in buckets {
        members.sort_by_cached_key(|m| m.sort_name().to_lowercase());
        push_group(&mut layout, id, members);
    }

    if !offline.is_empty() {
        push_group(&mut layout, GroupId::Offline, offline);
    }

    layout
}

fn push_group(layout: &mut GroupLayout, id: GroupId, members: Vec<Member>) {
    let group = Group {
        id,
        count: members.len(),
    };
    layout.ops.push(ListEntry::Group(group.clone()));
    layout.ops.extend(members.into_iter().map(ListEntry::Member));
    layout.groups.push(group);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GuildMember, MemberStatus, Permissions, Role, Snowflake};

    fn member(id: u64, hoist: Option<u64>, nick: Option<&str>, status: MemberStatus) -> Member {
        Member::new(
            GuildMember {
                user_id: Snowflake(id),
                guild_id: Snowflake(1),
                nick: nick.map(str::to_string),
                roles: hoist.into_iter().map(Snowflake).collect(),
                hoist_role_id: hoist.map(Snowflake),
                joined_at: None,
            },
            status,
            0,
        )
    }

    fn online(id: u64, hoist: Option<u64>, nick: Option<&str>) -> Member {
        member(id, hoist, nick, MemberStatus::Online)
    }

    fn offline(id: u64, nick: Option<&str>) -> Member {
        member(id, None, nick, MemberStatus::Offline)
    }

    fn role_table(positions: &[(u64, i64)]) -> RoleTable {
        positions
            .iter()
            .map(|&(id, position)| {
                (
                    Snowflake(id),
                    Role {
                        id: Snowflake(id),
                        name: String::new(),
                        position,
                        permissions: Permissions::empty(),
                        hoist: true,
                    },
                )
            })
            .collect()
    }

    fn member_ids(entries: &[ListEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| match e {
                ListEntry::Group(g) => format!("[{}:{}]", g.id, g.count),
                ListEntry::Member(m) => m.id().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_empty_inputs() {
        let layout = build_groups(Vec::new(), Vec::new(), &RoleTable::new());
        assert!(layout.ops.is_empty());
        assert!(layout.groups.is_empty());
    }

    #[test]
    fn test_online_bucket_sorted_case_insensitively() {
        let a = online(1, None, Some("Zed"));
        let b = online(2, None, Some("amy"));
        let layout = build_groups(vec![a.clone(), b.clone()], Vec::new(), &RoleTable::new());

        assert_eq!(
            layout.ops,
            vec![
                ListEntry::Group(Group {
                    id: GroupId::Online,
                    count: 2
                }),
                ListEntry::Member(b),
                ListEntry::Member(a),
            ]
        );
        assert_eq!(
            layout.groups,
            vec![Group {
                id: GroupId::Online,
                count: 2
            }]
        );
    }

    #[test]
    fn test_missing_nick_sorts_first() {
        let layout = build_groups(
            vec![
                online(1, None, Some("bob")),
                online(2, None, None),
                online(3, None, Some("")),
                online(4, None, Some("Al")),
            ],
            Vec::new(),
            &RoleTable::new(),
        );
        assert_eq!(member_ids(&layout.ops), ["[online:4]", "2", "3", "4", "1"]);
    }

    #[test]
    fn test_groups_ordered_by_role_position() {
        let roles = role_table(&[(10, 1), (20, 5), (30, 3)]);
        let layout = build_groups(
            vec![
                online(1, Some(10), Some("a")),
                online(2, None, Some("b")),
                online(3, Some(20), Some("c")),
                online(4, Some(30), Some("d")),
                online(5, Some(20), Some("a")),
            ],
            Vec::new(),
            &roles,
        );
        assert_eq!(
            member_ids(&layout.ops),
            ["[20:2]", "5", "3", "[30:1]", "4", "[10:1]", "1", "[online:1]", "2"]
        );
    }

    #[test]
    fn test_unknown_role_keeps_discovery_order_at_zero() {
        // Role 99 is absent from the table, so it ties with "online" at 0.
        let roles = role_table(&[(10, 2)]);
        let layout = build_groups(
            vec![
                online(1, None, Some("a")),
                online(2, Some(99), Some("b")),
                online(3, Some(10), Some("c")),
            ],
            Vec::new(),
            &roles,
        );
        assert_eq!(
            member_ids(&layout.ops),
            ["[10:1]", "3", "[online:1]", "1", "[99:1]", "2"]
        );
    }

    #[test]
    fn test_offline_bucket_keeps_caller_order() {
        let layout = build_groups(
            vec![online(1, None, Some("x"))],
            vec![offline(3, Some("zed")), offline(2, Some("amy"))],
            &RoleTable::new(),
        );
        assert_eq!(
            member_ids(&layout.ops),
            ["[online:1]", "1", "[offline:2]", "3", "2"]
        );
        assert_eq!(layout.groups.last().map(|g| g.id), Some(GroupId::Offline));
    }

    #[test]
    fn test_only_offline_members() {
        let layout = build_groups(Vec::new(), vec![offline(1, None)], &RoleTable::new());
        assert_eq!(member_ids(&layout.ops), ["[offline:1]", "1"]);
    }

    #[test]
    fn test_counts_match_following_members() {
        let roles = role_table(&[(10, 3), (20, 1)]);
        let layout = build_groups(
            vec![
                online(1, Some(10), None),
                online(2, Some(20), None),
                online(3, None, None),
                online(4, Some(10), None),
            ],
            vec![offline(5, None), offline(6, None)],
            &roles,
        );

        let mut seen = std::collections::HashSet::new();
        let mut current: Option<(usize, usize)> = None;
        for entry in &layout.ops {
            match entry {
                ListEntry::Group(g) => {
                    if let Some((expected, actual)) = current {
                        assert_eq!(expected, actual);
                    }
                    current = Some((g.count, 0));
                }
                ListEntry::Member(m) => {
                    assert!(seen.insert(m.id()), "member listed twice");
                    current.as_mut().expect("member before any group").1 += 1;
                }
            }
        }
        if let Some((expected, actual)) = current {
            assert_eq!(expected, actual);
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_idempotent() {
        let roles = role_table(&[(10, 3)]);
        let on = vec![online(1, Some(10), Some("b")), online(2, None, Some("a"))];
        let off = vec![offline(3, None)];
        let first = build_groups(on.clone(), off.clone(), &roles);
        let second = build_groups(on, off, &roles);
        assert_eq!(first, second);
    }

    #[test]
    fn test_entries_serialize_with_host_keys() {
        let layout = build_groups(vec![online(1, Some(10), None)], Vec::new(), &RoleTable::new());
        let value = serde_json::to_value(&layout.ops[0]).expect("serialize");
        assert_eq!(value, serde_json::json!({"group": {"id": "10", "count": 1}}));
        let value = serde_json::to_value(&layout.ops[1]).expect("serialize");
        assert_eq!(value["member"]["user"]["id"], "1");
    }
}
