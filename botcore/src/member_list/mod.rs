//! Reconstruction of the guild member-list sidebar.
//!
//! A projection pass reads the full membership of the current guild, keeps
//! the members that can see the current channel, buckets them by hoisted
//! role and lays them out the way the host's sidebar expects from a native
//! list subscription.

pub mod classify;
pub mod groups;
pub mod list_id;
pub mod projection;

pub use classify::{ChannelContext, Classified, OFFLINE_MEMBER_LIMIT, classify};
pub use groups::{Group, GroupId, GroupLayout, ListEntry, build_groups};
pub use list_id::{EVERYONE_LIST_ID, compute_list_id};
pub use projection::{
    MEMBER_LIST_UPDATE, MemberListProjector, MemberListUpdate, ProjectionResult, SyncOp,
};
