pub mod guild;
pub mod id;
pub mod member;
pub mod permissions;

pub use guild::{Channel, ChannelKind, Guild, OverwriteKind, PermissionOverwrite, Role, RoleTable};
pub use id::{ChannelId, GuildId, MessageId, RoleId, Snowflake, UserId};
pub use member::{GuildMember, Member, MemberStatus, PresenceStatus, UserRef};
pub use permissions::Permissions;
