pub mod directory;
pub mod error;
pub mod hash;
pub mod member_list;
pub mod permissions;
pub mod purge;
pub mod session;
pub mod snowflake;
pub mod throttle;
pub mod token;
pub mod types;

pub use error::{PurgeError, SessionError, SnowflakeError, TokenError};
