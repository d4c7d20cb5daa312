use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnowflakeError {
    #[error("timestamp {0} is before the snowflake epoch")]
    BeforeEpoch(i64),

    #[error("timestamp {0} does not fit in a snowflake")]
    OutOfRange(i64),

    #[error("invalid snowflake: {0}")]
    Parse(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid shard id {id}: must be between 0 and {max}", max = .total.saturating_sub(1))]
    InvalidShard { id: i64, total: u32 },

    #[error("cannot switch guild in single shard")]
    SingleShard,

    #[error("invalid guild id: {0}")]
    InvalidGuildId(String),

    #[error("shard count must be at least 1")]
    NoShards,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidFormat,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurgeError {
    #[error("Invalid messages (2<={0}<=100)")]
    InvalidAmount(i64),

    #[error(transparent)]
    Snowflake(#[from] SnowflakeError),
}
