//! Per-login session state: shard assignment and the guild/channel the user
//! is looking at.

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SessionError;
use crate::types::{ChannelId, GuildId, Snowflake};

static GUILD_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{17,19}$").expect("guild id pattern is valid"));

/// Shard that receives events for `guild_id` when the bot runs
/// `total_shards` gateway connections.
pub fn shard_for_guild(guild_id: GuildId, total_shards: u32) -> u32 {
    let total = u64::from(total_shards.max(1));
    ((guild_id.get() >> 22) % total) as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    total_shards: u32,
    current_shard: u32,
    pub current_guild: Option<GuildId>,
    pub current_channel: Option<ChannelId>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            total_shards: 1,
            current_shard: 0,
            current_guild: None,
            current_channel: None,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_shards(&self) -> u32 {
        self.total_shards
    }

    pub fn current_shard(&self) -> u32 {
        self.current_shard
    }

    /// `[shard_id, shard_count]` as sent when identifying on the gateway.
    pub fn shard(&self) -> [u32; 2] {
        [self.current_shard, self.total_shards]
    }

    /// Records the shard count reported for the bot, falling back to shard
    /// 0 when the current shard no longer exists.
    pub fn apply_bot_info(&mut self, total_shards: u32) -> Result<(), SessionError> {
        if total_shards == 0 {
            return Err(SessionError::NoShards);
        }
        self.total_shards = total_shards;
        if self.current_shard >= total_shards {
            self.current_shard = 0;
        }
        info!(
            target: "BotClient/Session",
            "Shard ID: {} (All: {})", self.current_shard, self.total_shards
        );
        Ok(())
    }

    pub fn reset_shard(&mut self) {
        self.current_shard = 0;
    }

    pub fn switch_shard(&mut self, id: i64) -> Result<u32, SessionError> {
        let total = self.total_shards;
        let shard = u32::try_from(id)
            .ok()
            .filter(|s| *s < total)
            .ok_or(SessionError::InvalidShard { id, total })?;
        self.current_shard = shard;
        Ok(shard)
    }

    /// Moves to the shard that owns the guild with the given raw id.
    pub fn switch_guild(&mut self, raw_guild_id: &str) -> Result<u32, SessionError> {
        if self.total_shards == 1 {
            return Err(SessionError::SingleShard);
        }
        if !GUILD_ID_RE.is_match(raw_guild_id) {
            return Err(SessionError::InvalidGuildId(raw_guild_id.to_string()));
        }
        let guild_id: Snowflake = raw_guild_id
            .parse()
            .map_err(|_| SessionError::InvalidGuildId(raw_guild_id.to_string()))?;
        self.current_shard = shard_for_guild(guild_id, self.total_shards);
        Ok(self.current_shard)
    }

    pub fn select_channel(&mut self, guild_id: Option<GuildId>, channel_id: Option<ChannelId>) {
        self.current_guild = guild_id;
        self.current_channel = channel_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lands on shard 2 of 4.
    const GUILD_ID: u64 = 81384788765712384;

    #[test]
    fn test_shard_for_guild() {
        assert_eq!(shard_for_guild(Snowflake(GUILD_ID), 4), 2);
        assert_eq!(shard_for_guild(Snowflake(GUILD_ID), 1), 0);
        assert_eq!(shard_for_guild(Snowflake(GUILD_ID), 0), 0);
    }

    #[test]
    fn test_bot_info_resets_out_of_range_shard() {
        let mut session = SessionState::new();
        session.apply_bot_info(4).expect("shards");
        session.switch_shard(3).expect("valid shard");
        session.apply_bot_info(2).expect("shards");
        assert_eq!(session.shard(), [0, 2]);
        assert_eq!(session.apply_bot_info(0), Err(SessionError::NoShards));
    }

    #[test]
    fn test_switch_shard_bounds() {
        let mut session = SessionState::new();
        session.apply_bot_info(3).expect("shards");
        assert_eq!(session.switch_shard(2), Ok(2));
        assert_eq!(
            session.switch_shard(3),
            Err(SessionError::InvalidShard { id: 3, total: 3 })
        );
        assert_eq!(
            session.switch_shard(-1),
            Err(SessionError::InvalidShard { id: -1, total: 3 })
        );
        assert_eq!(session.current_shard(), 2);
    }

    #[test]
    fn test_invalid_shard_message() {
        let err = SessionError::InvalidShard { id: 5, total: 3 };
        assert_eq!(err.to_string(), "invalid shard id 5: must be between 0 and 2");
    }

    #[test]
    fn test_switch_guild() {
        let mut session = SessionState::new();
        assert_eq!(
            session.switch_guild("81384788765712384"),
            Err(SessionError::SingleShard)
        );

        session.apply_bot_info(4).expect("shards");
        assert_eq!(
            session.switch_guild("1234"),
            Err(SessionError::InvalidGuildId("1234".into()))
        );
        assert_eq!(
            session.switch_guild("8138478876571238a"),
            Err(SessionError::InvalidGuildId("8138478876571238a".into()))
        );

        let shard = session
            .switch_guild("81384788765712384")
            .expect("valid guild");
        assert_eq!(shard, 2);
        assert_eq!(session.current_shard(), shard);
    }

    #[test]
    fn test_select_channel() {
        let mut session = SessionState::new();
        session.select_channel(Some(Snowflake(1)), Some(Snowflake(2)));
        assert_eq!(session.current_guild, Some(Snowflake(1)));
        session.select_channel(None, Some(Snowflake(3)));
        assert_eq!(session.current_guild, None);
        assert_eq!(session.current_channel, Some(Snowflake(3)));
    }
}
