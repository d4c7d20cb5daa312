//! Message selection for bulk deletion.
//!
//! Bulk delete only accepts messages younger than two weeks, so the oldest
//! acceptable id is generated from `now - 14 days` and anything at or below
//! it is left out.

use crate::error::PurgeError;
use crate::snowflake::SnowflakeGenerator;
use crate::types::{MessageId, Snowflake};

pub const MIN_AMOUNT: i64 = 2;
pub const MAX_AMOUNT: i64 = 100;

/// Age limit of bulk deletion, in milliseconds.
pub const BULK_DELETE_MAX_AGE_MS: i64 = 1_209_600_000;

/// Checks a requested purge size, returning it as a fetch limit.
pub fn validate_amount(amount: i64) -> Result<u8, PurgeError> {
    if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
        return Err(PurgeError::InvalidAmount(amount));
    }
    u8::try_from(amount).map_err(|_| PurgeError::InvalidAmount(amount))
}

/// Id of a message sent exactly at the bulk delete age limit.
pub fn cutoff_id(generator: &mut SnowflakeGenerator, now_ms: i64) -> Result<Snowflake, PurgeError> {
    Ok(generator.generate(now_ms - BULK_DELETE_MAX_AGE_MS)?)
}

/// Keeps the ids strictly newer than the cutoff, preserving their order.
pub fn bulk_deletable(
    generator: &mut SnowflakeGenerator,
    ids: impl IntoIterator<Item = MessageId>,
    now_ms: i64,
) -> Result<Vec<MessageId>, PurgeError> {
    let cutoff = cutoff_id(generator, now_ms)?;
    Ok(ids.into_iter().filter(|id| *id > cutoff).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnowflakeError;
    use crate::snowflake::{EPOCH, timestamp_from};

    const NOW: i64 = EPOCH + BULK_DELETE_MAX_AGE_MS + 1000;

    fn message_at(ms_after_epoch: u64) -> MessageId {
        Snowflake(ms_after_epoch << 22)
    }

    #[test]
    fn test_amount_bounds() {
        assert_eq!(validate_amount(1), Err(PurgeError::InvalidAmount(1)));
        assert_eq!(validate_amount(2), Ok(2));
        assert_eq!(validate_amount(100), Ok(100));
        assert_eq!(validate_amount(101), Err(PurgeError::InvalidAmount(101)));
        assert_eq!(validate_amount(-5), Err(PurgeError::InvalidAmount(-5)));
        assert_eq!(
            PurgeError::InvalidAmount(101).to_string(),
            "Invalid messages (2<=101<=100)"
        );
    }

    #[test]
    fn test_cutoff_is_two_weeks_back() {
        let mut generator = SnowflakeGenerator::new();
        let cutoff = cutoff_id(&mut generator, NOW).expect("cutoff");
        assert_eq!(timestamp_from(cutoff), EPOCH + 1000);
        assert_eq!(cutoff.get(), (1000 << 22) | (1 << 17));
    }

    #[test]
    fn test_keeps_only_messages_newer_than_cutoff() {
        let mut generator = SnowflakeGenerator::new();
        let cutoff = (1000 << 22) | (1 << 17);
        let ids = [
            message_at(2000),
            message_at(999),
            Snowflake(cutoff),
            Snowflake(cutoff + 1),
            message_at(1000),
            message_at(1001),
        ];
        let kept = bulk_deletable(&mut generator, ids, NOW).expect("selection");
        assert_eq!(
            kept,
            [message_at(2000), Snowflake(cutoff + 1), message_at(1001)]
        );
    }

    #[test]
    fn test_cutoff_before_epoch_is_an_error() {
        let mut generator = SnowflakeGenerator::new();
        let now = EPOCH + 10;
        assert_eq!(
            bulk_deletable(&mut generator, [message_at(1)], now),
            Err(PurgeError::Snowflake(SnowflakeError::BeforeEpoch(
                now - BULK_DELETE_MAX_AGE_MS
            )))
        );
    }
}
