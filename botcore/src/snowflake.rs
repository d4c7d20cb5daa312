//! Generation and decoding of 64-bit snowflake ids.
//!
//! Layout, most significant bit first: 42 bits of milliseconds since
//! [`EPOCH`], 5 bits worker id, 5 bits process id, 12 bits increment.

use chrono::{DateTime, Utc};

use crate::error::SnowflakeError;
use crate::types::Snowflake;

/// First millisecond of 2015, in Unix time.
pub const EPOCH: i64 = 1_420_070_400_000;

const WORKER_ID: u64 = 1;
const PROCESS_ID: u64 = 0;
const INCREMENT_LIMIT: u64 = 4095;
const TIMESTAMP_BITS: u32 = 42;

/// Produces ids locally, e.g. for nonces of messages not yet acknowledged.
#[derive(Debug, Default)]
pub struct SnowflakeGenerator {
    increment: u64,
}

impl SnowflakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self, timestamp_ms: i64) -> Result<Snowflake, SnowflakeError> {
        let elapsed = timestamp_ms
            .checked_sub(EPOCH)
            .filter(|e| *e >= 0)
            .ok_or(SnowflakeError::BeforeEpoch(timestamp_ms))?;
        let elapsed = u64::try_from(elapsed)
            .ok()
            .filter(|e| *e < 1 << TIMESTAMP_BITS)
            .ok_or(SnowflakeError::OutOfRange(timestamp_ms))?;

        if self.increment >= INCREMENT_LIMIT {
            self.increment = 0;
        }
        let increment = self.increment;
        self.increment += 1;

        Ok(Snowflake(
            (elapsed << 22) | (WORKER_ID << 17) | (PROCESS_ID << 12) | increment,
        ))
    }

    pub fn generate_now(&mut self) -> Result<Snowflake, SnowflakeError> {
        self.generate(Utc::now().timestamp_millis())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeconstructedSnowflake {
    /// Unix time in milliseconds.
    pub timestamp: i64,
    pub worker_id: u8,
    pub process_id: u8,
    pub increment: u16,
    /// The id as 64 binary digits, zero padded.
    pub binary: String,
}

impl DeconstructedSnowflake {
    pub fn date(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

pub fn timestamp_from(id: Snowflake) -> i64 {
    (id.get() >> 22) as i64 + EPOCH
}

pub fn deconstruct(id: Snowflake) -> DeconstructedSnowflake {
    let raw = id.get();
    DeconstructedSnowflake {
        timestamp: timestamp_from(id),
        worker_id: ((raw >> 17) & 0b1_1111) as u8,
        process_id: ((raw >> 12) & 0b1_1111) as u8,
        increment: (raw & 0xfff) as u16,
        binary: format!("{raw:064b}"),
    }
}
