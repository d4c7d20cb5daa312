use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

const DEFAULT_THROTTLE_DELAY_SECS: f64 = 2.0;
const DEFAULT_THROTTLE_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Build the member-list sidebar from guild state.
    pub show_member_list: bool,
    /// Minimum time between two member-list updates, in seconds.
    pub member_list_throttle_delay: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_member_list: true,
            member_list_throttle_delay: DEFAULT_THROTTLE_DELAY_SECS,
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// The configured delay; values that are not a positive, representable
    /// duration fall back to the default.
    pub fn throttle_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.member_list_throttle_delay)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_THROTTLE_DELAY)
    }
}
