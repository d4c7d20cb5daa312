// Re-export core modules for compatibility
pub use botcore::{
    directory, hash, member_list, permissions, purge, session, snowflake, throttle, token,
};

// Core types are re-exported, but events (with EventBus) remain here for runtime functionality
pub mod types {
    pub use botcore::types::*;
    pub mod events;
}

pub mod client;
pub mod config;
pub mod error;
pub mod member_list_worker;

pub use client::BotClient;
pub use config::Config;
pub use error::ClientError;
