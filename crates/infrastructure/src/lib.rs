//! Infrastructure layer - External integrations

pub mod config;
pub mod database;
pub mod platform;
pub mod storage;

pub use config::AppConfig;
pub use database::{SeaOrmReferenceRepository, SeaOrmUserRepository, SeaOrmWorkEntryRepository};
pub use platform::PlatformAuthClient;
pub use storage::R2Presigner;
