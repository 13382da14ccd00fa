//! Application layer - Use cases and business workflows

pub mod accounts;
pub mod auth;
pub mod entries;
pub mod reference;
pub mod uploads;

pub use accounts::AccountService;
pub use auth::Authenticator;
pub use entries::EntryService;
pub use reference::ReferenceService;
pub use uploads::UploadService;
