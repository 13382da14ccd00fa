//! Domain layer - Pure business logic with no external dependencies
//!
//! This crate contains:
//! - Entities (City/Zone/Ward/Location, UserProfile, WorkEntry)
//! - Rules (cascading hierarchy selection, role-gated access, entry validation)
//! - Repository and platform interfaces (traits)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Business rules enforced at domain level
//! - Testable in isolation

pub mod access;
pub mod credentials;
pub mod entry;
pub mod error;
pub mod hierarchy;
pub mod media;
pub mod platform;
pub mod reference;
pub mod user;

// Re-export commonly used types
pub use access::{EntryScope, MenuItem, Panel};
pub use entry::{MediaType, WorkEntry, WorkEntryDraft, WorkEntryMedia};
pub use error::DomainError;
pub use hierarchy::{HierarchyOptions, HierarchySelection, LocationHierarchy};
pub use reference::{City, Location, ReferenceKind, Ward, Zone};
pub use user::{Identity, Role, UserProfile};
