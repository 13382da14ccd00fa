pub mod draft;
pub mod entity;
pub mod history;
pub mod repository;

pub use draft::{ValidatedEntry, WorkEntryDraft, hours};
pub use entity::{MediaType, WorkEntry, WorkEntryMedia};
pub use history::{HistoryFilter, HistorySummary};
pub use repository::WorkEntryRepository;
