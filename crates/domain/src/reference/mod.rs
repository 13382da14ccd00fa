pub mod entity;
pub mod name;
pub mod repository;

pub use entity::{City, Location, ReferenceKind, Ward, Zone};
pub use name::ReferenceName;
pub use repository::ReferenceRepository;
