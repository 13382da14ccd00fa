pub mod entity;
pub mod repository;
pub mod role;

pub use entity::{AuthUser, Identity, NewAuthUser, UserProfile};
pub use repository::UserRepository;
pub use role::Role;
