// trek-domain library entry point
pub mod accounts;
pub mod error;
pub mod library;
pub mod media_item;
pub mod password;
pub mod repo;
pub mod user;
pub use error::{DomainError, StoreError};
pub use media_item::{MediaDraft, MediaId, MediaItem};
pub use repo::{InMemoryStore, MediaRepository, UserRepository};
pub use user::{NewUser, User, UserId};
