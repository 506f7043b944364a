//! Contratos de repositorio para `users` y `media_items`.
//!
//! Las implementaciones deben reproducir las reglas del motor relacional:
//! unicidad de username, integridad referencial con borrado en cascada,
//! rango de rating y timestamps de creación asignados al insertar. Las
//! violaciones se reportan como `StoreError`.
//!
//! Toda operación sobre `media_items` recibe el `user_id` del dueño: un item
//! de otro usuario es indistinguible de uno inexistente.

mod memory;

pub use memory::InMemoryStore;

use crate::media_item::{MediaDraft, MediaId, MediaItem};
use crate::user::{NewUser, User, UserId};
use crate::StoreError;

pub trait UserRepository: Send + Sync {
    fn create(&self, new_user: &NewUser) -> Result<User, StoreError>;
    fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, StoreError>;
    fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    /// Única mutación permitida sobre un usuario. `StoreError::NotFound` si no existe.
    fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> Result<(), StoreError>;
    /// Borra el usuario y, en cascada, sus items. Devuelve si existía.
    fn delete(&self, user_id: UserId) -> Result<bool, StoreError>;
}

pub trait MediaRepository: Send + Sync {
    /// Items del usuario, más recientes primero (`added_date` DESC con NULLs
    /// primero, desempate por `media_id` DESC). `title_filter` es una
    /// subcadena literal, sin distinguir mayúsculas.
    fn list_for_user(&self, user_id: UserId, title_filter: Option<&str>) -> Result<Vec<MediaItem>, StoreError>;
    fn find_for_user(&self, user_id: UserId, media_id: MediaId) -> Result<Option<MediaItem>, StoreError>;
    /// Coincidencia exacta de título dentro de la lista del usuario.
    fn find_by_title(&self, user_id: UserId, title: &str) -> Result<Option<MediaItem>, StoreError>;
    fn create(&self, user_id: UserId, draft: &MediaDraft) -> Result<MediaItem, StoreError>;
    /// Reemplaza todos los campos editables. Devuelve `false` si no hubo fila.
    fn update(&self, user_id: UserId, media_id: MediaId, draft: &MediaDraft) -> Result<bool, StoreError>;
    fn delete(&self, user_id: UserId, media_id: MediaId) -> Result<bool, StoreError>;
}
