//! Backend en memoria con las mismas reglas que el esquema Postgres.
//! Útil para tests y para correr la API sin base de datos.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::{MediaRepository, UserRepository};
use crate::media_item::{rating_in_range, MediaDraft, MediaId, MediaItem};
use crate::user::{NewUser, User, UserId};
use crate::StoreError;

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    media_items: BTreeMap<MediaId, MediaItem>,
    // Secuencias SERIAL: nunca se reutilizan ids, ni siquiera tras un borrado.
    next_user_id: UserId,
    next_media_id: MediaId,
}

/// Implementa `UserRepository` y `MediaRepository` sobre el mismo estado
/// compartido; los clones ven las mismas tablas.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Unavailable("in-memory store poisoned".into()))
    }
}

fn check_rating(rating: Option<i32>) -> Result<(), StoreError> {
    match rating {
        Some(r) if !rating_in_range(r) => Err(StoreError::CheckViolation(format!("media_items_rating_check: rating={r}"))),
        _ => Ok(()),
    }
}

fn apply_draft(item: &mut MediaItem, draft: &MediaDraft) {
    item.title = draft.title.clone();
    item.media_type = draft.media_type.clone();
    item.status = draft.status.clone();
    item.current_progress = draft.current_progress.clone();
    item.rating = draft.rating;
    item.comment = draft.comment.clone();
    item.release_year = draft.release_year;
}

// Orden de Postgres para `ORDER BY added_date DESC, media_id DESC`: en DESC
// los NULL van primero.
fn newest_first(a: &MediaItem, b: &MediaItem) -> Ordering {
    let by_date = match (a.added_date, b.added_date) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x),
    };
    by_date.then_with(|| b.media_id.cmp(&a.media_id))
}

impl UserRepository for InMemoryStore {
    fn create(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let mut t = self.lock()?;
        if t.users.values().any(|u| u.username == new_user.username()) {
            return Err(StoreError::UniqueViolation(format!("users_username_key: {}", new_user.username())));
        }
        t.next_user_id += 1;
        let user = User { user_id: t.next_user_id,
                          username: new_user.username().to_string(),
                          password_hash: new_user.password_hash().to_string(),
                          created_at: Some(Utc::now().naive_utc()) };
        t.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.users.get(&user_id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.users.values().find(|u| u.username == username).cloned())
    }

    fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> Result<(), StoreError> {
        let mut t = self.lock()?;
        let user = t.users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    fn delete(&self, user_id: UserId) -> Result<bool, StoreError> {
        let mut t = self.lock()?;
        if t.users.remove(&user_id).is_none() {
            return Ok(false);
        }
        // ON DELETE CASCADE
        t.media_items.retain(|_, item| item.user_id != user_id);
        Ok(true)
    }
}

impl MediaRepository for InMemoryStore {
    fn list_for_user(&self, user_id: UserId, title_filter: Option<&str>) -> Result<Vec<MediaItem>, StoreError> {
        let needle = title_filter.map(str::to_lowercase);
        let t = self.lock()?;
        let mut items: Vec<MediaItem> = t.media_items
                                         .values()
                                         .filter(|item| item.user_id == user_id)
                                         .filter(|item| match &needle {
                                             Some(n) => item.title.to_lowercase().contains(n.as_str()),
                                             None => true,
                                         })
                                         .cloned()
                                         .collect();
        items.sort_by(newest_first);
        Ok(items)
    }

    fn find_for_user(&self, user_id: UserId, media_id: MediaId) -> Result<Option<MediaItem>, StoreError> {
        Ok(self.lock()?.media_items.get(&media_id).filter(|item| item.user_id == user_id).cloned())
    }

    fn find_by_title(&self, user_id: UserId, title: &str) -> Result<Option<MediaItem>, StoreError> {
        Ok(self.lock()?
               .media_items
               .values()
               .find(|item| item.user_id == user_id && item.title == title)
               .cloned())
    }

    fn create(&self, user_id: UserId, draft: &MediaDraft) -> Result<MediaItem, StoreError> {
        let mut t = self.lock()?;
        if !t.users.contains_key(&user_id) {
            return Err(StoreError::ForeignKeyViolation(format!("media_items_user_id_fkey: user_id={user_id}")));
        }
        check_rating(draft.rating)?;
        t.next_media_id += 1;
        let mut item = MediaItem { media_id: t.next_media_id,
                                   user_id,
                                   title: String::new(),
                                   media_type: String::new(),
                                   status: String::new(),
                                   current_progress: None,
                                   rating: None,
                                   comment: None,
                                   release_year: None,
                                   added_date: Some(Utc::now().naive_utc()) };
        apply_draft(&mut item, draft);
        t.media_items.insert(item.media_id, item.clone());
        Ok(item)
    }

    fn update(&self, user_id: UserId, media_id: MediaId, draft: &MediaDraft) -> Result<bool, StoreError> {
        check_rating(draft.rating)?;
        let mut t = self.lock()?;
        match t.media_items.get_mut(&media_id) {
            Some(item) if item.user_id == user_id => {
                apply_draft(item, draft);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn delete(&self, user_id: UserId, media_id: MediaId) -> Result<bool, StoreError> {
        let mut t = self.lock()?;
        let owned = t.media_items.get(&media_id).is_some_and(|item| item.user_id == user_id);
        if owned {
            t.media_items.remove(&media_id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(media_id: MediaId, day: Option<u32>) -> MediaItem {
        MediaItem { media_id,
                    user_id: 1,
                    title: format!("t{media_id}"),
                    media_type: "book".into(),
                    status: "planned".into(),
                    current_progress: None,
                    rating: None,
                    comment: None,
                    release_year: None,
                    added_date: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 1, d))
                                   .and_then(|d| d.and_hms_opt(0, 0, 0)) }
    }

    #[test]
    fn ordering_matches_postgres_desc_nulls_first() {
        let mut items = vec![item(1, Some(1)), item(2, Some(3)), item(3, None), item(4, Some(3))];
        items.sort_by(newest_first);
        let ids: Vec<MediaId> = items.iter().map(|i| i.media_id).collect();
        assert_eq!(ids, vec![3, 4, 2, 1]);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = InMemoryStore::new();
        let u = UserRepository::create(&store, &NewUser::new("ana", "h").unwrap()).unwrap();
        let first = MediaRepository::create(&store, u.user_id, &MediaDraft::new("a", "book", "planned")).unwrap();
        assert!(MediaRepository::delete(&store, u.user_id, first.media_id).unwrap());
        let second = MediaRepository::create(&store, u.user_id, &MediaDraft::new("b", "book", "planned")).unwrap();
        assert!(second.media_id > first.media_id);
    }
}
