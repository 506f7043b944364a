//! Casos de uso sobre la lista personal de un usuario.

use crate::media_item::{MediaDraft, MediaId, MediaItem};
use crate::repo::MediaRepository;
use crate::user::UserId;
use crate::DomainError;

/// Una consulta vacía (o sólo espacios) lista todo.
pub fn search<R>(media: &R, user_id: UserId, query: Option<&str>) -> Result<Vec<MediaItem>, DomainError>
    where R: MediaRepository + ?Sized
{
    let filter = query.filter(|q| !q.trim().is_empty());
    Ok(media.list_for_user(user_id, filter)?)
}

pub fn add<R>(media: &R, user_id: UserId, draft: &MediaDraft) -> Result<MediaItem, DomainError>
    where R: MediaRepository + ?Sized
{
    draft.validate()?;
    // Chequeo previo no atómico: dos altas concurrentes del mismo título
    // pueden pasar ambas.
    if media.find_by_title(user_id, &draft.title)?.is_some() {
        return Err(DomainError::DuplicateTitle(draft.title.clone()));
    }
    let item = media.create(user_id, draft)?;
    log::debug!("media added user_id={user_id} media_id={}", item.media_id);
    Ok(item)
}

pub fn edit<R>(media: &R, user_id: UserId, media_id: MediaId, draft: &MediaDraft) -> Result<(), DomainError>
    where R: MediaRepository + ?Sized
{
    draft.validate()?;
    if !media.update(user_id, media_id, draft)? {
        return Err(DomainError::NotFound(format!("media {media_id}")));
    }
    Ok(())
}

pub fn remove<R>(media: &R, user_id: UserId, media_id: MediaId) -> Result<(), DomainError>
    where R: MediaRepository + ?Sized
{
    if !media.delete(user_id, media_id)? {
        return Err(DomainError::NotFound(format!("media {media_id}")));
    }
    Ok(())
}
