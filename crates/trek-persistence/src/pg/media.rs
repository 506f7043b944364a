use diesel::prelude::*;
use log::{debug, error};
use trek_domain::{MediaDraft, MediaId, MediaItem, MediaRepository, StoreError, UserId};

use super::{with_checkout_retry, with_retry, ConnectionProvider};
use crate::error::PersistenceError;
use crate::models::{MediaChangeset, MediaItemRow, NewMediaItemRow};
use crate::schema::media_items;

/// Implementación Postgres de `MediaRepository`.
///
/// Todas las consultas llevan `user_id = $dueño` en el WHERE.
pub struct PgMediaRepository<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgMediaRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

/// Patrón ILIKE de subcadena con `\`, `%` y `_` escapados (escape por
/// defecto de Postgres).
pub(crate) fn contains_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for c in filter.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl<P: ConnectionProvider> MediaRepository for PgMediaRepository<P> {
    fn list_for_user(&self, user_id: UserId, title_filter: Option<&str>) -> Result<Vec<MediaItem>, StoreError> {
        debug!("media.list:start user_id={user_id} filter={title_filter:?}");
        let pattern = title_filter.map(contains_pattern);
        let rows: Vec<MediaItemRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            let mut query = media_items::table.filter(media_items::user_id.eq(user_id))
                                              .select(MediaItemRow::as_select())
                                              .order((media_items::added_date.desc(), media_items::media_id.desc()))
                                              .into_boxed();
            if let Some(p) = &pattern {
                query = query.filter(media_items::title.ilike(p.clone()));
            }
            query.load(&mut conn).map_err(PersistenceError::from)
        }).inspect_err(|e| error!("media.list:load error user_id={user_id} err={e:?}"))?;
        debug!("media.list:done user_id={user_id} count={}", rows.len());
        Ok(rows.into_iter().map(MediaItem::from).collect())
    }

    fn find_for_user(&self, user_id: UserId, media_id: MediaId) -> Result<Option<MediaItem>, StoreError> {
        let row: Option<MediaItemRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            media_items::table.filter(media_items::media_id.eq(media_id))
                              .filter(media_items::user_id.eq(user_id))
                              .select(MediaItemRow::as_select())
                              .first(&mut conn)
                              .optional()
                              .map_err(PersistenceError::from)
        })?;
        Ok(row.map(MediaItem::from))
    }

    fn find_by_title(&self, user_id: UserId, title: &str) -> Result<Option<MediaItem>, StoreError> {
        let row: Option<MediaItemRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            media_items::table.filter(media_items::user_id.eq(user_id))
                              .filter(media_items::title.eq(title))
                              .select(MediaItemRow::as_select())
                              .first(&mut conn)
                              .optional()
                              .map_err(PersistenceError::from)
        })?;
        Ok(row.map(MediaItem::from))
    }

    fn create(&self, user_id: UserId, draft: &MediaDraft) -> Result<MediaItem, StoreError> {
        debug!("media.create:start user_id={user_id} title={}", draft.title);
        let row: MediaItemRow = with_checkout_retry(|| self.provider.connection(), |conn| {
            diesel::insert_into(media_items::table)
                .values(NewMediaItemRow::from_draft(user_id, draft))
                .returning(MediaItemRow::as_returning())
                .get_result(conn)
                .map_err(PersistenceError::from)
        })?;
        debug!("media.create:done user_id={user_id} media_id={}", row.media_id);
        Ok(row.into())
    }

    fn update(&self, user_id: UserId, media_id: MediaId, draft: &MediaDraft) -> Result<bool, StoreError> {
        let updated = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::update(media_items::table.filter(media_items::media_id.eq(media_id))
                                             .filter(media_items::user_id.eq(user_id)))
                .set(MediaChangeset::from(draft))
                .execute(&mut conn)
                .map_err(PersistenceError::from)
        })?;
        debug!("media.update user_id={user_id} media_id={media_id} updated={updated}");
        Ok(updated > 0)
    }

    fn delete(&self, user_id: UserId, media_id: MediaId) -> Result<bool, StoreError> {
        let deleted = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::delete(media_items::table.filter(media_items::media_id.eq(media_id))
                                             .filter(media_items::user_id.eq(user_id)))
                .execute(&mut conn)
                .map_err(PersistenceError::from)
        })?;
        debug!("media.delete user_id={user_id} media_id={media_id} deleted={deleted}");
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(contains_pattern("dune"), "%dune%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }
}
