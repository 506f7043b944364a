//! Filas Diesel de `users` y `media_items` y su conversión a tipos de dominio.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use trek_domain::{MediaDraft, MediaItem, User};

use crate::schema::{media_items, users};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub user_id: i32,
    pub username: String,
    pub password_hash: String,
    pub created_at: Option<NaiveDateTime>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User { user_id: row.user_id,
               username: row.username,
               password_hash: row.password_hash,
               created_at: row.created_at }
    }
}

/// Inserción en `users`; `user_id` y `created_at` quedan a cargo del motor
/// (SERIAL y DEFAULT CURRENT_TIMESTAMP).
#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = media_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MediaItemRow {
    pub media_id: i32,
    pub user_id: i32,
    pub title: String,
    pub media_type: String,
    pub status: String,
    pub current_progress: Option<String>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub release_year: Option<i32>,
    pub added_date: Option<NaiveDateTime>,
}

impl From<MediaItemRow> for MediaItem {
    fn from(row: MediaItemRow) -> Self {
        MediaItem { media_id: row.media_id,
                    user_id: row.user_id,
                    title: row.title,
                    media_type: row.media_type,
                    status: row.status,
                    current_progress: row.current_progress,
                    rating: row.rating,
                    comment: row.comment,
                    release_year: row.release_year,
                    added_date: row.added_date }
    }
}

/// Inserción en `media_items`; `added_date` se omite para que aplique el DEFAULT.
#[derive(Insertable, Debug)]
#[diesel(table_name = media_items)]
pub struct NewMediaItemRow<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub media_type: &'a str,
    pub status: &'a str,
    pub current_progress: Option<&'a str>,
    pub rating: Option<i32>,
    pub comment: Option<&'a str>,
    pub release_year: Option<i32>,
}

impl<'a> NewMediaItemRow<'a> {
    pub fn from_draft(user_id: i32, draft: &'a MediaDraft) -> Self {
        NewMediaItemRow { user_id,
                          title: &draft.title,
                          media_type: &draft.media_type,
                          status: &draft.status,
                          current_progress: draft.current_progress.as_deref(),
                          rating: draft.rating,
                          comment: draft.comment.as_deref(),
                          release_year: draft.release_year }
    }
}

/// UPDATE de todos los campos editables; `None` escribe NULL.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = media_items)]
#[diesel(treat_none_as_null = true)]
pub struct MediaChangeset<'a> {
    pub title: &'a str,
    pub media_type: &'a str,
    pub status: &'a str,
    pub current_progress: Option<&'a str>,
    pub rating: Option<i32>,
    pub comment: Option<&'a str>,
    pub release_year: Option<i32>,
}

impl<'a> From<&'a MediaDraft> for MediaChangeset<'a> {
    fn from(draft: &'a MediaDraft) -> Self {
        MediaChangeset { title: &draft.title,
                         media_type: &draft.media_type,
                         status: &draft.status,
                         current_progress: draft.current_progress.as_deref(),
                         rating: draft.rating,
                         comment: draft.comment.as_deref(),
                         release_year: draft.release_year }
    }
}
