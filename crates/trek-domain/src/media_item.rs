// media_item.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::user::UserId;
use crate::DomainError;

pub const TITLE_MAX_LEN: usize = 255;
pub const MEDIA_TYPE_MAX_LEN: usize = 10;
pub const STATUS_MAX_LEN: usize = 15;
pub const PROGRESS_MAX_LEN: usize = 50;
pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;

pub type MediaId = i32;

/// Registro de un libro/serie/juego seguido por un usuario.
///
/// `media_type` y `status` son texto libre acotado: el esquema no fija un
/// vocabulario cerrado y aquí tampoco se impone uno.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub media_id: MediaId,
    pub user_id: UserId,
    pub title: String,
    pub media_type: String,
    pub status: String,
    pub current_progress: Option<String>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub release_year: Option<i32>,
    pub added_date: Option<NaiveDateTime>,
}

/// Campos editables de un `MediaItem` (todo salvo identidad y fecha de alta).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaDraft {
    pub title: String,
    pub media_type: String,
    pub status: String,
    pub current_progress: Option<String>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub release_year: Option<i32>,
}

impl MediaDraft {
    pub fn new(title: &str, media_type: &str, status: &str) -> Self {
        MediaDraft { title: title.to_string(),
                     media_type: media_type.to_string(),
                     status: status.to_string(),
                     ..Default::default() }
    }

    pub fn with_progress(mut self, progress: &str) -> Self {
        self.current_progress = Some(progress.to_string());
        self
    }

    pub fn with_rating(mut self, rating: i32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn with_release_year(mut self, year: i32) -> Self {
        self.release_year = Some(year);
        self
    }

    /// Verifica longitudes y rango de rating con la misma semántica que el
    /// esquema (VARCHAR cuenta caracteres). El motor sigue siendo la
    /// autoridad final; esto sólo produce errores legibles antes de llegar a él.
    pub fn validate(&self) -> Result<(), DomainError> {
        required("title", &self.title, TITLE_MAX_LEN)?;
        required("media_type", &self.media_type, MEDIA_TYPE_MAX_LEN)?;
        required("status", &self.status, STATUS_MAX_LEN)?;
        if let Some(progress) = &self.current_progress {
            bounded("current_progress", progress, PROGRESS_MAX_LEN)?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        Ok(())
    }
}

pub fn rating_in_range(rating: i32) -> bool {
    (RATING_MIN..=RATING_MAX).contains(&rating)
}

pub fn validate_rating(rating: i32) -> Result<(), DomainError> {
    if !rating_in_range(rating) {
        return Err(DomainError::ValidationError(format!("rating debe estar entre {RATING_MIN} y {RATING_MAX} (recibido {rating})")));
    }
    Ok(())
}

fn required(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::ValidationError(format!("{field} no puede estar vacío")));
    }
    bounded(field, value, max)
}

fn bounded(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::ValidationError(format!("{field} excede {max} caracteres")));
    }
    Ok(())
}
