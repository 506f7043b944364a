use serde::{Deserialize, Serialize};
use trek_domain::{MediaDraft, MediaItem};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterReq {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginReq {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResp {
    pub access_token: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MsgResp {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
}

impl MsgResp {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into(), user_id: None }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusErrorResp {
    pub status: String,
    pub message: String,
}

impl StatusErrorResp {
    pub fn new(message: impl Into<String>) -> Self {
        Self { status: "error".into(), message: message.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResp {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_id: Option<i32>,
}

impl ActionResp {
    pub fn success(message: impl Into<String>) -> Self {
        Self { status: "success".into(), message: message.into(), media_id: None }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MediaListResp {
    pub status: String,
    pub data: Vec<MediaItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Cuerpo de alta/edición. `progress` es el nombre histórico de
/// `current_progress` en la API.
#[derive(Debug, Serialize, Deserialize)]
pub struct MediaReq {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "current_progress")]
    pub progress: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
}

impl From<MediaReq> for MediaDraft {
    fn from(req: MediaReq) -> Self {
        MediaDraft { title: req.title,
                     media_type: req.media_type,
                     status: req.status,
                     current_progress: req.progress,
                     rating: req.rating,
                     comment: req.comment,
                     release_year: req.release_year }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChangePasswordReq {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}
