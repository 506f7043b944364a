//! JWT de acceso (HS256) y extractores de autenticación.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Header as JwtHeader, Validation};
use trek_domain::{User, UserId};
use uuid::Uuid;

use crate::error::ApiError;
use crate::serializers::Claims;
use crate::AppState;

/// Identidad del portador de un access token válido.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub username: String,
}

/// Marca de que la petición trae `X-Admin-Key` correcta.
#[derive(Debug)]
pub struct AdminKey;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

pub fn issue_access_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    let now = Utc::now();
    let exp = now.checked_add_signed(state.auth.config.access_ttl)
                 .ok_or_else(|| ApiError::internal("access token expiry out of range"))?;
    let claims = Claims { sub: user.user_id.to_string(),
                          username: user.username.clone(),
                          jti: Uuid::new_v4(),
                          iat: now.timestamp(),
                          exp: exp.timestamp() };
    jsonwebtoken::encode(&JwtHeader::new(Algorithm::HS256), &claims, &state.auth.encoding)
        .map_err(|e| ApiError::internal(format!("token encoding failed: {e}")))
}

pub fn decode_access_token(state: &AppState, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut v = Validation::new(Algorithm::HS256);
    v.validate_exp = true;
    v.leeway = 0;
    jsonwebtoken::decode::<Claims>(token, &state.auth.decoding, &v).map(|d| d.claims)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts.headers
                         .get(header::AUTHORIZATION)
                         .and_then(|v| v.to_str().ok())
                         .and_then(|h| h.strip_prefix("Bearer "))
                         .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
        let claims = decode_access_token(state, token).map_err(|e| {
            if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                ApiError::unauthorized("expired access token")
            } else {
                ApiError::unauthorized("invalid token")
            }
        })?;
        let user_id = claims.sub
                            .parse::<UserId>()
                            .map_err(|_| ApiError::unauthorized("invalid token subject"))?;
        Ok(AuthUser { user_id, username: claims.username })
    }
}

impl FromRequestParts<AppState> for AdminKey {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let provided = parts.headers.get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok());
        match provided {
            Some(key) if key == state.auth.config.admin_master_key => Ok(AdminKey),
            _ => Err(ApiError::forbidden("Forbidden: invalid admin key")),
        }
    }
}
