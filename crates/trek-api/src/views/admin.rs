use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use trek_domain::accounts;

use crate::auth::AdminKey;
use crate::error::{blocking, ApiError};
use crate::serializers::{MsgResp, RegisterReq};
use crate::AppState;

/// Alta de cuenta protegida por `X-Admin-Key`; no hay registro público.
pub async fn register(State(st): State<AppState>,
                      _admin: AdminKey,
                      Json(req): Json<RegisterReq>)
                      -> Result<(StatusCode, Json<MsgResp>), ApiError> {
    let users = st.users.clone();
    let user = blocking(move || accounts::register(users.as_ref(), &req.username, &req.password)).await
                                                                                                 .map_err(ApiError::into_msg)?;
    info!(user_id = user.user_id, "account created by admin");
    Ok((StatusCode::CREATED,
        Json(MsgResp { msg: format!("usuario {} creado (ID: {})", user.username, user.user_id),
                       user_id: Some(user.user_id) })))
}
