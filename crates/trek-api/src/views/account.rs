use axum::extract::State;
use axum::Json;
use tracing::info;
use trek_domain::accounts;

use crate::auth::AuthUser;
use crate::error::{blocking, ApiError};
use crate::serializers::{ActionResp, ChangePasswordReq};
use crate::AppState;

pub async fn change_password(State(st): State<AppState>,
                             user: AuthUser,
                             Json(req): Json<ChangePasswordReq>)
                             -> Result<Json<ActionResp>, ApiError> {
    let users = st.users.clone();
    blocking(move || {
        // La contraseña actual se verifica antes de rotar.
        accounts::authenticate(users.as_ref(), &user.username, &req.current_password)?;
        accounts::rotate_password(users.as_ref(), user.user_id, &req.new_password)
    }).await?;
    Ok(Json(ActionResp::success("contraseña actualizada")))
}

pub async fn delete_account(State(st): State<AppState>, user: AuthUser) -> Result<Json<ActionResp>, ApiError> {
    let users = st.users.clone();
    let user_id = user.user_id;
    blocking(move || accounts::delete_account(users.as_ref(), user_id)).await?;
    info!(user_id, "account deleted by owner");
    Ok(Json(ActionResp::success("cuenta eliminada")))
}
