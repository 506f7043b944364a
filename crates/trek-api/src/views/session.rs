use axum::extract::State;
use axum::Json;
use trek_domain::accounts;

use crate::auth::issue_access_token;
use crate::error::{blocking, ApiError};
use crate::serializers::{LoginReq, LoginResp};
use crate::AppState;

pub async fn login(State(st): State<AppState>, Json(req): Json<LoginReq>) -> Result<Json<LoginResp>, ApiError> {
    let users = st.users.clone();
    let user = blocking(move || accounts::authenticate(users.as_ref(), &req.username, &req.password)).await
                                                                                                     .map_err(ApiError::into_msg)?;
    let access_token = issue_access_token(&st, &user)?;
    Ok(Json(LoginResp { access_token, username: user.username }))
}
