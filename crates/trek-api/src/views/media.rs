use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use trek_domain::{library, MediaDraft, MediaId};

use crate::auth::AuthUser;
use crate::error::{blocking, ApiError};
use crate::serializers::{ActionResp, MediaListResp, MediaReq, SearchParams};
use crate::AppState;

pub async fn list(State(st): State<AppState>,
                  user: AuthUser,
                  Query(params): Query<SearchParams>)
                  -> Result<Json<MediaListResp>, ApiError> {
    let media = st.media.clone();
    let data = blocking(move || library::search(media.as_ref(), user.user_id, params.q.as_deref())).await?;
    Ok(Json(MediaListResp { status: "success".into(), data }))
}

pub async fn create(State(st): State<AppState>,
                    user: AuthUser,
                    Json(req): Json<MediaReq>)
                    -> Result<(StatusCode, Json<ActionResp>), ApiError> {
    let media = st.media.clone();
    let draft = MediaDraft::from(req);
    let item = blocking(move || library::add(media.as_ref(), user.user_id, &draft)).await?;
    let mut resp = ActionResp::success("añadido");
    resp.media_id = Some(item.media_id);
    Ok((StatusCode::CREATED, Json(resp)))
}

pub async fn update(State(st): State<AppState>,
                    user: AuthUser,
                    Path(media_id): Path<MediaId>,
                    Json(req): Json<MediaReq>)
                    -> Result<Json<ActionResp>, ApiError> {
    let media = st.media.clone();
    let draft = MediaDraft::from(req);
    blocking(move || library::edit(media.as_ref(), user.user_id, media_id, &draft)).await
                                                                                  .map_err(not_yours)?;
    Ok(Json(ActionResp::success("actualizado")))
}

pub async fn delete(State(st): State<AppState>,
                    user: AuthUser,
                    Path(media_id): Path<MediaId>)
                    -> Result<Json<ActionResp>, ApiError> {
    let media = st.media.clone();
    blocking(move || library::remove(media.as_ref(), user.user_id, media_id)).await
                                                                             .map_err(not_yours)?;
    Ok(Json(ActionResp::success("eliminado")))
}

// Ajeno e inexistente son indistinguibles.
fn not_yours(err: ApiError) -> ApiError {
    if err.status == StatusCode::NOT_FOUND {
        ApiError::new(StatusCode::NOT_FOUND, "no encontrado o sin permiso")
    } else {
        err
    }
}
