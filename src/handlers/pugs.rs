use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::info;

use crate::db::{NewPug, Pug, PugUpdate};
use crate::{CafeError, router::CafeState};

/// GET /api/pugs
pub async fn list_pugs(State(state): State<CafeState>) -> Result<Json<Vec<Pug>>, CafeError> {
    Ok(Json(state.storage.list_pugs().await?))
}

/// GET /api/pugs/favoriteCoffee/{favorite_coffee_name}
pub async fn pugs_by_favorite_coffee(
    State(state): State<CafeState>,
    Path(favorite_coffee_name): Path<String>,
) -> Result<Json<Vec<Pug>>, CafeError> {
    let pugs = state
        .storage
        .find_pugs_by_coffee(&favorite_coffee_name)
        .await?;
    Ok(Json(pugs))
}

/// GET /api/pugs/{pug_id}
pub async fn get_pug(
    State(state): State<CafeState>,
    Path(pug_id): Path<i64>,
) -> Result<Json<Pug>, CafeError> {
    state
        .storage
        .find_pug_by_id(pug_id)
        .await?
        .map(Json)
        .ok_or_else(|| CafeError::pug_not_found(pug_id))
}

/// POST /api/pugs
pub async fn create_pug(
    State(state): State<CafeState>,
    Json(body): Json<NewPug>,
) -> Result<(StatusCode, Json<Pug>), CafeError> {
    let pug = state.storage.create_pug(body).await?;
    info!(id = pug.id, name = %pug.name, "pug created");
    Ok((StatusCode::CREATED, Json(pug)))
}

/// PUT /api/pugs/{pug_id}
///
/// An unusable body against an unknown id is still a 404; the id is only
/// looked up separately when the body was rejected.
pub async fn update_pug(
    State(state): State<CafeState>,
    Path(pug_id): Path<i64>,
    body: Result<Json<PugUpdate>, JsonRejection>,
) -> Result<Json<Pug>, CafeError> {
    let update = match body {
        Ok(Json(update)) => update,
        Err(rejection) => {
            if state.storage.find_pug_by_id(pug_id).await?.is_none() {
                return Err(CafeError::pug_not_found(pug_id));
            }
            return Err(rejection.into());
        }
    };

    let pug = state.storage.update_pug(pug_id, update).await?;
    info!(
        id = pug.id,
        favorite_coffee_id = ?pug.favorite_coffee_id,
        "pug updated"
    );
    Ok(Json(pug))
}

/// DELETE /api/pugs/{pug_id}
pub async fn delete_pug(
    State(state): State<CafeState>,
    Path(pug_id): Path<i64>,
) -> Result<StatusCode, CafeError> {
    state.storage.delete_pug(pug_id).await?;
    info!(id = pug_id, "pug deleted");
    Ok(StatusCode::NO_CONTENT)
}
