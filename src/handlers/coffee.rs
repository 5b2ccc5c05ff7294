use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::db::{Coffee, NewCoffee};
use crate::{CafeError, router::CafeState};

/// GET /api/coffee
pub async fn list_coffees(
    State(state): State<CafeState>,
) -> Result<Json<Vec<Coffee>>, CafeError> {
    Ok(Json(state.storage.list_coffees().await?))
}

/// GET /api/coffee/ingredients/{ingredient_name}
pub async fn coffees_by_ingredient(
    State(state): State<CafeState>,
    Path(ingredient_name): Path<String>,
) -> Result<Json<Vec<Coffee>>, CafeError> {
    let coffees = state
        .storage
        .find_coffees_by_ingredient(&ingredient_name)
        .await?;
    Ok(Json(coffees))
}

/// GET /api/coffee/{coffee_id}
pub async fn get_coffee(
    State(state): State<CafeState>,
    Path(coffee_id): Path<i64>,
) -> Result<Json<Coffee>, CafeError> {
    state
        .storage
        .find_coffee_by_id(coffee_id)
        .await?
        .map(Json)
        .ok_or_else(|| CafeError::coffee_not_found(coffee_id))
}

/// POST /api/coffee
pub async fn create_coffee(
    State(state): State<CafeState>,
    Json(body): Json<NewCoffee>,
) -> Result<(StatusCode, Json<Coffee>), CafeError> {
    let coffee = state.storage.create_coffee(body).await?;
    info!(id = coffee.id, name = %coffee.name, "coffee created");
    Ok((StatusCode::CREATED, Json(coffee)))
}
