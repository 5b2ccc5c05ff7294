use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::db::CafeStorage;
use crate::handlers::{coffee, pugs};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct CafeState {
    pub storage: CafeStorage,
}

impl CafeState {
    pub fn new(storage: CafeStorage) -> Self {
        Self { storage }
    }
}

/// Full application router, with every resource mounted under `/api`.
pub fn cafe_router(state: CafeState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_router() -> Router<CafeState> {
    // Filter routes go before the `{id}` routes so a literal segment is never read as an id.
    Router::new()
        .route("/coffee", get(coffee::list_coffees).post(coffee::create_coffee))
        .route(
            "/coffee/ingredients/{ingredient_name}",
            get(coffee::coffees_by_ingredient),
        )
        .route("/coffee/{coffee_id}", get(coffee::get_coffee))
        .route("/pugs", get(pugs::list_pugs).post(pugs::create_pug))
        .route(
            "/pugs/favoriteCoffee/{favorite_coffee_name}",
            get(pugs::pugs_by_favorite_coffee),
        )
        .route(
            "/pugs/{pug_id}",
            get(pugs::get_pug).put(pugs::update_pug).delete(pugs::delete_pug),
        )
}
