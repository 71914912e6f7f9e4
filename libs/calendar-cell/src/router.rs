use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::CalendarState;

pub fn calendar_routes(state: Arc<CalendarState>) -> Router {
    let protected_routes = Router::new()
        .route("/", get(handlers::get_calendar))
        .route("/generate", post(handlers::generate_base_calendar))
        .route("/holidays", post(handlers::add_holiday))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
