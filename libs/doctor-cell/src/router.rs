use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::DoctorState;

pub fn doctor_routes(state: Arc<DoctorState>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_doctor))
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/by-user/{user_id}", get(handlers::get_doctor_by_user))
        .route("/{doctor_id}/availability", post(handlers::add_availability))
        .route("/{doctor_id}/payments", post(handlers::register_payment))
        .route("/{doctor_id}/payments", get(handlers::get_payments))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
