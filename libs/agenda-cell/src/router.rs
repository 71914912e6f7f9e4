// libs/agenda-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::AgendaState;

pub fn agenda_routes(state: Arc<AgendaState>) -> Router {
    // All agenda operations require authentication
    let protected_routes = Router::new()
        // Generation and lookup
        .route("/generate", post(handlers::generate_agenda))
        .route("/doctors/{doctor_id}", get(handlers::get_agenda))
        // Manual slot administration
        .route("/{agenda_id}/slots", post(handlers::add_time_slot))
        .route("/{agenda_id}/slots", delete(handlers::remove_time_slot))
        .route("/{agenda_id}/slots", put(handlers::update_agenda_date))
        // Slot state transitions
        .route("/book", post(handlers::book_time_slot))
        .route("/cancel", post(handlers::cancel_time_slot))
        .route("/attend", post(handlers::mark_patient_attended))
        // Listings
        .route("/doctors/{doctor_id}/waiting", get(handlers::get_waiting_patients))
        .route(
            "/patients/{patient_id}/appointments",
            get(handlers::get_patient_appointments),
        )
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
