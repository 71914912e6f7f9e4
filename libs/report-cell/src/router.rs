use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::ReportState;

pub fn report_routes(state: Arc<ReportState>) -> Router {
    let protected_routes = Router::new()
        .route("/revenue", get(handlers::get_revenue_report))
        .route("/commissions", get(handlers::get_commission_report))
        .route("/general", get(handlers::get_general_report))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
