use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::models::{ReportError, ReportRangeQuery};
use crate::services::reports::ReportService;
use crate::ReportState;

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::DoctorNotFound => AppError::NotFound(e.to_string()),
            ReportError::InvalidRange => AppError::InvalidInput(e.to_string()),
        }
    }
}

fn require_cashier_or_secretary(user: &User) -> Result<(), AppError> {
    match user.role {
        Role::Cashier | Role::Secretary => Ok(()),
        Role::Patient | Role::Clinician => Err(AppError::Unauthorized(
            "Only cashiers or secretaries can read reports".to_string(),
        )),
    }
}

fn report_service(state: &ReportState) -> ReportService {
    ReportService::new(
        state.config.clone(),
        state.doctors.clone(),
        state.agendas.clone(),
    )
}

#[axum::debug_handler]
pub async fn get_revenue_report(
    State(state): State<Arc<ReportState>>,
    Query(params): Query<ReportRangeQuery>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_cashier_or_secretary(&user)?;

    let entries = report_service(&state)
        .revenue_report(params.start_date, params.end_date, params.doctor_id)
        .await?;

    Ok(Json(json!({
        "start_date": params.start_date,
        "end_date": params.end_date,
        "entries": entries,
        "total": entries.len()
    })))
}

#[axum::debug_handler]
pub async fn get_commission_report(
    State(state): State<Arc<ReportState>>,
    Query(params): Query<ReportRangeQuery>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_cashier_or_secretary(&user)?;

    let statements = report_service(&state)
        .commission_statement(params.start_date, params.end_date, params.doctor_id)
        .await?;

    Ok(Json(json!({
        "start_date": params.start_date,
        "end_date": params.end_date,
        "statements": statements,
        "total": statements.len()
    })))
}

#[axum::debug_handler]
pub async fn get_general_report(
    State(state): State<Arc<ReportState>>,
    Query(params): Query<ReportRangeQuery>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_cashier_or_secretary(&user)?;

    let report = report_service(&state)
        .general_report(params.start_date, params.end_date)
        .await?;

    Ok(Json(json!(report)))
}
