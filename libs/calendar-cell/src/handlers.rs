use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::models::{AddHolidayRequest, CalendarError, CalendarRangeQuery, GenerateCalendarRequest};
use crate::CalendarState;

fn require_secretary(user: &User) -> Result<(), AppError> {
    match user.role {
        Role::Secretary => Ok(()),
        Role::Patient | Role::Clinician | Role::Cashier => Err(AppError::Unauthorized(
            "Only secretaries can manage the calendar".to_string(),
        )),
    }
}

impl From<CalendarError> for AppError {
    fn from(e: CalendarError) -> Self {
        match e {
            CalendarError::InvalidRange => AppError::InvalidInput(e.to_string()),
        }
    }
}

#[axum::debug_handler]
pub async fn get_calendar(
    State(state): State<Arc<CalendarState>>,
    Query(params): Query<CalendarRangeQuery>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let days = state
        .calendar
        .list_range(params.start_date, params.end_date)
        .await?;

    Ok(Json(json!({
        "days": days,
        "total": days.len()
    })))
}

#[axum::debug_handler]
pub async fn generate_base_calendar(
    State(state): State<Arc<CalendarState>>,
    Extension(user): Extension<User>,
    Json(request): Json<GenerateCalendarRequest>,
) -> Result<Json<Value>, AppError> {
    require_secretary(&user)?;

    let created = state
        .calendar
        .ensure_range(request.start_date, request.end_date)
        .await?;

    Ok(Json(json!({
        "success": true,
        "created": created,
        "message": "Base calendar generated"
    })))
}

#[axum::debug_handler]
pub async fn add_holiday(
    State(state): State<Arc<CalendarState>>,
    Extension(user): Extension<User>,
    Json(request): Json<AddHolidayRequest>,
) -> Result<Json<Value>, AppError> {
    require_secretary(&user)?;

    let day = state
        .calendar
        .mark_holiday(request.date, request.description)
        .await;

    Ok(Json(json!({
        "success": true,
        "day": day,
        "message": "Holiday registered"
    })))
}
