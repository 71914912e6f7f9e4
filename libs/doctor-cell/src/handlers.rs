use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::models::{
    AddAvailabilityRequest, CreateDoctorRequest, DoctorError, RegisterPaymentRequest,
};
use crate::DoctorState;

impl From<DoctorError> for AppError {
    fn from(e: DoctorError) -> Self {
        match e {
            DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
            DoctorError::InvalidWindow(_) => AppError::InvalidInput(e.to_string()),
        }
    }
}

fn require_secretary(user: &User) -> Result<(), AppError> {
    match user.role {
        Role::Secretary => Ok(()),
        Role::Patient | Role::Clinician | Role::Cashier => Err(AppError::Unauthorized(
            "Only secretaries can manage doctor profiles".to_string(),
        )),
    }
}

fn require_cashier_or_secretary(user: &User) -> Result<(), AppError> {
    match user.role {
        Role::Cashier | Role::Secretary => Ok(()),
        Role::Patient | Role::Clinician => Err(AppError::Unauthorized(
            "Only cashiers or secretaries can access the payment ledger".to_string(),
        )),
    }
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<DoctorState>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    require_secretary(&user)?;

    let doctor = state.doctors.create_doctor(request).await;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Doctor registered"
    })))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<DoctorState>>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctors = state.doctors.list_doctors().await;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<Uuid>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctor = state.doctors.get_doctor(doctor_id).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn get_doctor_by_user(
    State(state): State<Arc<DoctorState>>,
    Path(user_id): Path<Uuid>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctor = state.doctors.find_by_user(user_id).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn add_availability(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<AddAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    require_secretary(&user)?;

    let doctor = state.doctors.add_windows(doctor_id, request.windows).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Availability updated"
    })))
}

#[axum::debug_handler]
pub async fn register_payment(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<RegisterPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    require_cashier_or_secretary(&user)?;

    let doctor = state.doctors.register_payment(doctor_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Payment registered"
    })))
}

#[axum::debug_handler]
pub async fn get_payments(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_cashier_or_secretary(&user)?;

    let payments = state.doctors.get_payments(doctor_id).await?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "payments": payments,
        "total": payments.len()
    })))
}
