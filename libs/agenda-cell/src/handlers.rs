// libs/agenda-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::models::{
    AgendaError, AgendaRangeQuery, GenerateAgendaRequest, ReplaceSlotsRequest, SlotActionRequest,
    TimeSlotInput,
};
use crate::services::booking::SlotBookingService;
use crate::services::generator::AgendaGenerationService;
use crate::AgendaState;

impl From<AgendaError> for AppError {
    fn from(e: AgendaError) -> Self {
        match e {
            AgendaError::DoctorNotFound
            | AgendaError::AgendaNotFound
            | AgendaError::SlotNotFound => AppError::NotFound(e.to_string()),
            AgendaError::SlotUnavailable
            | AgendaError::SlotNotReserved
            | AgendaError::AlreadyAttended
            | AgendaError::DuplicateSlot
            | AgendaError::DuplicateAgenda => AppError::Conflict(e.to_string()),
            AgendaError::NotSlotOwner => AppError::Unauthorized(e.to_string()),
            AgendaError::InvalidSlot | AgendaError::InvalidRange => {
                AppError::InvalidInput(e.to_string())
            }
        }
    }
}

fn require_secretary(user: &User) -> Result<(), AppError> {
    match user.role {
        Role::Secretary => Ok(()),
        Role::Patient | Role::Clinician | Role::Cashier => Err(AppError::Unauthorized(
            "Only secretaries can manage agendas".to_string(),
        )),
    }
}

fn caller_uuid(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::InvalidInput("Invalid caller id".to_string()))
}

fn booking_service(state: &AgendaState) -> SlotBookingService {
    SlotBookingService::new(state.agendas.clone(), state.patients.clone())
}

// ==============================================================================
// AGENDA GENERATION AND LOOKUP HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_agenda(
    State(state): State<Arc<AgendaState>>,
    Path(doctor_id): Path<Uuid>,
    Query(params): Query<AgendaRangeQuery>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let agendas = state
        .agendas
        .find_by_doctor_and_range(doctor_id, params.start_date, params.end_date)
        .await?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "agendas": agendas,
        "total": agendas.len()
    })))
}

#[axum::debug_handler]
pub async fn generate_agenda(
    State(state): State<Arc<AgendaState>>,
    Extension(user): Extension<User>,
    Json(request): Json<GenerateAgendaRequest>,
) -> Result<Json<Value>, AppError> {
    require_secretary(&user)?;

    let generator = AgendaGenerationService::new(
        state.config.clone(),
        state.calendar.clone(),
        state.doctors.clone(),
        state.agendas.clone(),
    );

    let agendas = generator
        .generate(request.doctor_id, request.start_date, request.end_date)
        .await?;

    Ok(Json(json!({
        "success": true,
        "agendas": agendas,
        "message": "Agenda generated"
    })))
}

// ==============================================================================
// MANUAL SLOT ADMINISTRATION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn add_time_slot(
    State(state): State<Arc<AgendaState>>,
    Path(agenda_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(input): Json<TimeSlotInput>,
) -> Result<Json<Value>, AppError> {
    require_secretary(&user)?;

    let agenda = booking_service(&state).add_slot(agenda_id, input).await?;

    Ok(Json(json!({
        "success": true,
        "agenda": agenda,
        "message": "Time slot added"
    })))
}

#[axum::debug_handler]
pub async fn remove_time_slot(
    State(state): State<Arc<AgendaState>>,
    Path(agenda_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(input): Json<TimeSlotInput>,
) -> Result<Json<Value>, AppError> {
    require_secretary(&user)?;

    let agenda = booking_service(&state).remove_slot(agenda_id, input).await?;

    Ok(Json(json!({
        "success": true,
        "agenda": agenda,
        "message": "Time slot removed"
    })))
}

#[axum::debug_handler]
pub async fn update_agenda_date(
    State(state): State<Arc<AgendaState>>,
    Path(agenda_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<ReplaceSlotsRequest>,
) -> Result<Json<Value>, AppError> {
    require_secretary(&user)?;

    let agenda = booking_service(&state)
        .replace_slots(agenda_id, request.time_slots)
        .await?;

    Ok(Json(json!({
        "success": true,
        "agenda": agenda,
        "message": "Agenda slots replaced"
    })))
}

// ==============================================================================
// SLOT STATE TRANSITION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_time_slot(
    State(state): State<Arc<AgendaState>>,
    Extension(user): Extension<User>,
    Json(request): Json<SlotActionRequest>,
) -> Result<Json<Value>, AppError> {
    match user.role {
        Role::Patient => {}
        Role::Clinician | Role::Secretary | Role::Cashier => {
            return Err(AppError::Unauthorized(
                "Only patients can book time slots".to_string(),
            ));
        }
    }

    let patient_id = caller_uuid(&user)?;
    let agenda = booking_service(&state)
        .book(
            request.doctor_id,
            request.date,
            request.start_time,
            request.end_time,
            patient_id,
            user.name.as_deref(),
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "agenda": agenda,
        "message": "Time slot booked"
    })))
}

#[axum::debug_handler]
pub async fn cancel_time_slot(
    State(state): State<Arc<AgendaState>>,
    Extension(user): Extension<User>,
    Json(request): Json<SlotActionRequest>,
) -> Result<Json<Value>, AppError> {
    match user.role {
        Role::Patient | Role::Secretary => {}
        Role::Clinician | Role::Cashier => {
            return Err(AppError::Unauthorized(
                "Only patients or secretaries can cancel time slots".to_string(),
            ));
        }
    }

    let caller_id = caller_uuid(&user)?;
    let agenda = booking_service(&state)
        .cancel(
            request.doctor_id,
            request.date,
            request.start_time,
            request.end_time,
            caller_id,
            user.role,
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "agenda": agenda,
        "message": "Time slot cancelled"
    })))
}

#[axum::debug_handler]
pub async fn mark_patient_attended(
    State(state): State<Arc<AgendaState>>,
    Extension(user): Extension<User>,
    Json(request): Json<SlotActionRequest>,
) -> Result<Json<Value>, AppError> {
    match user.role {
        Role::Clinician => {}
        Role::Patient | Role::Secretary | Role::Cashier => {
            return Err(AppError::Unauthorized(
                "Only clinicians can mark patients attended".to_string(),
            ));
        }
    }

    let agenda = booking_service(&state)
        .mark_attended(
            request.doctor_id,
            request.date,
            request.start_time,
            request.end_time,
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "agenda": agenda,
        "message": "Patient marked as attended"
    })))
}

// ==============================================================================
// LISTING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_waiting_patients(
    State(state): State<Arc<AgendaState>>,
    Path(doctor_id): Path<Uuid>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let waiting = booking_service(&state).waiting_patients(doctor_id).await;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "waiting_patients": waiting,
        "total": waiting.len()
    })))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AgendaState>>,
    Path(patient_id): Path<Uuid>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking_service(&state).patient_appointments(patient_id).await;

    Ok(Json(json!({
        "patient_id": patient_id,
        "appointments": appointments,
        "total": appointments.len()
    })))
}
