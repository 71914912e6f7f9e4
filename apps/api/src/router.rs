use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use agenda_cell::router::agenda_routes;
use agenda_cell::services::directory::PatientDirectory;
use agenda_cell::services::store::AgendaStore;
use agenda_cell::AgendaState;
use calendar_cell::router::calendar_routes;
use calendar_cell::services::calendar::CalendarService;
use calendar_cell::CalendarState;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::doctor::DoctorService;
use doctor_cell::DoctorState;
use report_cell::router::report_routes;
use report_cell::ReportState;
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>) -> Router {
    // One instance of each collection, shared by every cell that reads it.
    let calendar = Arc::new(CalendarService::new());
    let doctors = Arc::new(DoctorService::new());
    let agendas = Arc::new(AgendaStore::new());
    let patients = Arc::new(PatientDirectory::new());

    let calendar_state = Arc::new(CalendarState {
        config: config.clone(),
        calendar: calendar.clone(),
    });
    let doctor_state = Arc::new(DoctorState {
        config: config.clone(),
        doctors: doctors.clone(),
    });
    let agenda_state = Arc::new(AgendaState {
        config: config.clone(),
        calendar,
        doctors: doctors.clone(),
        agendas: agendas.clone(),
        patients,
    });
    let report_state = Arc::new(ReportState {
        config,
        doctors,
        agendas,
    });

    Router::new()
        .route("/", get(|| async { "Clinic Scheduling API is running!" }))
        .nest("/calendar", calendar_routes(calendar_state))
        .nest("/doctors", doctor_routes(doctor_state))
        .nest("/agendas", agenda_routes(agenda_state))
        .nest("/reports", report_routes(report_state))
}
