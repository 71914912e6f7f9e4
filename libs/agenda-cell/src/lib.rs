pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

use calendar_cell::services::calendar::CalendarService;
use doctor_cell::services::doctor::DoctorService;
use shared_config::AppConfig;

use crate::services::directory::PatientDirectory;
use crate::services::store::AgendaStore;

/// State shared by the agenda handlers. The calendar and doctor services are
/// the generator's collaborators; the store and patient directory belong to
/// this cell.
#[derive(Clone)]
pub struct AgendaState {
    pub config: Arc<AppConfig>,
    pub calendar: Arc<CalendarService>,
    pub doctors: Arc<DoctorService>,
    pub agendas: Arc<AgendaStore>,
    pub patients: Arc<PatientDirectory>,
}
