pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

use agenda_cell::services::store::AgendaStore;
use doctor_cell::services::doctor::DoctorService;
use shared_config::AppConfig;

/// State shared by the report handlers. Reports are pure reads over the
/// doctor collection and the agenda store.
#[derive(Clone)]
pub struct ReportState {
    pub config: Arc<AppConfig>,
    pub doctors: Arc<DoctorService>,
    pub agendas: Arc<AgendaStore>,
}
