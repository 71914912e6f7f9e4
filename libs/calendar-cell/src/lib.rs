pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::calendar::CalendarService;

/// State shared by the calendar handlers.
#[derive(Clone)]
pub struct CalendarState {
    pub config: Arc<AppConfig>,
    pub calendar: Arc<CalendarService>,
}
