use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar date with its working-day/holiday status. At most one entry
/// exists per date; entries are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_holiday: bool,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateCalendarRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddHolidayRequest {
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CalendarError {
    #[error("Start date must not be after end date")]
    InvalidRange,
}
