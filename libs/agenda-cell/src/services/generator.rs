use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use tracing::{debug, info};
use uuid::Uuid;

use calendar_cell::models::CalendarError;
use calendar_cell::services::calendar::CalendarService;
use doctor_cell::models::{DayOfWeek, DoctorError};
use doctor_cell::services::doctor::DoctorService;
use shared_config::AppConfig;

use crate::models::{Agenda, AgendaError, TimeSlot};
use crate::services::store::AgendaStore;

/// Partition `[start, end)` into consecutive fixed-length slots. A trailing
/// remainder shorter than the slot length is dropped; the last slot never
/// reaches past `end` or wraps around midnight.
pub fn partition_window(start: NaiveTime, end: NaiveTime, minutes: i64) -> Vec<TimeSlot> {
    let step = Duration::minutes(minutes);
    let mut slots = Vec::new();
    let mut current = start;

    loop {
        let (slot_end, wrapped) = current.overflowing_add_signed(step);
        if wrapped != 0 || slot_end > end || slot_end <= current {
            break;
        }
        slots.push(TimeSlot::open(current, slot_end));
        current = slot_end;
    }

    slots
}

/// Materializes bookable agendas for a doctor over a date range, one agenda
/// per working day with a matching availability window.
pub struct AgendaGenerationService {
    config: Arc<AppConfig>,
    calendar: Arc<CalendarService>,
    doctors: Arc<DoctorService>,
    agendas: Arc<AgendaStore>,
}

impl AgendaGenerationService {
    pub fn new(
        config: Arc<AppConfig>,
        calendar: Arc<CalendarService>,
        doctors: Arc<DoctorService>,
        agendas: Arc<AgendaStore>,
    ) -> Self {
        Self {
            config,
            calendar,
            doctors,
            agendas,
        }
    }

    /// Generate agendas for every working day in the inclusive range that
    /// matches one of the doctor's weekly windows. Days that already have an
    /// agenda are skipped, so re-running over an overlapping range never
    /// duplicates a doctor-day. Returns only the newly created agendas.
    pub async fn generate(
        &self,
        doctor_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Agenda>, AgendaError> {
        // Validate the doctor before any agenda is written; a bad id must
        // not leave partial output behind.
        if !self.doctors.exists(doctor_id).await {
            return Err(AgendaError::DoctorNotFound);
        }

        let working_days = self
            .calendar
            .list_working_days(start_date, end_date)
            .await
            .map_err(|e| match e {
                CalendarError::InvalidRange => AgendaError::InvalidRange,
            })?;

        debug!(
            "Generating agendas for doctor {} over {} working days",
            doctor_id,
            working_days.len()
        );

        let mut created = Vec::new();

        for day in working_days {
            let weekday = DayOfWeek::from(day.date.weekday());
            let windows = self
                .doctors
                .windows_for_day(doctor_id, weekday)
                .await
                .map_err(|e| match e {
                    DoctorError::NotFound => AgendaError::DoctorNotFound,
                    DoctorError::InvalidWindow(_) => AgendaError::InvalidSlot,
                })?;

            // A day with no availability produces no agenda at all.
            let Some(window) = windows.first() else {
                continue;
            };

            if self.agendas.contains_day(doctor_id, day.date).await {
                debug!(
                    "Agenda already exists for doctor {} on {}, skipping",
                    doctor_id, day.date
                );
                continue;
            }

            let time_slots = partition_window(
                window.start_time,
                window.end_time,
                self.config.slot_duration_minutes,
            );

            let agenda = Agenda::new(doctor_id, day.date, time_slots);
            match self.agendas.insert(agenda).await {
                Ok(agenda) => created.push(agenda),
                // Lost a race against a concurrent generation of the same
                // day; the day is covered either way.
                Err(AgendaError::DuplicateAgenda) => continue,
                Err(e) => return Err(e),
            }
        }

        info!(
            "Generated {} agendas for doctor {} in {}..={}",
            created.len(),
            doctor_id,
            start_date,
            end_date
        );
        Ok(created)
    }
}
