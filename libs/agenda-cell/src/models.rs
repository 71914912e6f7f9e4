// libs/agenda-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// CORE AGENDA MODELS
// ==============================================================================

/// One bookable time slot. Identity within an agenda is the exact
/// (start_time, end_time) pair, compared by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_reserved: bool,
    pub patient_id: Option<Uuid>,
    pub is_attended: bool,
}

impl TimeSlot {
    pub fn open(start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            start_time,
            end_time,
            is_reserved: false,
            patient_id: None,
            is_attended: false,
        }
    }

    pub fn matches(&self, start_time: NaiveTime, end_time: NaiveTime) -> bool {
        self.start_time == start_time && self.end_time == end_time
    }

    pub fn status(&self) -> SlotStatus {
        match (self.is_reserved, self.is_attended) {
            (false, _) => SlotStatus::Open,
            (true, false) => SlotStatus::Reserved,
            (true, true) => SlotStatus::Attended,
        }
    }
}

/// Open -> Reserved -> Attended (terminal), or back to Open via
/// cancellation. `Attended` implies `is_reserved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Open,
    Reserved,
    Attended,
}

/// One doctor-day of bookable slots. Exactly one agenda exists per
/// (doctor_id, date); the store enforces the uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agenda {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time_slots: Vec<TimeSlot>,
}

impl Agenda {
    pub fn new(doctor_id: Uuid, date: NaiveDate, time_slots: Vec<TimeSlot>) -> Self {
        Self {
            id: Uuid::new_v4(),
            doctor_id,
            date,
            time_slots,
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateAgendaRequest {
    pub doctor_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgendaRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Bare (start, end) pair used for manual slot add/remove and wholesale
/// replacement. Reservation state can never be smuggled in through these
/// inputs; replacing slots always start out Open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotInput {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceSlotsRequest {
    pub time_slots: Vec<TimeSlotInput>,
}

/// Addresses one slot of one doctor-day for book/cancel/attend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotActionRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingPatient {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientAppointment {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgendaError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Agenda not found for the requested date")]
    AgendaNotFound,

    #[error("Time slot not available or already reserved")]
    SlotUnavailable,

    #[error("Time slot not found")]
    SlotNotFound,

    #[error("Time slot is not reserved")]
    SlotNotReserved,

    #[error("Time slot already attended")]
    AlreadyAttended,

    #[error("Time slot already exists in this agenda")]
    DuplicateSlot,

    #[error("An agenda already exists for this doctor and date")]
    DuplicateAgenda,

    #[error("Not authorized to cancel this time slot")]
    NotSlotOwner,

    #[error("Invalid time slot: start time must be before end time")]
    InvalidSlot,

    #[error("Start date must not be after end date")]
    InvalidRange,
}
