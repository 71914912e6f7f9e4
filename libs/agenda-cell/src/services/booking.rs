use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::auth::Role;

use crate::models::{
    Agenda, AgendaError, PatientAppointment, SlotStatus, TimeSlot, TimeSlotInput, WaitingPatient,
};
use crate::services::directory::PatientDirectory;
use crate::services::store::AgendaStore;

/// The slot state machine: Open -> Reserved -> Attended, or Reserved ->
/// Open via cancellation. Every transition runs under the owning agenda's
/// lock, so two concurrent books of the same slot cannot both succeed.
pub struct SlotBookingService {
    agendas: Arc<AgendaStore>,
    patients: Arc<PatientDirectory>,
}

impl SlotBookingService {
    pub fn new(agendas: Arc<AgendaStore>, patients: Arc<PatientDirectory>) -> Self {
        Self { agendas, patients }
    }

    /// Reserve an Open slot for a patient. "Slot does not exist" and "slot
    /// already reserved" are deliberately the same error; a caller learns
    /// only that the pair is not available.
    pub async fn book(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        patient_id: Uuid,
        patient_name: Option<&str>,
    ) -> Result<Agenda, AgendaError> {
        let agenda = self
            .agendas
            .with_agenda_for_day(doctor_id, date, |agenda| {
                let slot = agenda
                    .time_slots
                    .iter_mut()
                    .find(|s| s.matches(start_time, end_time) && s.status() == SlotStatus::Open)
                    .ok_or(AgendaError::SlotUnavailable)?;

                slot.is_reserved = true;
                slot.patient_id = Some(patient_id);
                Ok(agenda.clone())
            })
            .await?;

        self.patients.record(patient_id, patient_name).await;

        debug!(
            "Slot {}-{} on {} booked for patient {}",
            start_time, end_time, date, patient_id
        );
        Ok(agenda)
    }

    /// Release a Reserved slot back to Open. Patients may only cancel their
    /// own reservation; secretaries may cancel any. Attended slots are out
    /// of reach of this path: reverting a billed visit takes an explicit
    /// administrative slot removal.
    pub async fn cancel(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        caller_id: Uuid,
        caller_role: Role,
    ) -> Result<Agenda, AgendaError> {
        let agenda = self
            .agendas
            .with_agenda_for_day(doctor_id, date, |agenda| {
                let slot = agenda
                    .time_slots
                    .iter_mut()
                    .find(|s| s.matches(start_time, end_time))
                    .ok_or(AgendaError::SlotNotFound)?;

                match slot.status() {
                    SlotStatus::Open => return Err(AgendaError::SlotNotReserved),
                    SlotStatus::Attended => return Err(AgendaError::AlreadyAttended),
                    SlotStatus::Reserved => {}
                }
                if caller_role == Role::Patient && slot.patient_id != Some(caller_id) {
                    return Err(AgendaError::NotSlotOwner);
                }

                slot.is_reserved = false;
                slot.patient_id = None;
                Ok(agenda.clone())
            })
            .await?;

        debug!(
            "Slot {}-{} on {} cancelled by {} ({})",
            start_time, end_time, date, caller_id, caller_role
        );
        Ok(agenda)
    }

    /// Mark a Reserved slot Attended. Terminal for the slot, and the trigger
    /// billing treats as a completed, chargeable visit.
    pub async fn mark_attended(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Agenda, AgendaError> {
        let agenda = self
            .agendas
            .with_agenda_for_day(doctor_id, date, |agenda| {
                let slot = agenda
                    .time_slots
                    .iter_mut()
                    .find(|s| s.matches(start_time, end_time))
                    .ok_or(AgendaError::SlotNotFound)?;

                match slot.status() {
                    SlotStatus::Open => return Err(AgendaError::SlotNotReserved),
                    SlotStatus::Attended => return Err(AgendaError::AlreadyAttended),
                    SlotStatus::Reserved => {}
                }

                slot.is_attended = true;
                Ok(agenda.clone())
            })
            .await?;

        debug!("Slot {}-{} on {} marked attended", start_time, end_time, date);
        Ok(agenda)
    }

    /// Append one slot to an agenda. The (start, end) pair must not already
    /// exist; the slot list stays ordered by start time.
    pub async fn add_slot(
        &self,
        agenda_id: Uuid,
        input: TimeSlotInput,
    ) -> Result<Agenda, AgendaError> {
        if input.start_time >= input.end_time {
            return Err(AgendaError::InvalidSlot);
        }

        self.agendas
            .with_agenda(agenda_id, |agenda| {
                let exists = agenda
                    .time_slots
                    .iter()
                    .any(|s| s.matches(input.start_time, input.end_time));
                if exists {
                    return Err(AgendaError::DuplicateSlot);
                }

                agenda
                    .time_slots
                    .push(TimeSlot::open(input.start_time, input.end_time));
                agenda.time_slots.sort_by_key(|s| s.start_time);
                Ok(agenda.clone())
            })
            .await
    }

    /// Remove the slot with the exact (start, end) pair, whatever its
    /// reservation state. Administration-level: removing a reserved slot
    /// silently drops the reservation, so it is logged loudly.
    pub async fn remove_slot(
        &self,
        agenda_id: Uuid,
        input: TimeSlotInput,
    ) -> Result<Agenda, AgendaError> {
        self.agendas
            .with_agenda(agenda_id, |agenda| {
                let index = agenda
                    .time_slots
                    .iter()
                    .position(|s| s.matches(input.start_time, input.end_time))
                    .ok_or(AgendaError::SlotNotFound)?;

                let removed = agenda.time_slots.remove(index);
                if removed.is_reserved {
                    warn!(
                        "Removed reserved slot {}-{} from agenda {} (patient {:?})",
                        removed.start_time, removed.end_time, agenda.id, removed.patient_id
                    );
                }
                Ok(agenda.clone())
            })
            .await
    }

    /// Wholesale replacement of an agenda's slot list. Every replacing slot
    /// starts Open with no patient, whatever the caller sent.
    pub async fn replace_slots(
        &self,
        agenda_id: Uuid,
        inputs: Vec<TimeSlotInput>,
    ) -> Result<Agenda, AgendaError> {
        if inputs.iter().any(|i| i.start_time >= i.end_time) {
            return Err(AgendaError::InvalidSlot);
        }

        self.agendas
            .with_agenda(agenda_id, |agenda| {
                let mut slots: Vec<TimeSlot> = inputs
                    .iter()
                    .map(|i| TimeSlot::open(i.start_time, i.end_time))
                    .collect();
                slots.sort_by_key(|s| s.start_time);
                agenda.time_slots = slots;
                Ok(agenda.clone())
            })
            .await
    }

    /// Reserved-not-Attended slots for one doctor, with the patient's
    /// display name where one was recorded at booking time.
    pub async fn waiting_patients(&self, doctor_id: Uuid) -> Vec<WaitingPatient> {
        let mut waiting = Vec::new();

        for agenda in self.agendas.find_by_doctor(doctor_id).await {
            for slot in &agenda.time_slots {
                if slot.status() == SlotStatus::Reserved {
                    if let Some(patient_id) = slot.patient_id {
                        let patient_name = self
                            .patients
                            .name_of(patient_id)
                            .await
                            .unwrap_or_else(|| "Unknown".to_string());
                        waiting.push(WaitingPatient {
                            patient_id,
                            patient_name,
                            date: agenda.date,
                            start_time: slot.start_time,
                            end_time: slot.end_time,
                        });
                    }
                }
            }
        }

        waiting.sort_by_key(|w| (w.date, w.start_time));
        waiting
    }

    /// Reserved-not-Attended slots across all doctors for one patient.
    pub async fn patient_appointments(&self, patient_id: Uuid) -> Vec<PatientAppointment> {
        let mut appointments = Vec::new();

        for agenda in self.agendas.all().await {
            for slot in &agenda.time_slots {
                if slot.status() == SlotStatus::Reserved && slot.patient_id == Some(patient_id) {
                    appointments.push(PatientAppointment {
                        doctor_id: agenda.doctor_id,
                        date: agenda.date,
                        start_time: slot.start_time,
                        end_time: slot.end_time,
                    });
                }
            }
        }

        appointments.sort_by_key(|a| (a.date, a.start_time));
        appointments
    }
}
