use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    AvailabilityWindow, CreateDoctorRequest, DayOfWeek, Doctor, DoctorError, Payment,
    RegisterPaymentRequest,
};

/// Doctor profile collection: identity, specialty, recurring availability
/// windows and the payment ledger. Availability and payments are
/// append-only.
pub struct DoctorService {
    doctors: RwLock<HashMap<Uuid, Doctor>>,
}

impl DoctorService {
    pub fn new() -> Self {
        Self {
            doctors: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Doctor {
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: request.name,
            specialty: request.specialty,
            availability: Vec::new(),
            payments: Vec::new(),
            user_id: request.user_id,
        };

        let mut doctors = self.doctors.write().await;
        doctors.insert(doctor.id, doctor.clone());

        debug!("Doctor created: {} ({})", doctor.name, doctor.id);
        doctor
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        let doctors = self.doctors.read().await;
        doctors.get(&doctor_id).cloned().ok_or(DoctorError::NotFound)
    }

    pub async fn exists(&self, doctor_id: Uuid) -> bool {
        let doctors = self.doctors.read().await;
        doctors.contains_key(&doctor_id)
    }

    /// All doctors, ordered by name for stable listings.
    pub async fn list_doctors(&self) -> Vec<Doctor> {
        let doctors = self.doctors.read().await;
        let mut all: Vec<Doctor> = doctors.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Doctor, DoctorError> {
        let doctors = self.doctors.read().await;
        doctors
            .values()
            .find(|d| d.user_id == Some(user_id))
            .cloned()
            .ok_or(DoctorError::NotFound)
    }

    /// Append availability windows after validating each one: start must be
    /// before end, and no window may overlap an existing or incoming window
    /// on the same weekday. Malformed windows never reach the agenda
    /// generator.
    pub async fn add_windows(
        &self,
        doctor_id: Uuid,
        windows: Vec<AvailabilityWindow>,
    ) -> Result<Doctor, DoctorError> {
        let mut doctors = self.doctors.write().await;
        let doctor = doctors.get_mut(&doctor_id).ok_or(DoctorError::NotFound)?;

        let mut accepted = doctor.availability.clone();
        for window in &windows {
            if window.start_time >= window.end_time {
                return Err(DoctorError::InvalidWindow(format!(
                    "{} {}-{}: start time must be before end time",
                    window.day_of_week, window.start_time, window.end_time
                )));
            }

            let overlapping = accepted.iter().any(|existing| {
                existing.day_of_week == window.day_of_week
                    && window.start_time < existing.end_time
                    && window.end_time > existing.start_time
            });
            if overlapping {
                return Err(DoctorError::InvalidWindow(format!(
                    "{} {}-{}: overlaps an existing window",
                    window.day_of_week, window.start_time, window.end_time
                )));
            }

            accepted.push(window.clone());
        }

        doctor.availability = accepted;
        debug!(
            "Availability extended for doctor {}: {} windows total",
            doctor_id,
            doctor.availability.len()
        );
        Ok(doctor.clone())
    }

    /// Windows matching the given weekday, in insertion order.
    pub async fn windows_for_day(
        &self,
        doctor_id: Uuid,
        day_of_week: DayOfWeek,
    ) -> Result<Vec<AvailabilityWindow>, DoctorError> {
        let doctors = self.doctors.read().await;
        let doctor = doctors.get(&doctor_id).ok_or(DoctorError::NotFound)?;

        Ok(doctor
            .availability
            .iter()
            .filter(|w| w.day_of_week == day_of_week)
            .cloned()
            .collect())
    }

    pub async fn register_payment(
        &self,
        doctor_id: Uuid,
        request: RegisterPaymentRequest,
    ) -> Result<Doctor, DoctorError> {
        let mut doctors = self.doctors.write().await;
        let doctor = doctors.get_mut(&doctor_id).ok_or(DoctorError::NotFound)?;

        doctor.payments.push(Payment {
            payment_date: chrono::Utc::now(),
            amount_paid: request.amount_paid,
            payment_method: request.payment_method,
            reference: request.reference,
        });

        debug!("Payment registered for doctor {}", doctor_id);
        Ok(doctor.clone())
    }

    pub async fn get_payments(&self, doctor_id: Uuid) -> Result<Vec<Payment>, DoctorError> {
        let doctors = self.doctors.read().await;
        let doctor = doctors.get(&doctor_id).ok_or(DoctorError::NotFound)?;
        Ok(doctor.payments.clone())
    }
}

impl Default for DoctorService {
    fn default() -> Self {
        Self::new()
    }
}
