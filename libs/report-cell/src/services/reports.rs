use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use agenda_cell::models::AgendaError;
use agenda_cell::services::store::AgendaStore;
use doctor_cell::services::doctor::DoctorService;
use shared_config::AppConfig;

use crate::models::{CommissionStatement, GeneralReport, ReportError, RevenueReportEntry};

/// Billing reports over attended slots. Every attended slot is one completed
/// visit charged at the configured consultation fee; the commission cut is
/// the configured percentage of a doctor's revenue.
pub struct ReportService {
    config: Arc<AppConfig>,
    doctors: Arc<DoctorService>,
    agendas: Arc<AgendaStore>,
}

impl ReportService {
    pub fn new(
        config: Arc<AppConfig>,
        doctors: Arc<DoctorService>,
        agendas: Arc<AgendaStore>,
    ) -> Self {
        Self {
            config,
            doctors,
            agendas,
        }
    }

    /// Attended-visit counts per doctor over the inclusive range. A doctor
    /// filter narrows the scan to that doctor and fails fast on unknown ids.
    async fn attended_per_doctor(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        doctor_id: Option<Uuid>,
    ) -> Result<HashMap<Uuid, u64>, ReportError> {
        if let Some(id) = doctor_id {
            if !self.doctors.exists(id).await {
                return Err(ReportError::DoctorNotFound);
            }
        }

        let agendas = match doctor_id {
            Some(id) => self
                .agendas
                .find_by_doctor_and_range(id, start_date, end_date)
                .await,
            None => self.agendas.find_by_range(start_date, end_date).await,
        }
        .map_err(|e| match e {
            AgendaError::InvalidRange => ReportError::InvalidRange,
            _ => ReportError::DoctorNotFound,
        })?;

        let mut attended: HashMap<Uuid, u64> = HashMap::new();
        for agenda in agendas {
            let visits = agenda
                .time_slots
                .iter()
                .filter(|s| s.is_attended)
                .count() as u64;
            *attended.entry(agenda.doctor_id).or_insert(0) += visits;
        }
        Ok(attended)
    }

    /// Per-doctor revenue rows, ordered by doctor name. Doctors without a
    /// single attended visit in the range are omitted.
    pub async fn revenue_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        doctor_id: Option<Uuid>,
    ) -> Result<Vec<RevenueReportEntry>, ReportError> {
        let attended = self
            .attended_per_doctor(start_date, end_date, doctor_id)
            .await?;

        let mut entries = Vec::new();
        for (doctor_id, total_patients) in attended {
            if total_patients == 0 {
                continue;
            }
            let doctor_name = match self.doctors.get_doctor(doctor_id).await {
                Ok(doctor) => doctor.name,
                Err(_) => "Unknown".to_string(),
            };
            entries.push(RevenueReportEntry {
                doctor_id,
                doctor_name,
                total_patients,
                total_revenue: total_patients as f64 * self.config.consultation_fee,
            });
        }

        entries.sort_by(|a, b| a.doctor_name.cmp(&b.doctor_name));
        debug!(
            "Revenue report {}..={}: {} doctors",
            start_date,
            end_date,
            entries.len()
        );
        Ok(entries)
    }

    /// Revenue rows extended with the commission cut owed to each doctor.
    pub async fn commission_statement(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        doctor_id: Option<Uuid>,
    ) -> Result<Vec<CommissionStatement>, ReportError> {
        let pct = self.config.commission_percentage;
        let entries = self
            .revenue_report(start_date, end_date, doctor_id)
            .await?;

        Ok(entries
            .into_iter()
            .map(|e| CommissionStatement {
                doctor_id: e.doctor_id,
                doctor_name: e.doctor_name,
                total_patients: e.total_patients,
                total_revenue: e.total_revenue,
                commission_percentage: pct,
                commission_amount: e.total_revenue * pct / 100.0,
            })
            .collect())
    }

    /// Clinic-wide totals over the range, with the per-doctor breakdown.
    pub async fn general_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<GeneralReport, ReportError> {
        let doctors = self
            .commission_statement(start_date, end_date, None)
            .await?;

        let total_patients = doctors.iter().map(|d| d.total_patients).sum();
        let total_revenue = doctors.iter().map(|d| d.total_revenue).sum();
        let total_commission = doctors.iter().map(|d| d.commission_amount).sum();

        Ok(GeneralReport {
            start_date,
            end_date,
            total_patients,
            total_revenue,
            total_commission,
            doctors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_cell::models::{Agenda, TimeSlot};
    use assert_matches::assert_matches;
    use chrono::NaiveTime;
    use doctor_cell::models::CreateDoctorRequest;
    use shared_utils::test_utils::TestConfig;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn attended_slot(h: u32) -> TimeSlot {
        let mut slot = TimeSlot::open(time(h), NaiveTime::from_hms_opt(h, 30, 0).unwrap());
        slot.is_reserved = true;
        slot.patient_id = Some(Uuid::new_v4());
        slot.is_attended = true;
        slot
    }

    fn reserved_slot(h: u32) -> TimeSlot {
        let mut slot = TimeSlot::open(time(h), NaiveTime::from_hms_opt(h, 30, 0).unwrap());
        slot.is_reserved = true;
        slot.patient_id = Some(Uuid::new_v4());
        slot
    }

    async fn service_with_two_doctors() -> (ReportService, Uuid, Uuid) {
        let doctors = Arc::new(DoctorService::new());
        let agendas = Arc::new(AgendaStore::new());

        let alvarez = doctors
            .create_doctor(CreateDoctorRequest {
                name: "Dr. Alvarez".to_string(),
                specialty: "Cardiology".to_string(),
                user_id: None,
            })
            .await;
        let soto = doctors
            .create_doctor(CreateDoctorRequest {
                name: "Dr. Soto".to_string(),
                specialty: "Pediatrics".to_string(),
                user_id: None,
            })
            .await;

        // Alvarez: two attended visits and one still-waiting reservation.
        agendas
            .insert(Agenda::new(
                alvarez.id,
                date(2),
                vec![attended_slot(9), attended_slot(10), reserved_slot(11)],
            ))
            .await
            .unwrap();
        // Soto: one attended visit inside the range, one outside.
        agendas
            .insert(Agenda::new(soto.id, date(3), vec![attended_slot(9)]))
            .await
            .unwrap();
        agendas
            .insert(Agenda::new(soto.id, date(20), vec![attended_slot(9)]))
            .await
            .unwrap();

        let service = ReportService::new(
            TestConfig::default().to_arc(),
            doctors,
            agendas,
        );
        (service, alvarez.id, soto.id)
    }

    #[tokio::test]
    async fn revenue_counts_only_attended_slots_in_range() {
        let (service, alvarez_id, soto_id) = service_with_two_doctors().await;

        let entries = service
            .revenue_report(date(1), date(10), None)
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        // Ordered by name: Alvarez before Soto.
        assert_eq!(entries[0].doctor_id, alvarez_id);
        assert_eq!(entries[0].total_patients, 2);
        assert_eq!(entries[0].total_revenue, 100.0);
        assert_eq!(entries[1].doctor_id, soto_id);
        assert_eq!(entries[1].total_patients, 1);
        assert_eq!(entries[1].total_revenue, 50.0);
    }

    #[tokio::test]
    async fn doctor_filter_narrows_the_report() {
        let (service, _, soto_id) = service_with_two_doctors().await;

        let entries = service
            .revenue_report(date(1), date(30), Some(soto_id))
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total_patients, 2);

        let unknown = service
            .revenue_report(date(1), date(30), Some(Uuid::new_v4()))
            .await;
        assert_matches!(unknown, Err(ReportError::DoctorNotFound));
    }

    #[tokio::test]
    async fn commission_is_the_configured_cut_of_revenue() {
        let (service, alvarez_id, _) = service_with_two_doctors().await;

        let statements = service
            .commission_statement(date(1), date(10), Some(alvarez_id))
            .await
            .unwrap();

        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].commission_percentage, 30.0);
        assert_eq!(statements[0].commission_amount, 30.0);
    }

    #[tokio::test]
    async fn general_report_totals_match_the_breakdown() {
        let (service, _, _) = service_with_two_doctors().await;

        let report = service.general_report(date(1), date(30)).await.unwrap();

        assert_eq!(report.total_patients, 4);
        assert_eq!(report.total_revenue, 200.0);
        assert_eq!(report.total_commission, 60.0);
        assert_eq!(report.doctors.len(), 2);
    }

    #[tokio::test]
    async fn doctors_without_attended_visits_are_omitted() {
        let doctors = Arc::new(DoctorService::new());
        let agendas = Arc::new(AgendaStore::new());

        let idle = doctors
            .create_doctor(CreateDoctorRequest {
                name: "Dr. Vega".to_string(),
                specialty: "General".to_string(),
                user_id: None,
            })
            .await;
        agendas
            .insert(Agenda::new(idle.id, date(2), vec![reserved_slot(9)]))
            .await
            .unwrap();

        let service = ReportService::new(TestConfig::default().to_arc(), doctors, agendas);
        let entries = service.revenue_report(date(1), date(10), None).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let (service, _, _) = service_with_two_doctors().await;
        let result = service.revenue_report(date(10), date(1), None).await;
        assert_matches!(result, Err(ReportError::InvalidRange));
    }
}
