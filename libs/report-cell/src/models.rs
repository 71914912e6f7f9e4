use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Restrict the report to a single doctor.
    pub doctor_id: Option<Uuid>,
}

/// One revenue row: attended visits and the money they brought in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueReportEntry {
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub total_patients: u64,
    pub total_revenue: f64,
}

/// A revenue row extended with the doctor's commission cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionStatement {
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub total_patients: u64,
    pub total_revenue: f64,
    pub commission_percentage: f64,
    pub commission_amount: f64,
}

/// Clinic-wide totals with the per-doctor breakdown they sum over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_patients: u64,
    pub total_revenue: f64,
    pub total_commission: f64,
    pub doctors: Vec<CommissionStatement>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("Doctor not found")]
    DoctorNotFound,
    #[error("Start date must not be after end date")]
    InvalidRange,
}
