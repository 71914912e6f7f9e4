use std::env;
use tracing::warn;

/// Process-wide configuration. The per-visit fee and commission percentage
/// are injected here so the reporting layer never hard-codes billing
/// constants.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub port: u16,
    pub slot_duration_minutes: i64,
    pub consultation_fee: f64,
    pub commission_percentage: f64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("CLINIC_JWT_SECRET").unwrap_or_else(|_| {
                warn!("CLINIC_JWT_SECRET not set, using empty value");
                String::new()
            }),
            port: env::var("CLINIC_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            slot_duration_minutes: env::var("CLINIC_SLOT_DURATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            consultation_fee: env::var("CLINIC_CONSULTATION_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50.0),
            commission_percentage: env::var("CLINIC_COMMISSION_PERCENTAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30.0),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }
}
