use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

/// Display names for patients seen at booking time. The core only ever
/// receives identity as a token fact, so this directory is filled as
/// bookings happen and read when the waiting list needs names.
pub struct PatientDirectory {
    names: RwLock<HashMap<Uuid, String>>,
}

impl PatientDirectory {
    pub fn new() -> Self {
        Self {
            names: RwLock::new(HashMap::new()),
        }
    }

    pub async fn record(&self, patient_id: Uuid, name: Option<&str>) {
        if let Some(name) = name {
            let mut names = self.names.write().await;
            names.insert(patient_id, name.to_string());
        }
    }

    pub async fn name_of(&self, patient_id: Uuid) -> Option<String> {
        let names = self.names.read().await;
        names.get(&patient_id).cloned()
    }
}

impl Default for PatientDirectory {
    fn default() -> Self {
        Self::new()
    }
}
