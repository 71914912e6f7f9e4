use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::{Agenda, AgendaError};

struct Inner {
    agendas: HashMap<Uuid, Arc<Mutex<Agenda>>>,
    // Unique index: exactly one agenda per doctor-day.
    by_day: HashMap<(Uuid, NaiveDate), Uuid>,
}

/// The agenda collection. Every agenda lives behind its own lock, so all
/// read-modify-write cycles on one agenda's slot list serialize, while
/// operations on different agendas proceed in parallel.
pub struct AgendaStore {
    inner: RwLock<Inner>,
}

impl AgendaStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                agendas: HashMap::new(),
                by_day: HashMap::new(),
            }),
        }
    }

    /// Insert a whole agenda atomically. Fails with `DuplicateAgenda` if the
    /// (doctor_id, date) pair is already present, which keeps regeneration
    /// over overlapping ranges from duplicating days.
    pub async fn insert(&self, agenda: Agenda) -> Result<Agenda, AgendaError> {
        let mut inner = self.inner.write().await;

        let key = (agenda.doctor_id, agenda.date);
        if inner.by_day.contains_key(&key) {
            return Err(AgendaError::DuplicateAgenda);
        }

        inner.by_day.insert(key, agenda.id);
        inner
            .agendas
            .insert(agenda.id, Arc::new(Mutex::new(agenda.clone())));
        Ok(agenda)
    }

    pub async fn contains_day(&self, doctor_id: Uuid, date: NaiveDate) -> bool {
        let inner = self.inner.read().await;
        inner.by_day.contains_key(&(doctor_id, date))
    }

    async fn handle(&self, agenda_id: Uuid) -> Result<Arc<Mutex<Agenda>>, AgendaError> {
        let inner = self.inner.read().await;
        inner
            .agendas
            .get(&agenda_id)
            .cloned()
            .ok_or(AgendaError::AgendaNotFound)
    }

    async fn handle_for_day(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Arc<Mutex<Agenda>>, AgendaError> {
        let inner = self.inner.read().await;
        let id = inner
            .by_day
            .get(&(doctor_id, date))
            .ok_or(AgendaError::AgendaNotFound)?;
        inner
            .agendas
            .get(id)
            .cloned()
            .ok_or(AgendaError::AgendaNotFound)
    }

    pub async fn get(&self, agenda_id: Uuid) -> Result<Agenda, AgendaError> {
        let handle = self.handle(agenda_id).await?;
        let agenda = handle.lock().await;
        Ok(agenda.clone())
    }

    pub async fn find_by_doctor_and_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Agenda, AgendaError> {
        let handle = self.handle_for_day(doctor_id, date).await?;
        let agenda = handle.lock().await;
        Ok(agenda.clone())
    }

    /// Agendas for one doctor whose date falls in the inclusive range,
    /// ascending by date.
    pub async fn find_by_doctor_and_range(
        &self,
        doctor_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Agenda>, AgendaError> {
        if start_date > end_date {
            return Err(AgendaError::InvalidRange);
        }

        let handles = {
            let inner = self.inner.read().await;
            let mut matches: Vec<(NaiveDate, Arc<Mutex<Agenda>>)> = inner
                .by_day
                .iter()
                .filter(|((doctor, date), _)| {
                    *doctor == doctor_id && *date >= start_date && *date <= end_date
                })
                .filter_map(|((_, date), id)| {
                    inner.agendas.get(id).map(|h| (*date, h.clone()))
                })
                .collect();
            matches.sort_by_key(|(date, _)| *date);
            matches
        };

        let mut agendas = Vec::with_capacity(handles.len());
        for (_, handle) in handles {
            let agenda = handle.lock().await;
            agendas.push(agenda.clone());
        }
        Ok(agendas)
    }

    /// All agendas for one doctor, ascending by date. Waiting-list input.
    pub async fn find_by_doctor(&self, doctor_id: Uuid) -> Vec<Agenda> {
        let handles = {
            let inner = self.inner.read().await;
            let mut matches: Vec<(NaiveDate, Arc<Mutex<Agenda>>)> = inner
                .by_day
                .iter()
                .filter(|((doctor, _), _)| *doctor == doctor_id)
                .filter_map(|((_, date), id)| {
                    inner.agendas.get(id).map(|h| (*date, h.clone()))
                })
                .collect();
            matches.sort_by_key(|(date, _)| *date);
            matches
        };

        let mut agendas = Vec::with_capacity(handles.len());
        for (_, handle) in handles {
            let agenda = handle.lock().await;
            agendas.push(agenda.clone());
        }
        agendas
    }

    /// Agendas across all doctors in the inclusive range. Reporting input.
    pub async fn find_by_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Agenda>, AgendaError> {
        if start_date > end_date {
            return Err(AgendaError::InvalidRange);
        }

        let handles = {
            let inner = self.inner.read().await;
            let mut matches: Vec<(NaiveDate, Arc<Mutex<Agenda>>)> = inner
                .by_day
                .iter()
                .filter(|((_, date), _)| *date >= start_date && *date <= end_date)
                .filter_map(|((_, date), id)| {
                    inner.agendas.get(id).map(|h| (*date, h.clone()))
                })
                .collect();
            matches.sort_by_key(|(date, _)| *date);
            matches
        };

        let mut agendas = Vec::with_capacity(handles.len());
        for (_, handle) in handles {
            let agenda = handle.lock().await;
            agendas.push(agenda.clone());
        }
        Ok(agendas)
    }

    /// Snapshot of every agenda. Patient-appointment scans.
    pub async fn all(&self) -> Vec<Agenda> {
        let handles: Vec<Arc<Mutex<Agenda>>> = {
            let inner = self.inner.read().await;
            inner.agendas.values().cloned().collect()
        };

        let mut agendas = Vec::with_capacity(handles.len());
        for handle in handles {
            let agenda = handle.lock().await;
            agendas.push(agenda.clone());
        }
        agendas
    }

    /// Serialized read-modify-write of one agenda. The mutation runs on a
    /// draft and is committed only on success, so a failed operation leaves
    /// no partial slot-state change.
    pub async fn with_agenda<F, T>(&self, agenda_id: Uuid, f: F) -> Result<T, AgendaError>
    where
        F: FnOnce(&mut Agenda) -> Result<T, AgendaError>,
    {
        let handle = self.handle(agenda_id).await?;
        let mut agenda = handle.lock().await;

        let mut draft = agenda.clone();
        let out = f(&mut draft)?;
        *agenda = draft;
        Ok(out)
    }

    /// Like `with_agenda`, addressed by (doctor_id, date).
    pub async fn with_agenda_for_day<F, T>(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        f: F,
    ) -> Result<T, AgendaError>
    where
        F: FnOnce(&mut Agenda) -> Result<T, AgendaError>,
    {
        let handle = self.handle_for_day(doctor_id, date).await?;
        let mut agenda = handle.lock().await;

        let mut draft = agenda.clone();
        let out = f(&mut draft)?;
        *agenda = draft;
        Ok(out)
    }
}

impl Default for AgendaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSlot;
    use assert_matches::assert_matches;
    use chrono::NaiveTime;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn slot(h: u32) -> TimeSlot {
        TimeSlot::open(
            NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(h, 30, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn insert_enforces_one_agenda_per_doctor_day() {
        let store = AgendaStore::new();
        let doctor_id = Uuid::new_v4();

        store
            .insert(Agenda::new(doctor_id, date(2), vec![slot(9)]))
            .await
            .unwrap();

        let duplicate = store
            .insert(Agenda::new(doctor_id, date(2), vec![slot(10)]))
            .await;
        assert_matches!(duplicate, Err(AgendaError::DuplicateAgenda));

        // Same date, different doctor is fine.
        let other = store
            .insert(Agenda::new(Uuid::new_v4(), date(2), vec![slot(9)]))
            .await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn range_lookup_is_ascending_by_date() {
        let store = AgendaStore::new();
        let doctor_id = Uuid::new_v4();

        for d in [5, 2, 4] {
            store
                .insert(Agenda::new(doctor_id, date(d), vec![slot(9)]))
                .await
                .unwrap();
        }

        let agendas = store
            .find_by_doctor_and_range(doctor_id, date(1), date(30))
            .await
            .unwrap();
        let dates: Vec<NaiveDate> = agendas.iter().map(|a| a.date).collect();
        assert_eq!(dates, vec![date(2), date(4), date(5)]);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_agenda_untouched() {
        let store = AgendaStore::new();
        let doctor_id = Uuid::new_v4();
        let agenda = store
            .insert(Agenda::new(doctor_id, date(2), vec![slot(9)]))
            .await
            .unwrap();

        let result: Result<(), AgendaError> = store
            .with_agenda(agenda.id, |a| {
                a.time_slots.clear();
                Err(AgendaError::SlotUnavailable)
            })
            .await;
        assert_matches!(result, Err(AgendaError::SlotUnavailable));

        let reread = store.get(agenda.id).await.unwrap();
        assert_eq!(reread.time_slots.len(), 1);
    }

    #[tokio::test]
    async fn missing_agenda_is_not_found() {
        let store = AgendaStore::new();
        let result = store
            .find_by_doctor_and_date(Uuid::new_v4(), date(2))
            .await;
        assert_matches!(result, Err(AgendaError::AgendaNotFound));
    }
}
