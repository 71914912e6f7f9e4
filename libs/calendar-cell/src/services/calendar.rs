use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{CalendarDay, CalendarError};

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Registry of calendar dates and their working-day/holiday status. Backing
/// collection is ordered by date, so every listing comes out ascending.
pub struct CalendarService {
    days: RwLock<BTreeMap<NaiveDate, CalendarDay>>,
}

impl CalendarService {
    pub fn new() -> Self {
        Self {
            days: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a CalendarDay for every date in the inclusive range that does
    /// not have one yet. Weekends default to holidays. Idempotent: existing
    /// entries are left untouched. Returns the newly created days.
    pub async fn ensure_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<CalendarDay>, CalendarError> {
        if start_date > end_date {
            return Err(CalendarError::InvalidRange);
        }

        let mut days = self.days.write().await;
        let mut created = Vec::new();

        for date in start_date.iter_days().take_while(|d| *d <= end_date) {
            if days.contains_key(&date) {
                continue;
            }

            let weekend = is_weekend(date);
            let day = CalendarDay {
                date,
                is_holiday: weekend,
                description: if weekend {
                    "Weekend".to_string()
                } else {
                    String::new()
                },
            };
            days.insert(date, day.clone());
            created.push(day);
        }

        debug!(
            "Base calendar ensured for {}..={}: {} new days",
            start_date,
            end_date,
            created.len()
        );
        Ok(created)
    }

    /// Upsert a holiday: an existing entry for the date is overwritten with
    /// the holiday flag and description, a missing one is created.
    pub async fn mark_holiday(&self, date: NaiveDate, description: String) -> CalendarDay {
        let mut days = self.days.write().await;

        let day = days.entry(date).or_insert_with(|| CalendarDay {
            date,
            is_holiday: true,
            description: String::new(),
        });
        day.is_holiday = true;
        day.description = description;

        debug!("Holiday marked on {}: {}", date, day.description);
        day.clone()
    }

    /// All registered days in the inclusive range, ascending by date.
    pub async fn list_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<CalendarDay>, CalendarError> {
        if start_date > end_date {
            return Err(CalendarError::InvalidRange);
        }

        let days = self.days.read().await;
        Ok(days.range(start_date..=end_date).map(|(_, d)| d.clone()).collect())
    }

    /// Non-holiday days in the inclusive range, ascending by date. This is
    /// the agenda generator's input.
    pub async fn list_working_days(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<CalendarDay>, CalendarError> {
        let days = self.list_range(start_date, end_date).await?;
        Ok(days.into_iter().filter(|d| !d.is_holiday).collect())
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new()
    }
}
