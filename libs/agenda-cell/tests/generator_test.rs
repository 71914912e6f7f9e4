use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};

use agenda_cell::models::AgendaError;
use agenda_cell::services::generator::AgendaGenerationService;
use agenda_cell::services::store::AgendaStore;
use calendar_cell::services::calendar::CalendarService;
use doctor_cell::models::{AvailabilityWindow, CreateDoctorRequest, DayOfWeek};
use doctor_cell::services::doctor::DoctorService;
use shared_utils::test_utils::TestConfig;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

struct Fixture {
    calendar: Arc<CalendarService>,
    doctors: Arc<DoctorService>,
    agendas: Arc<AgendaStore>,
    generator: AgendaGenerationService,
}

fn fixture() -> Fixture {
    let config = TestConfig::default().to_arc();
    let calendar = Arc::new(CalendarService::new());
    let doctors = Arc::new(DoctorService::new());
    let agendas = Arc::new(AgendaStore::new());
    let generator = AgendaGenerationService::new(
        config,
        calendar.clone(),
        doctors.clone(),
        agendas.clone(),
    );
    Fixture {
        calendar,
        doctors,
        agendas,
        generator,
    }
}

async fn register_doctor(fixture: &Fixture, windows: Vec<AvailabilityWindow>) -> Uuid {
    let doctor = fixture
        .doctors
        .create_doctor(CreateDoctorRequest {
            name: "Dr. Rojas".to_string(),
            specialty: "General".to_string(),
            user_id: None,
        })
        .await;
    if !windows.is_empty() {
        fixture.doctors.add_windows(doctor.id, windows).await.unwrap();
    }
    doctor.id
}

#[tokio::test]
async fn monday_window_yields_two_half_hour_slots() {
    let fixture = fixture();
    // Week of 2025-06-02 (Monday) through 2025-06-08 (Sunday).
    fixture
        .calendar
        .ensure_range(date(2025, 6, 2), date(2025, 6, 8))
        .await
        .unwrap();

    let doctor_id = register_doctor(
        &fixture,
        vec![AvailabilityWindow {
            day_of_week: DayOfWeek::Monday,
            start_time: time(9, 0),
            end_time: time(10, 0),
        }],
    )
    .await;

    let created = fixture
        .generator
        .generate(doctor_id, date(2025, 6, 2), date(2025, 6, 8))
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    let agenda = &created[0];
    assert_eq!(agenda.date, date(2025, 6, 2));
    assert_eq!(agenda.time_slots.len(), 2);
    assert_eq!(agenda.time_slots[0].start_time, time(9, 0));
    assert_eq!(agenda.time_slots[0].end_time, time(9, 30));
    assert_eq!(agenda.time_slots[1].start_time, time(9, 30));
    assert_eq!(agenda.time_slots[1].end_time, time(10, 0));
    assert!(agenda
        .time_slots
        .iter()
        .all(|s| !s.is_reserved && !s.is_attended && s.patient_id.is_none()));
}

#[tokio::test]
async fn one_agenda_per_eligible_working_day() {
    let fixture = fixture();
    // Two full weeks.
    fixture
        .calendar
        .ensure_range(date(2025, 6, 2), date(2025, 6, 15))
        .await
        .unwrap();

    let doctor_id = register_doctor(
        &fixture,
        vec![
            AvailabilityWindow {
                day_of_week: DayOfWeek::Monday,
                start_time: time(9, 0),
                end_time: time(12, 0),
            },
            AvailabilityWindow {
                day_of_week: DayOfWeek::Thursday,
                start_time: time(14, 0),
                end_time: time(17, 0),
            },
        ],
    )
    .await;

    let created = fixture
        .generator
        .generate(doctor_id, date(2025, 6, 2), date(2025, 6, 15))
        .await
        .unwrap();

    // Two Mondays and two Thursdays.
    assert_eq!(created.len(), 4);
    assert!(created.windows(2).all(|w| w[0].date < w[1].date));
    for agenda in &created {
        assert_eq!(agenda.time_slots.len(), 6);
        for pair in agenda.time_slots.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
    }
}

#[tokio::test]
async fn holidays_and_windowless_days_produce_no_agenda() {
    let fixture = fixture();
    fixture
        .calendar
        .ensure_range(date(2025, 6, 2), date(2025, 6, 8))
        .await
        .unwrap();
    // The Monday becomes a holiday.
    fixture
        .calendar
        .mark_holiday(date(2025, 6, 2), "National holiday".to_string())
        .await;

    let doctor_id = register_doctor(
        &fixture,
        vec![AvailabilityWindow {
            day_of_week: DayOfWeek::Monday,
            start_time: time(9, 0),
            end_time: time(12, 0),
        }],
    )
    .await;

    let created = fixture
        .generator
        .generate(doctor_id, date(2025, 6, 2), date(2025, 6, 8))
        .await
        .unwrap();

    // Monday is a holiday and no other weekday has a window.
    assert!(created.is_empty());
}

#[tokio::test]
async fn regeneration_over_overlapping_range_is_idempotent() {
    let fixture = fixture();
    fixture
        .calendar
        .ensure_range(date(2025, 6, 2), date(2025, 6, 15))
        .await
        .unwrap();

    let doctor_id = register_doctor(
        &fixture,
        vec![AvailabilityWindow {
            day_of_week: DayOfWeek::Monday,
            start_time: time(9, 0),
            end_time: time(10, 0),
        }],
    )
    .await;

    let first = fixture
        .generator
        .generate(doctor_id, date(2025, 6, 2), date(2025, 6, 8))
        .await
        .unwrap();
    assert_eq!(first.len(), 1);

    // Overlapping rerun: the already-covered Monday is skipped, the second
    // Monday is new.
    let second = fixture
        .generator
        .generate(doctor_id, date(2025, 6, 2), date(2025, 6, 15))
        .await
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].date, date(2025, 6, 9));

    let all = fixture
        .agendas
        .find_by_doctor_and_range(doctor_id, date(2025, 6, 1), date(2025, 6, 30))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn unknown_doctor_aborts_before_any_write() {
    let fixture = fixture();
    fixture
        .calendar
        .ensure_range(date(2025, 6, 2), date(2025, 6, 8))
        .await
        .unwrap();

    let result = fixture
        .generator
        .generate(Uuid::new_v4(), date(2025, 6, 2), date(2025, 6, 8))
        .await;

    assert_matches!(result, Err(AgendaError::DoctorNotFound));
    assert!(fixture.agendas.all().await.is_empty());
}

#[tokio::test]
async fn uneven_window_drops_trailing_partial_slot() {
    let fixture = fixture();
    fixture
        .calendar
        .ensure_range(date(2025, 6, 2), date(2025, 6, 2))
        .await
        .unwrap();

    let doctor_id = register_doctor(
        &fixture,
        vec![AvailabilityWindow {
            day_of_week: DayOfWeek::Monday,
            start_time: time(9, 0),
            end_time: time(10, 45),
        }],
    )
    .await;

    let created = fixture
        .generator
        .generate(doctor_id, date(2025, 6, 2), date(2025, 6, 2))
        .await
        .unwrap();

    let agenda = &created[0];
    assert_eq!(agenda.time_slots.len(), 3);
    assert_eq!(agenda.time_slots.last().unwrap().end_time, time(10, 30));
}
