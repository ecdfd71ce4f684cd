use chrono::{Duration, NaiveDate, Utc};
use mockall::predicate;
use parish_api::handlers::appointments::{ensure_can_cancel, free_slots};
use parish_core::{
    errors::ParishError,
    models::{
        appointment::{Appointment, AppointmentStatus},
        user::Role,
    },
    office_hours::OfficeHours,
};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{user, TestContext};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn appointment(user_id: Uuid) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        user_id,
        first_name: "Maria".to_string(),
        last_name: "Santos".to_string(),
        email: "maria@example.com".to_string(),
        phone: "+63 912 345 6789".to_string(),
        date: date(2030, 3, 4),
        time_slot: "10:00".to_string(),
        notes: None,
        status: AppointmentStatus::Pending,
        reason: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_taken_slots_are_removed() {
    let mut ctx = TestContext::new();
    let day = date(2030, 3, 4);

    ctx.appointment_repo
        .expect_taken_slots()
        .with(predicate::eq(day))
        .times(1)
        .returning(|_| Ok(vec!["09:00".to_string(), "13:00".to_string()]));

    let taken = ctx.appointment_repo.taken_slots(day).await.unwrap();
    let response = free_slots(&OfficeHours::default(), day, date(2030, 3, 1), &taken);

    assert_eq!(response.date, day);
    assert_eq!(
        response.slots,
        vec!["10:00", "11:00", "12:00", "14:00", "15:00", "16:00"]
    );
}

#[tokio::test]
async fn test_past_dates_have_no_slots() {
    let mut ctx = TestContext::new();
    let today = Utc::now().date_naive();
    let yesterday = today - Duration::days(1);

    ctx.appointment_repo
        .expect_taken_slots()
        .returning(|_| Ok(Vec::new()));

    let taken = ctx.appointment_repo.taken_slots(yesterday).await.unwrap();
    let response = free_slots(&OfficeHours::default(), yesterday, today, &taken);

    assert!(response.slots.is_empty());
}

#[tokio::test]
async fn test_today_still_offers_slots() {
    let today = date(2030, 3, 4);
    let hours = OfficeHours::new(9, 11).unwrap();

    let response = free_slots(&hours, today, today, &[]);

    assert_eq!(response.slots, vec!["09:00", "10:00"]);
}

#[test]
fn test_owner_can_cancel() {
    let owner = user(Role::Parishioner);
    assert!(ensure_can_cancel(&owner, &appointment(owner.id)).is_ok());
}

#[test]
fn test_admin_can_cancel_any_appointment() {
    let admin = user(Role::Admin);
    assert!(ensure_can_cancel(&admin, &appointment(Uuid::new_v4())).is_ok());
}

#[test]
fn test_other_parishioner_cannot_cancel() {
    let stranger = user(Role::Parishioner);
    assert!(matches!(
        ensure_can_cancel(&stranger, &appointment(Uuid::new_v4())),
        Err(ParishError::Authorization(_))
    ));
}

#[tokio::test]
async fn test_own_appointments_listing() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();

    ctx.appointment_repo
        .expect_list_user_appointments()
        .with(predicate::eq(user_id))
        .returning(|user_id| {
            Ok(vec![parish_db::models::DbAppointment {
                id: Uuid::new_v4(),
                user_id,
                first_name: "Maria".to_string(),
                last_name: "Santos".to_string(),
                email: "maria@example.com".to_string(),
                phone: "+63 912 345 6789".to_string(),
                date: NaiveDate::from_ymd_opt(2030, 3, 4).unwrap(),
                time_slot: "10:00".to_string(),
                notes: Some("Baptism paperwork".to_string()),
                status: "cancelled".to_string(),
                reason: None,
                created_at: Utc::now(),
            }])
        });

    let rows = ctx.appointment_repo.list_user_appointments(user_id).await.unwrap();
    let appointments: Vec<Appointment> = parish_db::models::convert_all(rows).unwrap();

    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].status, AppointmentStatus::Cancelled);
    assert!(!appointments[0].status.holds_slot());
}
