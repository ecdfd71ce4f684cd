use chrono::{Duration, Utc};
use mockall::predicate;
use parish_api::handlers::masses::{mass_response, mass_responses};
use parish_core::live::LiveStatus;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{db_mass, db_mass_with_counts, TestContext};

#[tokio::test]
async fn test_list_reports_availability_per_pool() {
    let mut ctx = TestContext::new();
    let now = Utc::now();
    let from = now - Duration::minutes(60);

    ctx.mass_repo
        .expect_list_masses_from()
        .with(predicate::eq(from))
        .times(1)
        .returning(move |_| {
            Ok(vec![
                db_mass_with_counts(db_mass(now + Duration::days(1), 10, 5), 4, 5),
                db_mass_with_counts(db_mass(now + Duration::days(8), 3, 3), 0, 1),
            ])
        });

    let rows = ctx.mass_repo.list_masses_from(from).await.unwrap();
    let masses = mass_responses(rows, now).unwrap();

    assert_eq!(masses.len(), 2);
    assert_eq!(masses[0].availability.intentions.available, 6);
    assert_eq!(masses[0].availability.thanksgivings.available, 0);
    assert_eq!(masses[1].availability.intentions.available, 3);
    assert_eq!(masses[1].availability.thanksgivings.available, 2);
    assert!(masses.iter().all(|m| m.live_status == LiveStatus::Upcoming));
}

#[tokio::test]
async fn test_over_booked_mass_is_clamped_not_rejected() {
    let mut ctx = TestContext::new();
    let now = Utc::now();
    let id = Uuid::new_v4();

    ctx.mass_repo
        .expect_get_mass_with_counts()
        .with(predicate::eq(id))
        .returning(move |id| {
            let mut mass = db_mass(now + Duration::hours(3), 2, 4);
            mass.id = id;
            Ok(Some(db_mass_with_counts(mass, 5, 0)))
        });

    let row = ctx.mass_repo.get_mass_with_counts(id).await.unwrap().unwrap();
    let response = mass_response(row, now).unwrap();

    assert_eq!(response.mass.id, id);
    assert_eq!(response.availability.intentions.available, 0);
    assert_eq!(response.availability.intentions.over_booked_by, 3);
    assert_eq!(response.availability.thanksgivings.available, 4);
}

#[tokio::test]
async fn test_mass_inside_live_window_is_live() {
    let mut ctx = TestContext::new();
    let now = Utc::now();

    ctx.mass_repo.expect_list_masses_from().returning(move |_| {
        Ok(vec![
            db_mass_with_counts(db_mass(now - Duration::minutes(30), 5, 5), 0, 0),
            db_mass_with_counts(db_mass(now + Duration::minutes(60), 5, 5), 0, 0),
            db_mass_with_counts(db_mass(now + Duration::minutes(61), 5, 5), 0, 0),
        ])
    });

    let rows = ctx.mass_repo.list_masses_from(now).await.unwrap();
    let statuses: Vec<_> = mass_responses(rows, now)
        .unwrap()
        .into_iter()
        .map(|m| m.live_status)
        .collect();

    assert_eq!(
        statuses,
        vec![LiveStatus::Live, LiveStatus::Live, LiveStatus::Upcoming]
    );
}

#[tokio::test]
async fn test_corrupt_status_column_is_an_error() {
    let mut ctx = TestContext::new();
    let now = Utc::now();

    ctx.mass_repo.expect_list_masses_from().returning(move |_| {
        let mut mass = db_mass(now, 1, 1);
        mass.status = "postponed".to_string();
        Ok(vec![db_mass_with_counts(mass, 0, 0)])
    });

    let rows = ctx.mass_repo.list_masses_from(now).await.unwrap();
    let error = mass_responses(rows, now).unwrap_err();

    assert_eq!(
        error.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}
