use chrono::{Duration, Utc};
use mockall::predicate;
use parish_api::handlers::dashboard::dashboard_response;
use parish_core::{
    models::{booking::BookingStatus, dashboard::DASHBOARD_ITEMS, user::Role},
    slots::SlotPool,
};
use pretty_assertions::assert_eq;

use crate::test_utils::{db_booking_with_mass, db_event, db_payment, user, TestContext};

#[tokio::test]
async fn test_dashboard_collects_recent_items() {
    let mut ctx = TestContext::new();
    let parishioner = user(Role::Parishioner);
    let user_id = parishioner.id;
    let now = Utc::now();

    ctx.booking_repo
        .expect_list_user_bookings()
        .with(
            predicate::eq(user_id),
            predicate::eq(SlotPool::Intention),
            predicate::eq(Some(DASHBOARD_ITEMS)),
        )
        .returning(|user_id, _, _| {
            Ok(vec![db_booking_with_mass(user_id, "intention", "approved")])
        });
    ctx.booking_repo
        .expect_list_user_bookings()
        .with(
            predicate::eq(user_id),
            predicate::eq(SlotPool::Thanksgiving),
            predicate::eq(Some(DASHBOARD_ITEMS)),
        )
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.payment_repo
        .expect_list_user_payments()
        .returning(|user_id, _| Ok(vec![db_payment(user_id, "donation", "paid", 1_000, None)]));
    ctx.event_repo
        .expect_list_upcoming_events()
        .returning(move |_, _| {
            Ok(vec![
                db_event("Parish fiesta", now + Duration::days(5)),
                db_event("Youth retreat", now + Duration::days(12)),
            ])
        });

    let limit = Some(DASHBOARD_ITEMS);
    let intentions = ctx
        .booking_repo
        .list_user_bookings(user_id, SlotPool::Intention, limit)
        .await
        .unwrap();
    let thanksgivings = ctx
        .booking_repo
        .list_user_bookings(user_id, SlotPool::Thanksgiving, limit)
        .await
        .unwrap();
    let payments = ctx.payment_repo.list_user_payments(user_id, limit).await.unwrap();
    let events = ctx.event_repo.list_upcoming_events(now, limit).await.unwrap();

    let dashboard =
        dashboard_response(parishioner, intentions, thanksgivings, payments, events).unwrap();

    assert_eq!(dashboard.user.id, user_id);
    assert_eq!(dashboard.intentions.len(), 1);
    assert_eq!(dashboard.intentions[0].booking.status, BookingStatus::Approved);
    assert!(dashboard.thanksgivings.is_empty());
    assert_eq!(dashboard.payments[0].amount, 1_000);
    assert_eq!(
        dashboard.events.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
        vec!["Parish fiesta", "Youth retreat"]
    );
}

#[tokio::test]
async fn test_dashboard_rejects_unknown_payment_status() {
    let parishioner = user(Role::Parishioner);
    let broken = db_payment(parishioner.id, "donation", "refunded", 10, None);

    let result = dashboard_response(parishioner, Vec::new(), Vec::new(), vec![broken], Vec::new());

    assert!(result.is_err());
}
