use parish_api::handlers::payments::payment_overview;
use parish_core::models::payment::Payment;
use parish_db::models::convert_all;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{db_goal_with_raised, db_payment, TestContext};

#[tokio::test]
async fn test_overview_counts_paid_payments_only() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();

    ctx.payment_repo.expect_list_all_payments().times(1).returning(move || {
        Ok(vec![
            db_payment(user_id, "donation", "paid", 1_500, Some("Church Renovation")),
            db_payment(user_id, "donation", "paid", 500, Some("Church Renovation")),
            db_payment(user_id, "donation", "paid", 250, Some("Feeding Program")),
            db_payment(user_id, "donation", "unpaid", 9_000, Some("Feeding Program")),
            db_payment(user_id, "offering", "paid", 100, None),
            db_payment(user_id, "offering", "failed", 300, None),
        ])
    });
    ctx.payment_repo
        .expect_list_goals_with_raised()
        .times(1)
        .returning(|| Ok(Vec::new()));

    let rows = ctx.payment_repo.list_all_payments().await.unwrap();
    let payments: Vec<Payment> = convert_all(rows).unwrap();
    let goals = ctx.payment_repo.list_goals_with_raised().await.unwrap();
    let overview = payment_overview(&payments, goals);

    assert_eq!(overview.summary.total_donations, 2_250);
    assert_eq!(overview.summary.total_offerings, 100);
    assert_eq!(overview.summary.by_category.get("Church Renovation"), Some(&2_000));
    assert_eq!(overview.summary.by_category.get("Feeding Program"), Some(&250));
    assert_eq!(overview.summary.unpaid_count, 1);
    assert_eq!(overview.summary.failed_count, 1);
    assert!(overview.goals.is_empty());
}

#[tokio::test]
async fn test_goal_progress_is_capped() {
    let mut ctx = TestContext::new();

    ctx.payment_repo.expect_list_goals_with_raised().returning(|| {
        Ok(vec![
            db_goal_with_raised("New roof", 200_000, 50_000),
            db_goal_with_raised("Bells", 10_000, 12_500),
        ])
    });

    let goals = ctx.payment_repo.list_goals_with_raised().await.unwrap();
    let overview = payment_overview(&[], goals);

    assert_eq!(overview.goals.len(), 2);
    assert_eq!(overview.goals[0].progress.percent, 25);
    assert!(!overview.goals[0].progress.is_reached());
    assert_eq!(overview.goals[1].progress.percent, 100);
    assert!(overview.goals[1].progress.is_reached());
}

#[tokio::test]
async fn test_own_payments_are_limited() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();

    ctx.payment_repo
        .expect_list_user_payments()
        .with(
            mockall::predicate::eq(user_id),
            mockall::predicate::eq(Some(3)),
        )
        .returning(|user_id, _| Ok(vec![db_payment(user_id, "offering", "unpaid", 50, None)]));

    let rows = ctx
        .payment_repo
        .list_user_payments(user_id, Some(3))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "unpaid");
}
