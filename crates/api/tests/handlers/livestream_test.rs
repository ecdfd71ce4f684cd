use chrono::{Duration, Utc};
use parish_api::handlers::livestream::{build_livestream, LIVESTREAM_HISTORY_DAYS};
use parish_core::live::{LiveFilter, LiveStatus};
use pretty_assertions::assert_eq;

use crate::test_utils::{db_mass, TestContext};

fn with_stream(mut mass: parish_db::models::DbMass, url: &str) -> parish_db::models::DbMass {
    mass.livestream_url = Some(url.to_string());
    mass
}

#[tokio::test]
async fn test_featured_stream_is_the_live_mass() {
    let mut ctx = TestContext::new();
    let now = Utc::now();

    ctx.mass_repo
        .expect_list_masses_since_desc()
        .times(1)
        .returning(move |_| {
            Ok(vec![
                with_stream(
                    db_mass(now + Duration::days(1), 5, 5),
                    "https://www.youtube.com/watch?v=upcoming01",
                ),
                with_stream(
                    db_mass(now - Duration::minutes(10), 5, 5),
                    "https://youtu.be/livenow123",
                ),
                db_mass(now - Duration::days(3), 5, 5),
            ])
        });

    let rows = ctx
        .mass_repo
        .list_masses_since_desc(now - Duration::days(LIVESTREAM_HISTORY_DAYS))
        .await
        .unwrap();
    let response = build_livestream(rows, LiveFilter::All, now).unwrap();

    assert_eq!(response.masses.len(), 3);
    let featured = response.featured.expect("a live stream is featured");
    assert_eq!(featured.live_status, LiveStatus::Live);
    assert_eq!(
        featured.embed_url.as_deref(),
        Some("https://www.youtube.com/embed/livenow123")
    );
}

#[tokio::test]
async fn test_filter_keeps_matching_masses_only() {
    let mut ctx = TestContext::new();
    let now = Utc::now();

    ctx.mass_repo.expect_list_masses_since_desc().returning(move |_| {
        Ok(vec![
            db_mass(now + Duration::days(2), 5, 5),
            db_mass(now + Duration::minutes(30), 5, 5),
            db_mass(now - Duration::days(1), 5, 5),
            db_mass(now - Duration::days(2), 5, 5),
        ])
    });

    let rows = ctx.mass_repo.list_masses_since_desc(now).await.unwrap();
    let response = build_livestream(rows, LiveFilter::Past, now).unwrap();

    assert_eq!(response.masses.len(), 2);
    assert!(response
        .masses
        .iter()
        .all(|entry| entry.live_status == LiveStatus::Past));
}

#[tokio::test]
async fn test_live_mass_without_stream_is_not_featured() {
    let mut ctx = TestContext::new();
    let now = Utc::now();

    ctx.mass_repo
        .expect_list_masses_since_desc()
        .returning(move |_| Ok(vec![db_mass(now, 5, 5)]));

    let rows = ctx.mass_repo.list_masses_since_desc(now).await.unwrap();
    let response = build_livestream(rows, LiveFilter::Live, now).unwrap();

    assert_eq!(response.masses.len(), 1);
    assert!(response.featured.is_none());
}
