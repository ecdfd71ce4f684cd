use axum::http::StatusCode;
use mockall::predicate;
use parish_api::middleware::error_handling::AppError;
use parish_core::models::user::{Role, UpdateProfileRequest, User};
use parish_db::{models::DbUser, repositories::users::email_taken};
use pretty_assertions::assert_eq;

use crate::test_utils::{user, TestContext};

fn stored(user: &User, phone: Option<&str>) -> DbUser {
    DbUser {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        phone: phone.map(str::to_string),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        role: user.role.as_str().to_string(),
        is_blocked: false,
        created_at: user.created_at,
    }
}

#[tokio::test]
async fn test_duplicate_email_on_insert_is_a_conflict() {
    let mut ctx = TestContext::new();

    ctx.user_repo
        .expect_create_user()
        .times(1)
        .returning(|_, _, _, _, _| Err(email_taken()));

    let error = ctx
        .user_repo
        .create_user(
            "Maria Santos".to_string(),
            "maria@example.com".to_string(),
            None,
            "hash".to_string(),
            Role::Parishioner,
        )
        .await
        .map_err(AppError::from)
        .unwrap_err();

    assert_eq!(error.status(), StatusCode::CONFLICT);
    assert_eq!(
        error.0.to_string(),
        "Conflict: An account with this email already exists"
    );
}

#[tokio::test]
async fn test_profile_update_returns_stored_user() {
    let mut ctx = TestContext::new();
    let current = user(Role::Parishioner);
    let row = stored(&current, Some("+63 912 345 6789"));

    ctx.user_repo
        .expect_update_user_profile()
        .with(predicate::eq(current.id), predicate::always())
        .times(1)
        .returning(move |_, _| Ok(Some(row.clone())));

    let request = UpdateProfileRequest {
        name: None,
        phone: Some("+63 912 345 6789".to_string()),
    };
    assert!(request.validate().is_ok());

    let updated = ctx
        .user_repo
        .update_user_profile(current.id, request)
        .await
        .unwrap()
        .map(User::try_from)
        .transpose()
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, current.id);
    assert_eq!(updated.phone.as_deref(), Some("+63 912 345 6789"));
    assert_eq!(updated.role, Role::Parishioner);
}

#[test]
fn test_profile_update_rejects_short_name() {
    let request = UpdateProfileRequest {
        name: Some("M".to_string()),
        phone: None,
    };

    let error = AppError::from(request.validate().unwrap_err());
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
}
