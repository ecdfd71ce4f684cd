use mockall::predicate;
use parish_api::handlers::{
    admin::{ensure_manageable_admin, ensure_parishioner, PARISHIONER_TABLE_LIMIT},
    auth::registration_role,
};
use parish_core::{
    errors::ParishError,
    models::user::{Role, User},
    pagination::{Page, PageRequest, Paginated},
};
use parish_db::models::{convert_all, DbUser};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::test_utils::{user, TestContext};

fn db_user(role: Role) -> DbUser {
    let user = user(role);
    DbUser {
        id: user.id,
        name: user.name,
        email: user.email,
        phone: user.phone,
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        role: role.as_str().to_string(),
        is_blocked: false,
        created_at: user.created_at,
    }
}

#[rstest]
#[case("priest@parish.example", Role::Superadmin)]
#[case("  PRIEST@parish.example ", Role::Superadmin)]
#[case("maria@example.com", Role::Parishioner)]
fn test_registration_role(#[case] email: &str, #[case] expected: Role) {
    assert_eq!(
        registration_role(email, Some("priest@parish.example")),
        expected
    );
}

#[test]
fn test_without_configured_superadmin_everyone_is_a_parishioner() {
    assert_eq!(
        registration_role("priest@parish.example", None),
        Role::Parishioner
    );
}

#[rstest]
#[case(Role::Parishioner, true)]
#[case(Role::Admin, false)]
#[case(Role::Superadmin, false)]
fn test_only_parishioners_can_be_blocked(#[case] role: Role, #[case] allowed: bool) {
    assert_eq!(ensure_parishioner(&user(role)).is_ok(), allowed);
}

#[test]
fn test_superadmins_manage_admins_only() {
    assert!(ensure_manageable_admin(&user(Role::Admin)).is_ok());
    assert!(matches!(
        ensure_manageable_admin(&user(Role::Superadmin)),
        Err(ParishError::Authorization(_))
    ));
    assert!(matches!(
        ensure_manageable_admin(&user(Role::Parishioner)),
        Err(ParishError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_parishioner_page() {
    let mut ctx = TestContext::new();
    let page = Page::new(
        PageRequest {
            page: Some(3),
            limit: None,
        },
        PARISHIONER_TABLE_LIMIT,
    );

    ctx.user_repo
        .expect_count_users_by_roles()
        .with(predicate::eq(vec![Role::Parishioner]))
        .returning(|_| Ok(95));
    ctx.user_repo
        .expect_list_users_by_roles()
        .with(
            predicate::eq(vec![Role::Parishioner]),
            predicate::eq(20),
            predicate::eq(10),
        )
        .returning(|_, _, limit| Ok((0..limit).map(|_| db_user(Role::Parishioner)).collect()));

    let total = ctx
        .user_repo
        .count_users_by_roles(vec![Role::Parishioner])
        .await
        .unwrap();
    let rows = ctx
        .user_repo
        .list_users_by_roles(vec![Role::Parishioner], page.offset(), page.limit())
        .await
        .unwrap();
    let users: Vec<User> = convert_all(rows).unwrap();
    let paginated = Paginated::new(users, page, u64::try_from(total).unwrap());

    assert_eq!(paginated.items.len(), 10);
    assert_eq!(paginated.total_pages, 10);
    assert_eq!(paginated.page, 3);
    assert!(paginated.items.iter().all(|u| u.role == Role::Parishioner));
}

#[tokio::test]
async fn test_session_lookup_for_unknown_token() {
    let mut ctx = TestContext::new();
    let token = "expired-token".to_string();

    ctx.user_repo
        .expect_get_user_by_session()
        .with(predicate::eq(token.clone()))
        .returning(|_| Ok(None));

    assert!(ctx
        .user_repo
        .get_user_by_session(token)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_stored_user_conversion() {
    let mut ctx = TestContext::new();
    let row = db_user(Role::Admin);
    let id = row.id;

    ctx.user_repo
        .expect_get_user_by_email()
        .returning(move |_| Ok(Some(row.clone())));

    let found = ctx
        .user_repo
        .get_user_by_email("maria@example.com".to_string())
        .await
        .unwrap()
        .map(User::try_from)
        .transpose()
        .unwrap()
        .unwrap();

    assert_eq!(found.id, id);
    assert!(found.role.is_admin());
    assert!(!found.role.is_superadmin());
}
