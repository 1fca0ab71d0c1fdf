//! Tests for the identity service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockCredentialHasher, MockUserRepository};
use crate::domain::{ErrorCode, PasswordHash, StoredUser, UserId};

fn user(id: i32, name: &str, is_admin: bool) -> User {
    User::new(
        UserId::new(id).expect("user id"),
        Username::new(name).expect("username"),
        is_admin,
    )
}

fn stored(id: i32, name: &str, is_admin: bool) -> StoredUser {
    StoredUser {
        user: user(id, name, is_admin),
        password_hash: PasswordHash::new("hashed"),
    }
}

fn service(
    repo: MockUserRepository,
    hasher: MockCredentialHasher,
) -> IdentityService<MockUserRepository, MockCredentialHasher> {
    IdentityService::new(Arc::new(repo), Arc::new(hasher))
}

#[rstest]
#[tokio::test]
async fn authenticate_returns_principal_for_valid_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(Some(stored(1, "admin", true))));
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_verify().times(1).return_once(|_, _| Ok(true));

    let creds = LoginCredentials::try_from_parts("admin", "admin_password").expect("creds");
    let principal = service(repo, hasher)
        .authenticate(&creds)
        .await
        .expect("login succeeds");

    assert_eq!(principal.user_id.get(), 1);
    assert_eq!(principal.username.as_ref(), "admin");
    assert!(principal.is_admin);
}

#[rstest]
#[case(Some(stored(2, "alice", false)), false)]
#[case(None, false)]
#[tokio::test]
async fn authenticate_rejects_unknown_user_and_wrong_password_alike(
    #[case] found: Option<StoredUser>,
    #[case] verified: bool,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(move |_| Ok(found));
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_verify().returning(move |_, _| Ok(verified));

    let creds = LoginCredentials::try_from_parts("alice", "wrong").expect("creds");
    let error = service(repo, hasher)
        .authenticate(&creds)
        .await
        .expect_err("login fails");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "Invalid username or password");
}

#[rstest]
#[tokio::test]
async fn authenticate_rejects_overlong_username_without_lookup() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().times(0);
    let hasher = MockCredentialHasher::new();

    let creds = LoginCredentials::try_from_parts(&"a".repeat(80), "pw").expect("creds");
    let error = service(repo, hasher)
        .authenticate(&creds)
        .await
        .expect_err("login fails");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn register_creates_non_admin_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_create()
        .withf(|new_user| !new_user.is_admin && new_user.password_hash.as_ref() == "hashed:pw")
        .times(1)
        .return_once(|new_user| Ok(User::new(UserId::new(5).expect("id"), new_user.username.clone(), false)));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|password| Ok(PasswordHash::new(format!("hashed:{password}"))));

    let registration = Registration::try_from_parts("bob", "pw").expect("registration");
    let created = service(repo, hasher)
        .register(&registration)
        .await
        .expect("register succeeds");

    assert_eq!(created.id().get(), 5);
    assert!(!created.is_admin());
}

#[rstest]
#[tokio::test]
async fn register_conflicts_on_existing_username() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(Some(stored(3, "alice", false))));
    repo.expect_create().times(0);
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_hash().times(0);

    let registration = Registration::try_from_parts("alice", "pw2").expect("registration");
    let error = service(repo, hasher)
        .register(&registration)
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "User already exists");
}

#[rstest]
#[tokio::test]
async fn register_maps_unique_violation_to_conflict() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().return_once(|_| Ok(None));
    repo.expect_create()
        .return_once(|_| Err(UserPersistenceError::duplicate_username("alice")));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(PasswordHash::new("hashed")));

    let registration = Registration::try_from_parts("alice", "pw").expect("registration");
    let error = service(repo, hasher)
        .register(&registration)
        .await
        .expect_err("duplicate");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn repository_failures_surface_as_internal_errors() {
    let mut repo = MockUserRepository::new();
    repo.expect_list_non_admin()
        .return_once(|| Err(UserPersistenceError::connection("pool exhausted")));

    let error = service(repo, MockCredentialHasher::new())
        .list_non_admin_users()
        .await
        .expect_err("repository failure");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn bootstrap_admin_creates_account_once() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_create()
        .withf(|new_user| new_user.is_admin && new_user.username.as_ref() == "admin")
        .times(1)
        .return_once(|new_user| Ok(User::new(UserId::new(1).expect("id"), new_user.username.clone(), true)));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(PasswordHash::new("hashed")));

    let username = Username::new("admin").expect("username");
    let outcome = service(repo, hasher)
        .bootstrap_admin(&username, "admin_password")
        .await
        .expect("bootstrap");
    assert_eq!(outcome, AdminBootstrap::Created);
}

#[rstest]
#[tokio::test]
async fn bootstrap_admin_skips_existing_account() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(Some(stored(1, "admin", true))));
    repo.expect_create().times(0);
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_hash().times(0);

    let username = Username::new("admin").expect("username");
    let outcome = service(repo, hasher)
        .bootstrap_admin(&username, "admin_password")
        .await
        .expect("bootstrap");
    assert_eq!(outcome, AdminBootstrap::AlreadyPresent);
}
