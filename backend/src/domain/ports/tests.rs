//! Regression coverage for port error rendering.
use super::*;
use rstest::rstest;

#[rstest]
#[case(
    AllocationRepositoryError::insufficient_stock(7),
    "not enough stock available for inventory item 7"
)]
#[case(AllocationRepositoryError::unknown_user(3), "user 3 does not exist")]
#[case(
    AllocationRepositoryError::query("deadlock detected"),
    "allocation repository query failed: deadlock detected"
)]
fn allocation_errors_render_context(
    #[case] error: AllocationRepositoryError,
    #[case] expected: &str,
) {
    assert_eq!(error.to_string(), expected);
}

#[rstest]
fn duplicate_username_names_the_user() {
    let error = UserPersistenceError::duplicate_username("alice");
    assert_eq!(error.to_string(), "username alice already exists");
}

#[rstest]
fn session_errors_render_context() {
    let error = SessionRegistryError::token_generation("entropy unavailable");
    assert_eq!(
        error.to_string(),
        "session token generation failed: entropy unavailable"
    );
}
