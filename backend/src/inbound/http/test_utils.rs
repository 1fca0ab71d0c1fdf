//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::HttpResponse;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;

use crate::domain::ports::{
    MockAllocationCommand, MockAllocationQuery, MockInventoryCommand, MockInventoryQuery,
    MockLoginService, MockRegistrationService, MockSessionRegistry, MockUsersQuery,
};
use crate::domain::{Error, SessionPrincipal, SessionToken, UserId, Username};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Path of the route registered by tests that need a session cookie.
pub const SEED_SESSION_PATH: &str = "/__test/session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// State whose ports are mocks without expectations.
///
/// Tests replace the ports they exercise; any call to another port panics,
/// which proves a rejected request never reached a service.
pub fn unreachable_state() -> HttpState {
    HttpState {
        login: Arc::new(MockLoginService::new()),
        registration: Arc::new(MockRegistrationService::new()),
        users: Arc::new(MockUsersQuery::new()),
        inventory: Arc::new(MockInventoryCommand::new()),
        inventory_query: Arc::new(MockInventoryQuery::new()),
        allocations: Arc::new(MockAllocationCommand::new()),
        allocations_query: Arc::new(MockAllocationQuery::new()),
        sessions: Arc::new(MockSessionRegistry::new()),
    }
}

/// Principal for tests; admins get id 1, everyone else id 2.
pub fn principal(name: &str, is_admin: bool) -> SessionPrincipal {
    SessionPrincipal {
        user_id: UserId::new(if is_admin { 1 } else { 2 }).expect("user id"),
        username: Username::new(name).expect("username"),
        is_admin,
    }
}

/// Replace the session registry with one resolving every token to `principal`.
pub fn signed_in_as(mut state: HttpState, principal: SessionPrincipal) -> HttpState {
    let mut sessions = MockSessionRegistry::new();
    sessions
        .expect_resolve()
        .returning(move |_| Ok(Some(principal.clone())));
    state.sessions = Arc::new(sessions);
    state
}

/// Handler for [`SEED_SESSION_PATH`] storing a fixed token in the cookie.
pub async fn seed_session(session: SessionContext) -> Result<HttpResponse, Error> {
    let token = SessionToken::new("test-session").expect("token");
    session.persist_token(&token)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Call [`SEED_SESSION_PATH`] and return the issued session cookie.
pub async fn seeded_cookie<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri(SEED_SESSION_PATH)
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}
