//! Access-control extractors.
//!
//! Handlers declare their access requirement through their argument list:
//! [`AuthenticatedUser`] for any signed-in caller and [`AdminUser`] for
//! administrative routes. Both resolve before the handler body runs, so a
//! rejected request never reaches a domain service.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::{Error, SessionPrincipal, SessionToken};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub(crate) const LOGIN_REQUIRED: &str = "Authentication required";
pub(crate) const ADMIN_REQUIRED: &str = "Admin access required";

/// Resolve the principal behind the request's session cookie.
///
/// Returns `Ok(None)` for anonymous callers and for stale tokens; stale
/// tokens are also purged from the cookie.
pub(crate) async fn resolve_principal(
    session: &SessionContext,
    state: &HttpState,
) -> Result<Option<(SessionToken, SessionPrincipal)>, Error> {
    let Some(token) = session.token()? else {
        return Ok(None);
    };
    let principal = state
        .sessions
        .resolve(&token)
        .await
        .map_err(|err| Error::internal(format!("session lookup failed: {err}")))?;
    match principal {
        Some(principal) => Ok(Some((token, principal))),
        None => {
            debug!("session token no longer valid; clearing cookie");
            session.clear();
            Ok(None)
        }
    }
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))
}

/// Caller with an open session.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub principal: SessionPrincipal,
    pub token: SessionToken,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let state = http_state(req);
        Box::pin(async move {
            let session = session.await?;
            let state = state?;
            let (token, principal) = resolve_principal(&session, &state)
                .await?
                .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED))?;
            Ok(Self { principal, token })
        })
    }
}

/// Caller with an open session whose account carries the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl AdminUser {
    /// Principal of the admin making the request.
    pub fn principal(&self) -> &SessionPrincipal {
        &self.0.principal
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = AuthenticatedUser::from_request(req, payload);
        let path = req.path().to_owned();
        Box::pin(async move {
            let user = user.await?;
            if !user.principal.is_admin {
                warn!(
                    user_id = %user.principal.user_id,
                    path = %path,
                    "non-admin request to admin route rejected"
                );
                return Err(Error::forbidden(ADMIN_REQUIRED));
            }
            Ok(Self(user))
        })
    }
}
