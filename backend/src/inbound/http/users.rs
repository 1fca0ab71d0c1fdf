//! Account and session handlers.
//!
//! ```text
//! GET  /api/status
//! POST /api/register {"username":"alice","password":"pw"}
//! POST /api/login    {"username":"alice","password":"pw"}
//! POST /api/logout
//! GET  /api/users
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::identity_service::INVALID_CREDENTIALS;
use crate::domain::{
    CredentialValidationError, Error, LoginCredentials, Registration, SessionPrincipal, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, AuthenticatedUser, resolve_principal};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ErrorCode, FieldName, field_error};

const CREDENTIALS_REQUIRED: &str = "Username and password are required";
const REGISTERED: &str = "User registered successfully!";
const LOGGED_IN: &str = "Logged in successfully!";
const LOGGED_OUT: &str = "Logged out successfully!";

/// Body for `POST /api/register`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Body for `POST /api/login`.
///
/// Example JSON:
/// `{"username":"admin","password":"admin_password"}`
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Plain acknowledgement body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Item added successfully!")]
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

/// Successful login body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
    pub is_admin: bool,
}

/// Session status body; never an error.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatusResponse {
    pub is_logged_in: bool,
    pub username: Option<String>,
    pub is_admin: bool,
}

impl From<Option<&SessionPrincipal>> for StatusResponse {
    fn from(principal: Option<&SessionPrincipal>) -> Self {
        match principal {
            Some(principal) => Self {
                is_logged_in: true,
                username: Some(principal.username.to_string()),
                is_admin: principal.is_admin,
            },
            None => Self {
                is_logged_in: false,
                username: None,
                is_admin: false,
            },
        }
    }
}

/// Non-admin account as listed for admins.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserSummary {
    #[schema(example = 2)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            username: user.username().to_string(),
        }
    }
}

/// Body for `GET /api/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

fn map_registration_error(err: CredentialValidationError) -> Error {
    match err {
        CredentialValidationError::EmptyUsername => field_error(
            CREDENTIALS_REQUIRED,
            FieldName::new("username"),
            ErrorCode::MissingField,
        ),
        CredentialValidationError::EmptyPassword => field_error(
            CREDENTIALS_REQUIRED,
            FieldName::new("password"),
            ErrorCode::MissingField,
        ),
        CredentialValidationError::UsernameTooLong { max } => field_error(
            format!("username must be at most {max} characters"),
            FieldName::new("username"),
            ErrorCode::TooLong,
        ),
    }
}

/// Report whether the caller has an open session.
#[utoipa::path(
    get,
    path = "/api/status",
    responses((status = 200, description = "Session status", body = StatusResponse)),
    tags = ["auth"],
    operation_id = "status",
    security([])
)]
#[get("/status")]
pub async fn status(session: SessionContext, state: web::Data<HttpState>) -> HttpResponse {
    let principal = match resolve_principal(&session, &state).await {
        Ok(found) => found.map(|(_, principal)| principal),
        Err(err) => {
            warn!(error = %err, "session status lookup failed; reporting logged out");
            None
        }
    };
    HttpResponse::Ok().json(StatusResponse::from(principal.as_ref()))
}

/// Create a non-admin account.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest { username, password } = payload.into_inner();
    let registration = Registration::try_from_parts(
        username.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )
    .map_err(map_registration_error)?;
    state.registration.register(&registration).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new(REGISTERED)))
}

/// Verify credentials and open a session.
///
/// Any previous session carried by the request is closed first.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        username.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )
    .map_err(|_| Error::unauthorized(INVALID_CREDENTIALS))?;
    let principal = state.login.authenticate(&credentials).await?;

    if let Some(previous) = session.token()? {
        if let Err(err) = state.sessions.close(&previous).await {
            warn!(error = %err, "failed to close previous session");
        }
    }
    let token = state
        .sessions
        .open(principal.clone())
        .await
        .map_err(|err| Error::internal(format!("failed to open session: {err}")))?;
    session.persist_token(&token)?;
    info!(user_id = %principal.user_id, "session opened");

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: LOGGED_IN.to_owned(),
        username: principal.username.to_string(),
        is_admin: principal.is_admin,
    }))
}

/// Close the caller's session and expire the cookie.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "No session", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    user: AuthenticatedUser,
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    state
        .sessions
        .close(&user.token)
        .await
        .map_err(|err| Error::internal(format!("failed to close session: {err}")))?;
    session.clear();
    info!(user_id = %user.principal.user_id, "session closed");
    Ok(HttpResponse::Ok().json(MessageResponse::new(LOGGED_OUT)))
}

/// List every non-admin account.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use inventory_backend::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Non-admin users", body = UsersResponse),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Admin access required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    _admin: AdminUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<UsersResponse>> {
    let users = state.users.list_non_admin_users().await?;
    Ok(web::Json(UsersResponse {
        users: users.iter().map(UserSummary::from).collect(),
    }))
}
