//! In-process application harness for API flow tests.
//!
//! Assembles the `/api` routes with the real session middleware, the trace
//! middleware and the in-memory store, then drives them through a small
//! cookie-carrying client.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use inventory_backend::Trace;
use inventory_backend::domain::{AdminBootstrap, IdentityService, TRACE_ID_HEADER, Username};
use inventory_backend::inbound::http::configure_api;
use inventory_backend::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use inventory_backend::inbound::http::state::{HttpState, HttpStateAdapters};
use inventory_backend::outbound::memory::InMemoryStore;
use inventory_backend::outbound::security::Argon2CredentialHasher;
use inventory_backend::outbound::sessions::InMemorySessionRegistry;
use serde_json::{Value, json};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin_password";

/// Store and wired state shared by every client of one test.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub hasher: Arc<Argon2CredentialHasher>,
    pub state: HttpState,
    key: Key,
}

impl Harness {
    /// Fresh in-memory backend with the admin account seeded.
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let hasher =
            Arc::new(Argon2CredentialHasher::with_params(8, 1, 1).expect("argon2 params"));
        let harness = Self {
            state: HttpState::from_adapters(HttpStateAdapters {
                users: store.clone(),
                inventory: store.clone(),
                allocations: store.clone(),
                hasher: hasher.clone(),
                sessions: Arc::new(InMemorySessionRegistry::default()),
            }),
            store,
            hasher,
            key: Key::generate(),
        };
        harness.seed_admin().await;
        harness
    }

    /// Run the startup admin bootstrap against this store.
    pub async fn seed_admin(&self) -> AdminBootstrap {
        IdentityService::new(self.store.clone(), self.hasher.clone())
            .bootstrap_admin(
                &Username::new(ADMIN_USERNAME).expect("admin username"),
                ADMIN_PASSWORD,
            )
            .await
            .expect("admin bootstrap")
    }

    /// A client with an empty cookie jar.
    pub async fn client(
        &self,
    ) -> Client<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>>
    {
        let session = SessionSettings {
            key: self.key.clone(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.state.clone()))
                .wrap(session.middleware())
                .wrap(Trace)
                .configure(configure_api),
        )
        .await;
        Client { app, cookie: None }
    }

    /// A client already logged in as the admin.
    pub async fn admin(
        &self,
    ) -> Client<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>>
    {
        let mut client = self.client().await;
        let reply = client.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(reply.status, StatusCode::OK, "admin login: {}", reply.body);
        client
    }

    /// Register `username` and return a client logged in as them.
    pub async fn member(
        &self,
        username: &str,
    ) -> Client<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>>
    {
        let mut client = self.client().await;
        let registered = client
            .post("/api/register", json!({"username": username, "password": "pw"}))
            .await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);
        let reply = client.login(username, "pw").await;
        assert_eq!(reply.status, StatusCode::OK, "member login: {}", reply.body);
        client
    }
}

/// Captured response.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub trace_id: Option<String>,
    pub body: Value,
}

pub struct Client<S> {
    app: S,
    cookie: Option<Cookie<'static>>,
}

impl<S> Client<S>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    pub async fn send(&mut self, method: Method, path: &str, payload: Option<Value>) -> Reply {
        let mut request = TestRequest::default().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            request = request.cookie(cookie.clone());
        }
        if let Some(payload) = payload {
            request = request.set_json(payload);
        }
        let res = test::call_service(&self.app, request.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        {
            self.cookie = Some(cookie.into_owned());
        }
        let status = res.status();
        let trace_id = res
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = test::read_body(res).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        Reply {
            status,
            trace_id,
            body,
        }
    }

    pub async fn get(&mut self, path: &str) -> Reply {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&mut self, path: &str, payload: Value) -> Reply {
        self.send(Method::POST, path, Some(payload)).await
    }

    pub async fn put(&mut self, path: &str, payload: Value) -> Reply {
        self.send(Method::PUT, path, Some(payload)).await
    }

    pub async fn delete(&mut self, path: &str) -> Reply {
        self.send(Method::DELETE, path, None).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Reply {
        self.post(
            "/api/login",
            json!({"username": username, "password": password}),
        )
        .await
    }

    /// Add an item as the current (admin) user and return its id.
    pub async fn add_item(&mut self, name: &str, quantity: i64, price: f64) -> i64 {
        let reply = self
            .post(
                "/api/inventory",
                json!({"name": name, "quantity": quantity, "price": price}),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.body["item"]["id"].as_i64().expect("item id")
    }

    /// Id of the non-admin user named `username`, via the admin listing.
    pub async fn user_id(&mut self, username: &str) -> i64 {
        let reply = self.get("/api/users").await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        reply.body["users"]
            .as_array()
            .expect("users array")
            .iter()
            .find(|user| user["username"] == username)
            .and_then(|user| user["id"].as_i64())
            .expect("user listed")
    }

    /// Current catalogue quantity of `item_id`.
    pub async fn stock_of(&mut self, item_id: i64) -> i64 {
        let reply = self.get("/api/inventory").await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        reply.body["inventory"]
            .as_array()
            .expect("inventory array")
            .iter()
            .find(|item| item["id"].as_i64() == Some(item_id))
            .and_then(|item| item["quantity"].as_i64())
            .expect("item listed")
    }
}
