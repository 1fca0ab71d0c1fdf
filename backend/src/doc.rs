//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` handler, the health probes, the request
//! and response bodies, and the session cookie security scheme. Swagger UI
//! serves it in debug builds and `cargo run --bin openapi_dump` prints it.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::allocations::{AllocationRequestBody, AllocationResponse};
use crate::inbound::http::inventory::{
    AddItemRequest, AddItemResponse, CreatedItem, InventoryItemBody, InventoryResponse,
    SummaryResponse, UpdateItemRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, StatusResponse, UserSummary,
    UsersResponse,
};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the inventory API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Inventory backend API",
        description = "Users, inventory items and stock allocations behind session authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::status,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::inventory::summary,
        crate::inbound::http::inventory::list_inventory,
        crate::inbound::http::inventory::my_inventory,
        crate::inbound::http::inventory::add_item,
        crate::inbound::http::inventory::update_item,
        crate::inbound::http::inventory::delete_item,
        crate::inbound::http::allocations::find_allocation,
        crate::inbound::http::allocations::create_allocation,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MessageResponse,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        StatusResponse,
        UserSummary,
        UsersResponse,
        SummaryResponse,
        InventoryItemBody,
        InventoryResponse,
        AddItemRequest,
        AddItemResponse,
        CreatedItem,
        UpdateItemRequest,
        AllocationRequestBody,
        AllocationResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and session status"),
        (name = "users", description = "Account listings for admins"),
        (name = "inventory", description = "Catalogue items and holdings"),
        (name = "allocations", description = "Stock allocations to users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
