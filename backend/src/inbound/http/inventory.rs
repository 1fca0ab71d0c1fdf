//! Catalogue handlers.
//!
//! ```text
//! GET    /api/inventory/summary
//! GET    /api/inventory
//! GET    /api/my-inventory
//! POST   /api/inventory          {"name":"Widget","quantity":10,"price":2.5}
//! PUT    /api/inventory/{id}     {"quantity":3}
//! DELETE /api/inventory/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::inventory_service::ITEM_NOT_FOUND;
use crate::domain::{
    Error, Holding, InventoryItem, InventoryItemId, InventoryItemPatch, InventorySummary,
    InventoryValidationError, ItemName, NewInventoryItem, StockQuantity, UnitPrice,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, AuthenticatedUser};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponse;
use crate::inbound::http::validation::{
    DecimalField, ErrorCode, FieldName, IntegerField, field_error,
};

const ITEM_FIELDS_REQUIRED: &str = "Name, quantity, and price are required";
const ITEM_ADDED: &str = "Item added successfully!";
const ITEM_UPDATED: &str = "Item updated successfully!";
const ITEM_DELETED: &str = "Item deleted successfully!";

const NAME: FieldName = FieldName::new("name");
const QUANTITY: FieldName = FieldName::new("quantity");
const PRICE: FieldName = FieldName::new("price");

/// Body for `GET /api/inventory/summary`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SummaryResponse {
    #[schema(example = 2)]
    pub total_items: usize,
    #[schema(example = 30.0)]
    pub total_value: f64,
}

impl From<InventorySummary> for SummaryResponse {
    fn from(value: InventorySummary) -> Self {
        Self {
            total_items: value.total_items,
            total_value: value.total_value,
        }
    }
}

/// One row of a catalogue or holdings listing.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct InventoryItemBody {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = 10)]
    pub quantity: i64,
    #[schema(example = 2.5)]
    pub price: f64,
}

impl From<&InventoryItem> for InventoryItemBody {
    fn from(item: &InventoryItem) -> Self {
        Self {
            id: item.id.get(),
            name: item.name.to_string(),
            quantity: i64::from(item.quantity.get()),
            price: item.price.get(),
        }
    }
}

impl From<&Holding> for InventoryItemBody {
    fn from(holding: &Holding) -> Self {
        Self {
            id: holding.item_id.get(),
            name: holding.name.to_string(),
            quantity: holding.quantity,
            price: holding.price.get(),
        }
    }
}

/// Body for `GET /api/inventory` and `GET /api/my-inventory`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct InventoryResponse {
    pub inventory: Vec<InventoryItemBody>,
}

/// Body for `POST /api/inventory`.
///
/// Numbers may also be sent as numeric strings.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AddItemRequest {
    #[schema(example = "Widget")]
    pub name: Option<String>,
    #[schema(value_type = Option<i32>, example = 10)]
    pub quantity: Option<IntegerField>,
    #[schema(value_type = Option<f64>, example = 2.5)]
    pub price: Option<DecimalField>,
}

/// Body for `PUT /api/inventory/{id}`; omitted fields keep their value.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub quantity: Option<IntegerField>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<DecimalField>,
}

/// Identifier and name of a newly created item.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreatedItem {
    pub id: i32,
    pub name: String,
}

/// Body returned by `POST /api/inventory`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AddItemResponse {
    pub message: String,
    pub item: CreatedItem,
}

fn parse_name(raw: &str) -> Result<ItemName, Error> {
    ItemName::new(raw).map_err(|err| match err {
        InventoryValidationError::NameTooLong { .. } => {
            field_error(err.to_string(), NAME, ErrorCode::TooLong)
        }
        _ => field_error(ITEM_FIELDS_REQUIRED, NAME, ErrorCode::MissingField),
    })
}

fn parse_quantity(raw: &IntegerField) -> Result<StockQuantity, Error> {
    let value = raw.to_i32().ok_or_else(|| {
        field_error(
            "quantity must be a whole number",
            QUANTITY,
            ErrorCode::InvalidNumber,
        )
    })?;
    StockQuantity::new(value)
        .map_err(|err| field_error(err.to_string(), QUANTITY, ErrorCode::OutOfRange))
}

fn parse_price(raw: &DecimalField) -> Result<UnitPrice, Error> {
    let value = raw
        .to_f64()
        .ok_or_else(|| field_error("price must be a number", PRICE, ErrorCode::InvalidNumber))?;
    UnitPrice::new(value).map_err(|err| field_error(err.to_string(), PRICE, ErrorCode::OutOfRange))
}

impl TryFrom<AddItemRequest> for NewInventoryItem {
    type Error = Error;

    fn try_from(request: AddItemRequest) -> Result<Self, Self::Error> {
        let missing = |field| field_error(ITEM_FIELDS_REQUIRED, field, ErrorCode::MissingField);
        let name = request.name.ok_or_else(|| missing(NAME))?;
        let quantity = request.quantity.ok_or_else(|| missing(QUANTITY))?;
        let price = request.price.ok_or_else(|| missing(PRICE))?;
        Ok(Self {
            name: parse_name(&name)?,
            quantity: parse_quantity(&quantity)?,
            price: parse_price(&price)?,
        })
    }
}

impl TryFrom<UpdateItemRequest> for InventoryItemPatch {
    type Error = Error;

    fn try_from(request: UpdateItemRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: request.name.as_deref().map(parse_name).transpose()?,
            quantity: request.quantity.as_ref().map(parse_quantity).transpose()?,
            price: request.price.as_ref().map(parse_price).transpose()?,
        })
    }
}

/// Path ids that cannot name an item are reported as missing items.
fn item_id(raw: i32) -> Result<InventoryItemId, Error> {
    InventoryItemId::new(raw).map_err(|_| Error::not_found(ITEM_NOT_FOUND))
}

/// Catalogue totals for any signed-in user.
#[utoipa::path(
    get,
    path = "/api/inventory/summary",
    responses(
        (status = 200, description = "Catalogue totals", body = SummaryResponse),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["inventory"],
    operation_id = "inventorySummary"
)]
#[get("/inventory/summary")]
pub async fn summary(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<SummaryResponse>> {
    let summary = state.inventory_query.summary().await?;
    Ok(web::Json(summary.into()))
}

/// Full catalogue, ordered by id.
#[utoipa::path(
    get,
    path = "/api/inventory",
    responses(
        (status = 200, description = "Catalogue", body = InventoryResponse),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Admin access required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["inventory"],
    operation_id = "listInventory"
)]
#[get("/inventory")]
pub async fn list_inventory(
    _admin: AdminUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<InventoryResponse>> {
    let items = state.inventory_query.list_items().await?;
    Ok(web::Json(InventoryResponse {
        inventory: items.iter().map(InventoryItemBody::from).collect(),
    }))
}

/// Items allocated to the caller, one entry per item with the allocated
/// quantity.
#[utoipa::path(
    get,
    path = "/api/my-inventory",
    responses(
        (status = 200, description = "Caller holdings", body = InventoryResponse),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["inventory"],
    operation_id = "myInventory"
)]
#[get("/my-inventory")]
pub async fn my_inventory(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<InventoryResponse>> {
    let holdings = state
        .inventory_query
        .holdings_for(user.principal.user_id)
        .await?;
    Ok(web::Json(InventoryResponse {
        inventory: holdings.iter().map(InventoryItemBody::from).collect(),
    }))
}

/// Add a catalogue item. Zero quantity and zero price are accepted.
#[utoipa::path(
    post,
    path = "/api/inventory",
    request_body = AddItemRequest,
    responses(
        (status = 201, description = "Item created", body = AddItemResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Admin access required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["inventory"],
    operation_id = "addItem"
)]
#[post("/inventory")]
pub async fn add_item(
    _admin: AdminUser,
    state: web::Data<HttpState>,
    payload: web::Json<AddItemRequest>,
) -> ApiResult<HttpResponse> {
    let item = NewInventoryItem::try_from(payload.into_inner())?;
    let created = state.inventory.add_item(item).await?;
    Ok(HttpResponse::Created().json(AddItemResponse {
        message: ITEM_ADDED.to_owned(),
        item: CreatedItem {
            id: created.id.get(),
            name: created.name.to_string(),
        },
    }))
}

/// Partially update a catalogue item.
#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Item id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = MessageResponse),
        (status = 400, description = "Invalid fields", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Admin access required", body = ErrorSchema),
        (status = 404, description = "Item not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["inventory"],
    operation_id = "updateItem"
)]
#[put("/inventory/{id}")]
pub async fn update_item(
    _admin: AdminUser,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateItemRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = item_id(path.into_inner())?;
    let patch = InventoryItemPatch::try_from(payload.into_inner())?;
    state.inventory.update_item(id, patch).await?;
    Ok(web::Json(MessageResponse::new(ITEM_UPDATED)))
}

/// Remove a catalogue item. Allocations referencing it are left in place.
#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Admin access required", body = ErrorSchema),
        (status = 404, description = "Item not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["inventory"],
    operation_id = "deleteItem"
)]
#[delete("/inventory/{id}")]
pub async fn delete_item(
    _admin: AdminUser,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = item_id(path.into_inner())?;
    state.inventory.delete_item(id).await?;
    Ok(web::Json(MessageResponse::new(ITEM_DELETED)))
}
