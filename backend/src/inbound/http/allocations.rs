//! Allocation ledger handlers.
//!
//! ```text
//! GET  /api/allocations/find?user_id=2&inventory_id=1
//! POST /api/allocations {"user_id":2,"inventory_id":1,"quantity":3}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Allocation, AllocationQuantity, AllocationRequest, Error, InventoryItemId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponse;
use crate::inbound::http::validation::{
    ErrorCode, FieldName, IntegerField, field_error, positive_id,
};

const LOOKUP_IDS_REQUIRED: &str = "User ID and Inventory ID are required";
const ALLOCATION_FIELDS_REQUIRED: &str = "User ID, Inventory ID, and quantity are required";
const INVALID_DATA_FORMAT: &str =
    "Invalid data format. Please ensure user_id, inventory_id, and quantity are numbers.";
const ALLOCATED: &str = "Item allocated successfully!";

const USER_ID: FieldName = FieldName::new("user_id");
const INVENTORY_ID: FieldName = FieldName::new("inventory_id");
const QUANTITY: FieldName = FieldName::new("quantity");

/// Query string for `GET /api/allocations`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AllocationLookup {
    /// Allocated user.
    #[param(value_type = Option<i32>, example = 2)]
    pub user_id: Option<String>,
    /// Allocated item.
    #[param(value_type = Option<i32>, example = 1)]
    pub inventory_id: Option<String>,
}

/// Body for `POST /api/allocations`.
///
/// Each field accepts a JSON number or a numeric string.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AllocationRequestBody {
    #[schema(value_type = Option<i32>, example = 2)]
    pub user_id: Option<IntegerField>,
    #[schema(value_type = Option<i32>, example = 1)]
    pub inventory_id: Option<IntegerField>,
    #[schema(value_type = Option<i32>, example = 3)]
    pub quantity: Option<IntegerField>,
}

/// Ledger entry as returned by `GET /api/allocations`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AllocationResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 2)]
    pub user_id: i32,
    #[schema(example = 1)]
    pub inventory_id: i32,
    #[schema(example = 3)]
    pub quantity: i32,
}

impl From<&Allocation> for AllocationResponse {
    fn from(allocation: &Allocation) -> Self {
        Self {
            id: allocation.id.get(),
            user_id: allocation.user_id.get(),
            inventory_id: allocation.inventory_id.get(),
            quantity: allocation.quantity.get(),
        }
    }
}

/// Parse one allocation field. Absent or zero values count as missing;
/// anything that is not an integer is a format error.
fn required_integer(raw: Option<&IntegerField>, field: FieldName) -> Result<i32, Error> {
    let raw = raw.ok_or_else(|| {
        field_error(ALLOCATION_FIELDS_REQUIRED, field, ErrorCode::MissingField)
    })?;
    match raw.to_i32() {
        None => Err(field_error(INVALID_DATA_FORMAT, field, ErrorCode::InvalidNumber)),
        Some(0) => Err(field_error(
            ALLOCATION_FIELDS_REQUIRED,
            field,
            ErrorCode::MissingField,
        )),
        Some(value) => Ok(value),
    }
}

fn out_of_range(field: FieldName) -> Error {
    field_error(
        format!("{} must be a positive integer", field.as_str()),
        field,
        ErrorCode::OutOfRange,
    )
}

impl TryFrom<AllocationRequestBody> for AllocationRequest {
    type Error = Error;

    fn try_from(body: AllocationRequestBody) -> Result<Self, Self::Error> {
        let user_id = required_integer(body.user_id.as_ref(), USER_ID)?;
        let inventory_id = required_integer(body.inventory_id.as_ref(), INVENTORY_ID)?;
        let quantity = required_integer(body.quantity.as_ref(), QUANTITY)?;
        Ok(Self {
            user_id: UserId::new(user_id).map_err(|_| out_of_range(USER_ID))?,
            inventory_id: InventoryItemId::new(inventory_id)
                .map_err(|_| out_of_range(INVENTORY_ID))?,
            quantity: AllocationQuantity::new(quantity).map_err(|_| out_of_range(QUANTITY))?,
        })
    }
}

/// Look up the allocation for a (user, item) pair.
#[utoipa::path(
    get,
    path = "/api/allocations/find",
    params(AllocationLookup),
    responses(
        (status = 200, description = "Allocation", body = AllocationResponse),
        (status = 400, description = "Missing or invalid ids", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Admin access required", body = ErrorSchema),
        (status = 404, description = "Allocation not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["allocations"],
    operation_id = "findAllocation"
)]
#[get("/allocations/find")]
pub async fn find_allocation(
    _admin: AdminUser,
    state: web::Data<HttpState>,
    query: web::Query<AllocationLookup>,
) -> ApiResult<web::Json<AllocationResponse>> {
    let ids = positive_id(query.user_id.as_deref())
        .and_then(|raw| UserId::new(raw).ok())
        .zip(
            positive_id(query.inventory_id.as_deref())
                .and_then(|raw| InventoryItemId::new(raw).ok()),
        );
    let Some((user_id, inventory_id)) = ids else {
        return Err(Error::invalid_request(LOOKUP_IDS_REQUIRED));
    };
    let allocation = state
        .allocations_query
        .find_allocation(user_id, inventory_id)
        .await?;
    Ok(web::Json(AllocationResponse::from(&allocation)))
}

/// Allocate stock to a user, merging into any existing allocation for the
/// same item.
#[utoipa::path(
    post,
    path = "/api/allocations",
    request_body = AllocationRequestBody,
    responses(
        (status = 201, description = "Stock allocated", body = MessageResponse),
        (status = 400, description = "Invalid request or not enough stock", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Admin access required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["allocations"],
    operation_id = "createAllocation"
)]
#[post("/allocations")]
pub async fn create_allocation(
    _admin: AdminUser,
    state: web::Data<HttpState>,
    payload: web::Json<AllocationRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = AllocationRequest::try_from(payload.into_inner())?;
    state.allocations.allocate(request).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new(ALLOCATED)))
}
