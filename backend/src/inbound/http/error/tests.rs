//! Status mapping and body redaction.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::{Value, json};

const TRACE: &str = "6f1c2a9e-7d3b-4c55-9a0e-1b2c3d4e5f60";

async fn render(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = error.error_response();
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body()).await.expect("body");
    (status, header, serde_json::from_slice(&bytes).expect("json"))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::insufficient_stock("Not enough stock available"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("Invalid credentials"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("Admin access required"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("Item not found"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("Username already exists"), StatusCode::CONFLICT)]
#[case(Error::internal("pool exhausted"), StatusCode::INTERNAL_SERVER_ERROR)]
fn codes_map_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(error.status_code(), expected);
}

#[rstest]
#[actix_web::test]
async fn internal_details_never_reach_the_client() {
    let error = Error::internal("connection refused by db-01")
        .with_trace_id(TRACE)
        .with_details(json!({"sql": "UPDATE inventory"}));

    let (status, header, body) = render(&error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE));
    assert_eq!(
        body,
        json!({"code": "internal_error", "message": "Internal server error", "traceId": TRACE})
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::invalid_request("Quantity must be a non-negative integer")
        .with_trace_id(TRACE)
        .with_details(json!({"field": "quantity", "code": "out_of_range"}));

    let (status, header, body) = render(&error).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header.as_deref(), Some(TRACE));
    assert_eq!(body["message"], "Quantity must be a non-negative integer");
    assert_eq!(body["details"]["field"], "quantity");
}

#[rstest]
#[actix_web::test]
async fn missing_trace_id_omits_header_and_field() {
    let (status, header, body) = render(&Error::not_found("Allocation not found")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(header.is_none());
    assert!(body.get("traceId").is_none());
}

#[rstest]
fn framework_errors_become_opaque_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("cookie decode failed").into();
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert!(err.details().is_none());
}
