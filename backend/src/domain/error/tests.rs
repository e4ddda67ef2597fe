//! Tests for the error payload formatting and trace propagation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn invalid_request_case() -> Error {
    Error::invalid_request("bad")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"field": "title"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_messages_are_rejected(#[case] message: &str) {
    let err = Error::try_new(ErrorCode::InternalError, message).expect_err("blank message");
    assert_eq!(err, ErrorValidationError::EmptyMessage);
}

#[rstest]
fn serialises_camel_case_payload(invalid_request_case: Error) {
    let value = serde_json::to_value(&invalid_request_case).expect("serialise error");
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["message"], "bad");
    assert_eq!(value["details"]["field"], "title");
    assert_eq!(value["traceId"], TRACE_ID);
}

#[rstest]
fn deserialisation_rejects_blank_message() {
    let payload = json!({"code": "not_found", "message": "  "});
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}

#[rstest]
fn deserialisation_round_trips_details(invalid_request_case: Error) {
    let value = serde_json::to_value(&invalid_request_case).expect("serialise error");
    let decoded: Error = serde_json::from_value(value).expect("deserialise error");
    assert_eq!(decoded, invalid_request_case);
}

#[tokio::test]
async fn captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid trace id");
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn omits_trace_id_out_of_scope() {
    let error = Error::forbidden("nope");
    assert!(error.trace_id().is_none());
}
