use super::*;

#[test]
fn request_sets_fields() {
    let frame = Frame::request("layout:fetch", Data::new());
    assert_eq!(frame.syscall, "layout:fetch");
    assert_eq!(frame.status, Status::Request);
    assert!(frame.parent_id.is_none());
    assert!(frame.ts > 0);
}

#[test]
fn reply_inherits_context() {
    let req = Frame::request("layout:toggle", Data::new());
    let done = req.done_with(Data::new());

    assert_eq!(done.parent_id, Some(req.id));
    assert_eq!(done.syscall, "layout:toggle");
    assert_eq!(done.status, Status::Done);
}

#[test]
fn prefix_and_op_extraction() {
    let frame = Frame::request("panel:edit", Data::new());
    assert_eq!(frame.prefix(), "panel");
    assert_eq!(frame.op(), "edit");

    let frame = Frame::request("noseparator", Data::new());
    assert_eq!(frame.prefix(), "noseparator");
    assert_eq!(frame.op(), "");
}

#[test]
fn client_frame_without_optional_fields_parses() {
    let raw = r#"{"id":"00000000-0000-0000-0000-000000000001","syscall":"layout:fetch","status":"request"}"#;
    let frame: Frame = serde_json::from_str(raw).expect("deserialize");
    assert_eq!(frame.syscall, "layout:fetch");
    assert!(frame.data.is_empty());
    assert!(frame.from.is_none());
}

#[test]
fn error_from_typed() {
    #[derive(Debug, thiserror::Error)]
    #[error("not found")]
    struct NotFound;

    impl ErrorCode for NotFound {
        fn error_code(&self) -> &'static str {
            "E_NOT_FOUND"
        }
    }

    let req = Frame::request("layout:update", Data::new());
    let err = req.error_from(&NotFound);

    assert_eq!(err.status, Status::Error);
    assert_eq!(err.data.get("code").and_then(|v| v.as_str()), Some("E_NOT_FOUND"));
    assert_eq!(err.data.get("message").and_then(|v| v.as_str()), Some("not found"));
    assert_eq!(err.data.get("retryable").and_then(serde_json::Value::as_bool), Some(false));
}
