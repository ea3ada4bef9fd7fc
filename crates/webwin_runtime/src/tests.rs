use serde_json::{Value, json};

use crate::{
    CallError, CallRequest, CallResponse,
    callable::IntoCallable,
    registry::{Handler, NameRegistry},
};

fn add(a: i64, b: i64) -> Result<i64, String> {
    Ok(a + b)
}

fn greet(name: String, greeting: Option<String>) -> Result<String, String> {
    Ok(format!("{}, {name}", greeting.unwrap_or_else(|| "hello".into())))
}

#[test]
fn test_request_decode() {
    assert_eq!(CallRequest::decode("").unwrap(), CallRequest::default());
    assert_eq!(CallRequest::decode("  ").unwrap(), CallRequest::default());
    assert_eq!(
        CallRequest::decode(r#"["x", 1, null]"#).unwrap().into_args(),
        vec![json!("x"), json!(1), Value::Null]
    );
    assert!(matches!(
        CallRequest::decode(r#"{"a": 1}"#),
        Err(CallError::Decode(_))
    ));
    assert!(matches!(CallRequest::decode("[1,"), Err(CallError::Decode(_))));
}

#[test]
fn test_response_encode() {
    assert_eq!(
        CallResponse::success(json!(["y", "x"])).encode(),
        r#"{"status":"succ","retval":["y","x"]}"#
    );
    assert_eq!(
        CallResponse::success(Value::Null).encode(),
        r#"{"status":"succ","retval":null}"#
    );
    assert_eq!(
        CallResponse::failure("boom").encode(),
        r#"{"status":"fail","msg":"boom"}"#
    );
}

#[test]
fn test_failure_message_never_empty() {
    let CallResponse::Failure { msg } = CallResponse::failure("") else {
        panic!("expected failure");
    };
    assert!(!msg.is_empty());

    let res = CallResponse::from(Err(CallError::Call(String::new())));
    let CallResponse::Failure { msg } = res else {
        panic!("expected failure");
    };
    assert!(!msg.is_empty());
}

#[test]
fn test_typed_callable() {
    let callable = add.into_callable();
    assert_eq!(callable(vec![json!(2), json!(3)]), Ok(json!(5)));

    let err = callable(vec![json!("two"), json!(3)]).unwrap_err();
    assert!(matches!(err, CallError::Decode(ref m) if m.starts_with("argument 1")));

    let err = callable(vec![json!(1), json!(2), json!(3)]).unwrap_err();
    assert_eq!(
        err,
        CallError::Decode("takes 2 positional arguments but 3 were given".into())
    );
}

#[test]
fn test_optional_trailing_argument() {
    let callable = greet.into_callable();
    assert_eq!(callable(vec![json!("bob")]), Ok(json!("hello, bob")));
    assert_eq!(
        callable(vec![json!("bob"), json!("hi")]),
        Ok(json!("hi, bob"))
    );
    assert!(matches!(callable(vec![]), Err(CallError::Decode(_))));
}

#[test]
fn test_zero_arity() {
    let callable = (|| Ok::<_, String>("pong")).into_callable();
    assert_eq!(callable(vec![]), Ok(json!("pong")));
    assert!(callable(vec![json!(1)]).is_err());
}

#[test]
fn test_handler_invoke() {
    let handler = Handler::new("add", add.into_callable());
    assert_eq!(handler.invoke("[1,2]"), r#"{"status":"succ","retval":3}"#);

    let res = CallResponse::decode(&handler.invoke("not json")).unwrap();
    let CallResponse::Failure { msg } = res else {
        panic!("expected failure");
    };
    assert!(msg.starts_with("DecodeError: call payload is not a JSON array"));
}

#[test]
fn test_handler_reports_errors() {
    let failing = Handler::new(
        "fail",
        (|| Err::<(), _>(io_error("disk full"))).into_callable(),
    );
    assert_eq!(failing.invoke(""), r#"{"status":"fail","msg":"disk full"}"#);
}

#[test]
fn test_handler_catches_panics() {
    let handler = Handler::new(
        "boom",
        (|| -> Result<(), String> { panic!("exploded") }).into_callable(),
    );
    let res = CallResponse::decode(&handler.invoke("[]")).unwrap();
    assert_eq!(
        res,
        CallResponse::Failure {
            msg: "panicked: exploded".into()
        }
    );
}

#[test]
fn test_registry_reserve_keeps_latest_last() {
    let mut registry = NameRegistry::new();
    assert!(registry.reserve(Handler::new("a", add.into_callable())).is_none());
    registry.reserve(Handler::new("b", add.into_callable()));
    let previous = registry.reserve(Handler::new("a", greet.into_callable()));

    assert!(previous.is_some());
    assert_eq!(registry.ids(), vec!["b".to_string(), "a".to_string()]);
    assert_eq!(registry.len(), 2);

    assert!(registry.remove("b").is_some());
    assert!(!registry.has("b"));
    assert!(registry.remove("b").is_none());
}

fn io_error(msg: &str) -> std::io::Error {
    std::io::Error::other(msg.to_string())
}
