//! End-to-end template resolution tests
//!
//! These tests load the shared store fixture and resolve whole requests the
//! way the client does right before dispatch.

use super::{create_evaluator, fixture_path, init_test_env, load_fixture_store, NOW};
use cyberapi_core::functions::{replace_functions, resolve_request, scan_placeholders, FnError};
use cyberapi_core::history::LatestResponses;
use cyberapi_core::host::{LocalFileSystem, StaticFilePicker};
use cyberapi_core::models::{HttpMethod, HttpRequest, HttpResponse};
use serde_json::json;
use std::sync::Arc;

fn login_response() -> HttpResponse {
    let mut response = HttpResponse::new("login", 200);
    response.add_header("Content-Type", "application/json; charset=utf-8");
    let body = json!({"data": {"token": "tok-123", "user": {"id": 42}}});
    response.set_body(body.to_string().into_bytes());
    response
}

#[tokio::test]
async fn test_documented_examples() {
    init_test_env();
    let store = load_fixture_store();
    let history = LatestResponses::new(10);
    let evaluator = create_evaluator(&store, &history);

    let cases = [
        ("{{md5(abc)}}", "900150983cd24fb0d6963f7d28e17f72".to_string()),
        (
            "{{sha256(abc)}}",
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad".to_string(),
        ),
        ("{{env(FOO)}}", "bar".to_string()),
        ("{{env(NOPE)}}", "NOPE".to_string()),
        ("{{a.b(x)}}", "x".to_string()),
        ("{{timestamp()}}", NOW.to_string()),
    ];

    for (text, expected) in cases {
        let resolved = replace_functions(text, "shop", &evaluator).await.unwrap();
        assert_eq!(resolved, expected, "resolving {}", text);
    }
}

#[tokio::test]
async fn test_timestamp_with_system_clock() {
    init_test_env();
    let store = load_fixture_store();
    let evaluator = cyberapi_core::Evaluator::new(
        Arc::new(store),
        Arc::new(LatestResponses::new(10)),
    );

    let before = chrono::Utc::now().timestamp();
    let value = replace_functions("{{ts()}}", "shop", &evaluator).await.unwrap();
    let after = chrono::Utc::now().timestamp();

    assert!(value.chars().all(|c| c.is_ascii_digit()));
    let seconds: i64 = value.parse().unwrap();
    assert!(seconds >= before && seconds <= after);
}

#[tokio::test]
async fn test_active_environment_switch() {
    init_test_env();
    let store = load_fixture_store();
    let history = LatestResponses::new(10);
    let evaluator = create_evaluator(&store, &history);

    let url = "https://{{env(host)}}/api";
    assert_eq!(
        replace_functions(url, "shop", &evaluator).await.unwrap(),
        "https://dev.shop.test/api"
    );

    assert!(store.set_active_environment("env-prod"));
    assert_eq!(
        replace_functions(url, "shop", &evaluator).await.unwrap(),
        "https://shop.test/api"
    );
}

#[tokio::test]
async fn test_global_request_headers_are_not_env_variables() {
    init_test_env();
    let store = load_fixture_store();
    let history = LatestResponses::new(10);
    let evaluator = create_evaluator(&store, &history);

    assert_eq!(
        replace_functions("{{env(X-Hidden)}}", "shop", &evaluator).await.unwrap(),
        "X-Hidden"
    );
}

#[tokio::test]
async fn test_request_chaining_with_get() {
    init_test_env();
    let store = load_fixture_store();
    let history = LatestResponses::new(10);
    history.add(login_response());
    let evaluator = create_evaluator(&store, &history);

    let mut request = HttpRequest::new(HttpMethod::GET, "https://{{env(host)}}/users/{{g(login, data.user.id)}}");
    request.add_header("Authorization", "Bearer {{get(login, data.token)}}");
    request.add_query("sign", "{{md5.env(secret)}}");

    let resolved = resolve_request("shop", &request, &evaluator).await.unwrap();
    assert_eq!(resolved.uri, "https://dev.shop.test/users/42");
    assert_eq!(resolved.header("Authorization"), Some("Bearer tok-123"));
    assert_eq!(resolved.query[0].value, "900150983cd24fb0d6963f7d28e17f72");
}

#[tokio::test]
async fn test_invalid_get_aborts_with_partial_text() {
    init_test_env();
    let store = load_fixture_store();
    let history = LatestResponses::new(10);
    let evaluator = create_evaluator(&store, &history);

    let err = replace_functions("{{env(FOO)}}/{{get(login)}}/{{ts()}}", "shop", &evaluator)
        .await
        .unwrap_err();
    assert_eq!(err.error, FnError::InvalidGetParams("login".to_string()));
    assert_eq!(err.partial.as_deref(), Some("bar/{{get(login)}}/{{ts()}}"));
    assert_eq!(
        err.to_string(),
        "params of get from response is invalid: login"
    );
}

#[tokio::test]
async fn test_file_functions_with_picker() {
    init_test_env();
    let store = load_fixture_store();
    let history = LatestResponses::new(10);
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("avatar.txt");
    std::fs::write(&file, "hi").unwrap();

    let evaluator = create_evaluator(&store, &history)
        .with_file_system(Arc::new(LocalFileSystem::with_root(dir.path())))
        .with_file_picker(Arc::new(StaticFilePicker::new(file.to_string_lossy())));

    // The picked absolute path is read, then encoded.
    let resolved = replace_functions("{{b64.rf.of()}}", "shop", &evaluator)
        .await
        .unwrap();
    assert_eq!(resolved, "aGk=");

    let text = replace_functions("{{rtf(avatar.txt, document)}}", "shop", &evaluator)
        .await
        .unwrap();
    assert_eq!(text, "hi");
}

#[tokio::test]
async fn test_missing_file_fails_resolution() {
    init_test_env();
    let store = load_fixture_store();
    let history = LatestResponses::new(10);
    let dir = tempfile::tempdir().unwrap();
    let evaluator = create_evaluator(&store, &history)
        .with_file_system(Arc::new(LocalFileSystem::with_root(dir.path())));

    let err = replace_functions("{{rf(missing.bin)}}", "shop", &evaluator)
        .await
        .unwrap_err();
    assert!(matches!(err.error, FnError::Io(_)));
}

#[tokio::test]
async fn test_random_values_in_body() {
    init_test_env();
    let store = load_fixture_store();
    let history = LatestResponses::new(10);
    let evaluator = create_evaluator(&store, &history);

    let body = r#"{"email": "{{random(email)}}", "name": "{{random(name, qa)}}"}"#;
    let resolved = replace_functions(body, "shop", &evaluator).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&resolved).unwrap();

    let email = json["email"].as_str().unwrap();
    assert!(email.starts_with(&NOW.to_string()));
    assert!(email.ends_with("@example.com"));
    assert!(json["name"].as_str().unwrap().starts_with("qa-"));
}

#[test]
fn test_scan_fixture_request() {
    init_test_env();
    let text = std::fs::read_to_string(fixture_path("store.json")).unwrap();
    assert!(scan_placeholders(&text, "shop").is_empty());

    let matches = scan_placeholders("{{good()}} {{bad}}", "shop");
    assert_eq!(matches.len(), 1);
}
