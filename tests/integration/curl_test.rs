//! cURL import/export integration tests
//!
//! Commands below are shaped like the ones browsers and API tools put on the
//! clipboard for each shell.

use super::{create_evaluator, init_test_env, load_fixture_store};
use cyberapi_core::curl::{generate_curl, parse_curl, ParseError};
use cyberapi_core::functions::resolve_request;
use cyberapi_core::history::LatestResponses;
use cyberapi_core::models::{content_type, Cookie, HttpMethod, HttpRequest, KvParam};

#[test]
fn test_parse_json_post() {
    init_test_env();
    let request = parse_curl(
        r#"curl -X POST -H 'Content-Type: application/json' -d '{"a":1}' https://api.test.com/v1/users?x=1"#,
    )
    .unwrap();

    assert_eq!(request.method, HttpMethod::POST);
    assert_eq!(request.uri, "https://api.test.com/v1/users");
    assert_eq!(request.query, vec![KvParam::new("x", "1")]);
    assert_eq!(request.content_type, content_type::JSON);
    assert_eq!(request.body, r#"{"a":1}"#);
    assert!(request
        .headers
        .iter()
        .all(|h| !h.key.eq_ignore_ascii_case("content-type")));
}

#[test]
fn test_parse_bash_multiline() {
    init_test_env();
    let text = r#"curl 'https://shop.test/api/orders?page=2' \
  -H 'accept: application/json' \
  -H 'authorization: Bearer abc' \
  --data-raw '{"sku":"A1","qty":2}' \
  --compressed"#;
    let request = parse_curl(text).unwrap();

    assert_eq!(request.method, HttpMethod::POST);
    assert_eq!(request.uri, "https://shop.test/api/orders");
    assert_eq!(request.query[0].value, "2");
    assert_eq!(request.header("authorization"), Some("Bearer abc"));
    assert_eq!(request.header("Accept-Encoding"), Some("deflate, gzip"));
    assert_eq!(request.body, r#"{"sku":"A1","qty":2}"#);
}

#[test]
fn test_parse_powershell_multiline() {
    init_test_env();
    let text = "PS C:\\> curl.exe `\n  -XDELETE `\n  \"https://shop.test/api/orders/9\"";
    let request = parse_curl(text).unwrap();
    assert_eq!(request.method, HttpMethod::DELETE);
    assert_eq!(request.uri, "https://shop.test/api/orders/9");
    assert!(request.query.is_empty());
}

#[test]
fn test_parse_failures() {
    init_test_env();
    for text in ["", "curl", "http GET https://a.test", "curl 'https://a.test"] {
        let err = parse_curl(text).unwrap_err();
        assert_eq!(err, ParseError::InvalidCurlText, "input {:?}", text);
        assert_eq!(err.to_string(), "invalid curl text");
    }
}

#[test]
fn test_import_then_export() {
    init_test_env();
    let request = parse_curl(
        "curl -H 'X-Api-Key: k1' -d 'a=1' 'https://shop.test/api/login?from=cli'",
    )
    .unwrap();

    let cookies = vec![Cookie::new("sid", "s1", "shop.test")];
    let curl = generate_curl(&request, &cookies).unwrap();

    assert_eq!(
        curl,
        "curl -v -XPOST -d 'a=1' -H 'Cookie: sid=s1' -H 'X-Api-Key: k1' \
         -H 'Content-Type: application/x-www-form-urlencoded' \
         'https://shop.test/api/login?from=cli'"
    );

    let reparsed = parse_curl(&curl).unwrap();
    assert_eq!(reparsed.method, request.method);
    assert_eq!(reparsed.uri, request.uri);
    assert_eq!(reparsed.query, request.query);
    assert_eq!(reparsed.body, request.body);
    assert_eq!(reparsed.content_type, request.content_type);
}

#[tokio::test]
async fn test_export_resolved_request() {
    init_test_env();
    let store = load_fixture_store();
    let history = LatestResponses::new(10);
    let evaluator = create_evaluator(&store, &history);

    let mut request = HttpRequest::new(HttpMethod::GET, "https://{{env(host)}}/api/items");
    request.add_header("X-Sign", "{{md5(abc)}}");
    request.add_query("token", "{{env(FOO)}}");

    let resolved = resolve_request("shop", &request, &evaluator).await.unwrap();
    let curl = generate_curl(&resolved, &[]).unwrap();

    assert!(curl.contains("-H 'X-Sign: 900150983cd24fb0d6963f7d28e17f72'"));
    assert!(curl.ends_with("'https://dev.shop.test/api/items?token=bar'"));
}
