use foodtrucks_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde::Deserialize;
use std::borrow::Cow;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    permit: String,
}

#[tokio::test]
async fn empty_path_targets_the_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resource/trucks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "permit": "21MFF-00001" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/resource/trucks.json", server.uri())).unwrap();
    let items: Vec<Item> = client.get_json("", RequestOpts::default()).await.unwrap();

    assert_eq!(
        items,
        vec![Item {
            permit: "21MFF-00001".into()
        }]
    );
}

#[tokio::test]
async fn header_auth_is_sent_as_a_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resource/trucks.json"))
        .and(header("x-app-token", "socrata-app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/resource/trucks.json", server.uri())).unwrap();
    let items: Vec<Item> = client
        .get_json(
            "",
            RequestOpts {
                auth: Some(Auth::Header {
                    name: reqwest::header::HeaderName::from_static("x-app-token"),
                    value: reqwest::header::HeaderValue::from_static("socrata-app"),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(items.is_empty());
}

#[tokio::test]
async fn query_auth_is_sent_as_a_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "94103"))
        .and(query_param("key", "maps-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/geocode/json", server.uri())).unwrap();
    let got: serde_json::Value = client
        .get_json(
            "",
            RequestOpts {
                query: Some(vec![("address", Cow::Borrowed("94103"))]),
                auth: Some(Auth::Query {
                    name: "key",
                    value: Cow::Borrowed(" maps-key "),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(got["ok"], true);
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({ "message": "forbidden dataset" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<serde_json::Value>("", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Api {
            status, message, ..
        } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(message, "forbidden dataset");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn no_retries_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let result = client
        .get_json::<serde_json::Value>("", RequestOpts::default())
        .await;

    assert!(matches!(result, Err(HttpError::Api { .. })));
}

#[tokio::test]
async fn server_errors_are_retried_within_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap().with_retries(1);
    let items: Vec<Item> = client.get_json("", RequestOpts::default()).await.unwrap();

    assert!(items.is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let err = client
        .get_json::<Vec<Item>>("", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Decode(_, snippet) => assert_eq!(snippet, "<html>nope</html>"),
        other => panic!("expected decode error, got {other:?}"),
    }
}
