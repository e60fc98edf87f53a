use foodtrucks_common::FoodTruckError;
use foodtrucks_core::{Geocoder, TruckSource};
use foodtrucks_sources::{GoogleGeocoder, SfDatasetApi};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DATASET_PATH: &str = "/resource/rqzj-sfat.json";
const GEOCODE_PATH: &str = "/maps/api/geocode/json";

#[tokio::test]
async fn dataset_decodes_socrata_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATASET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "objectid": "1585966",
                "applicant": "Tacos El Flaco",
                "facilitytype": "Truck",
                "locationdescription": "MISSION ST: 20TH ST to 21ST ST (2500 - 2599)",
                "address": "2535 MISSION ST",
                "permit": "21MFF-00106",
                "status": "APPROVED",
                "fooditems": "Tacos: Burritos: Quesadillas",
                "latitude": "37.75648",
                "longitude": "-122.41882"
            },
            {
                "objectid": "1334790",
                "applicant": "Natan's Catering",
                "facilitytype": "Truck",
                "permit": "19MFF-00112",
                "status": "REQUESTED",
                "latitude": "0",
                "longitude": "0"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = SfDatasetApi::new(&format!("{}{DATASET_PATH}", server.uri())).unwrap();
    let records = api.fetch_all().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name(), "Tacos El Flaco");
    assert!(records[0].serves_tacos());
    assert!(records[0].coordinate().is_some());
    assert_eq!(records[1].fooditems, None);
    assert_eq!(records[1].coordinate(), None);
}

#[tokio::test]
async fn dataset_sends_the_app_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATASET_PATH))
        .and(header("x-app-token", "sf-app-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "applicant": "Tacos El Flaco", "permit": "21MFF-00106" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = SfDatasetApi::new(&format!("{}{DATASET_PATH}", server.uri()))
        .unwrap()
        .with_app_token(" sf-app-token ")
        .unwrap();
    let records = api.fetch_all().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].permit_id(), "21MFF-00106");
}

#[test]
fn dataset_rejects_an_unsendable_app_token() {
    let api = SfDatasetApi::new("https://data.sfgov.org/resource/rqzj-sfat.json").unwrap();
    assert!(matches!(
        api.with_app_token("bad\ntoken"),
        Err(FoodTruckError::Config(_))
    ));
}

#[tokio::test]
async fn dataset_http_failure_becomes_dataset_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let api = SfDatasetApi::new(&format!("{}{DATASET_PATH}", server.uri())).unwrap();
    let err = api.fetch_all().await.unwrap_err();

    assert!(matches!(err, FoodTruckError::Dataset(_)));
    assert!(err.to_string().contains("500"), "{err}");
}

#[tokio::test]
async fn dataset_non_array_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rows": [] })))
        .mount(&server)
        .await;

    let api = SfDatasetApi::new(&server.uri()).unwrap();
    assert!(matches!(
        api.fetch_all().await,
        Err(FoodTruckError::Dataset(_))
    ));
}

#[tokio::test]
async fn geocode_returns_first_result_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .and(query_param("address", "94110"))
        .and(query_param("key", "maps-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {
                    "formatted_address": "San Francisco, CA 94110, USA",
                    "geometry": { "location": { "lat": 37.7485824, "lng": -122.4184108 } }
                },
                {
                    "geometry": { "location": { "lat": 1.0, "lng": 2.0 } }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::new(
        &format!("{}{GEOCODE_PATH}", server.uri()),
        Some("maps-key".into()),
    )
    .unwrap();
    let at = geocoder.geocode("94110").await.unwrap();

    assert_eq!(at.lat, 37.7485824);
    assert_eq!(at.lng, -122.4184108);
}

#[tokio::test]
async fn geocode_without_key_sends_only_address() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("address", "94103"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [ { "geometry": { "location": { "lat": 37.77, "lng": -122.41 } } } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::new(&server.uri(), None).unwrap();
    assert!(geocoder.geocode("94103").await.is_ok());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.query_pairs().any(|(k, _)| k == "key"));
}

#[tokio::test]
async fn geocode_empty_results_is_no_result_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::new(&server.uri(), None).unwrap();
    let err = geocoder.geocode("00000").await.unwrap_err();

    assert!(matches!(err, FoodTruckError::NoGeocodeResult(ref zip) if zip == "00000"));
}

#[tokio::test]
async fn geocode_unexpected_shape_is_geocode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [ { "geometry": {} } ]
        })))
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::new(&server.uri(), None).unwrap();
    assert!(matches!(
        geocoder.geocode("94103").await,
        Err(FoodTruckError::Geocode(_))
    ));
}

#[tokio::test]
async fn geocode_denied_request_is_geocode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::new(&server.uri(), Some("bad".into())).unwrap();
    let err = geocoder.geocode("94103").await.unwrap_err();

    assert!(err.to_string().contains("The provided API key is invalid."));
}
