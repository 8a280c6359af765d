//! End-to-end tests for the HTTP surface, driving the router in-process.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::Router;
use http_body_util::BodyExt;
use price_demo::config::Config;
use price_demo::state::AppContext;
use price_demo::web::create_router;
use price_demo::web::handlers::HealthResponse;
use tower::ServiceExt;

const BUNDLE: &str = r#"{
    "model": {"kind": "linear", "intercept": 20000.0, "coefficients": [100.0, 10000.0, 15000.0]},
    "features": ["SquareFeet", "Bedrooms", "Bathrooms"]
}"#;

const DEMO_CSV: &str = "\
SquareFeet,Bedrooms,Bathrooms,Neighborhood,ActualPrice
1500,3,2,Suburb,250000
2200,4,3,Urban,
900,2,1,Rural,130000
1200,,1,Rural,150000
";

/// Write both artifacts into a temp dir and build the app the way `main` does.
fn app(dir: &Path) -> Router {
    let model_path = dir.join("price_model.json");
    let demo_path = dir.join("demo_data.csv");
    std::fs::write(&model_path, BUNDLE).unwrap();
    std::fs::write(&demo_path, DEMO_CSV).unwrap();

    let config = Config {
        model_path,
        demo_path,
        ..Config::default()
    };
    create_router(Arc::new(AppContext::load(&config).unwrap()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn get_renders_form_with_labels() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path()), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Row 0 | Actual: $250,000"));
    assert!(body.contains("Row 1 | Actual: N/A"));
    assert!(body.contains("Row 2 | Actual: $130,000"));
    assert!(!body.contains("class=\"prediction\""));
}

#[tokio::test]
async fn empty_selection_matches_get() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (_, form) = send(app.clone(), get("/")).await;
    let (status, empty) = send(app.clone(), post_form("demo_index=")).await;
    let (_, absent) = send(app, post_form("")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(form, empty);
    assert_eq!(form, absent);
}

#[tokio::test]
async fn bodiless_post_matches_get() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (_, form) = send(app.clone(), get("/")).await;
    let bare = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, bare).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(form, body);
}

#[tokio::test]
async fn first_duplicate_field_wins() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path()), post_form("demo_index=1&demo_index=2")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<dd class=\"prediction\">$325,000</dd>"));
    assert!(body.contains("<option value=\"1\" selected>"));
    assert!(!body.contains("<option value=\"2\" selected>"));
}

#[tokio::test]
async fn multipart_form_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let body = "--XBOUNDARY\r\n\
                Content-Disposition: form-data; name=\"demo_index\"\r\n\
                \r\n\
                2\r\n\
                --XBOUNDARY--\r\n";
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
        .body(Body::from(body))
        .unwrap();
    let (status, page) = send(app.clone(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<dd class=\"prediction\">$145,000</dd>"));
    assert!(page.contains("<option value=\"2\" selected>"));

    // No boundary parameter: the body cannot be read.
    let broken = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "multipart/form-data")
        .body(Body::from("demo_index=2"))
        .unwrap();
    let (status, page) = send(app, broken).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(page.contains("could not read the submitted form"));
    assert!(!page.contains("class=\"result\""));
}

#[tokio::test]
async fn every_valid_row_gets_a_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    // Row 3 lacks Bedrooms and is covered separately.
    let expected = [
        (0, "$230,000", "<td>SquareFeet</td><td>1500</td>"),
        (1, "$325,000", "<td>SquareFeet</td><td>2200</td>"),
        (2, "$145,000", "<td>SquareFeet</td><td>900</td>"),
    ];
    for (index, prediction, first_feature) in expected {
        let (status, body) = send(app.clone(), post_form(&format!("demo_index={index}"))).await;
        assert_eq!(status, StatusCode::OK, "row {index}");
        assert!(
            body.contains(&format!("<dd class=\"prediction\">{prediction}</dd>")),
            "row {index}: {body}"
        );
        assert!(body.contains(&format!("<option value=\"{index}\" selected>")));

        let sqft = body.find(first_feature).unwrap();
        let beds = body.find("<td>Bedrooms</td>").unwrap();
        let baths = body.find("<td>Bathrooms</td>").unwrap();
        assert!(sqft < beds && beds < baths, "features out of order for row {index}");
        assert!(!body.contains("<td>Neighborhood</td>"));
    }
}

#[tokio::test]
async fn missing_actual_renders_na() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path()), post_form("demo_index=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<dd class=\"actual\">N/A</dd>"));
    assert!(!body.contains("<dd class=\"actual\">$0</dd>"));
}

#[tokio::test]
async fn out_of_range_index_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    for raw in ["4", "-1", "99999999999"] {
        let (status, body) = send(app.clone(), post_form(&format!("demo_index={raw}"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "index {raw}");
        assert!(body.contains("class=\"error\""));
        assert!(body.contains("the demo table has 4 rows"));
        assert!(!body.contains("class=\"prediction\""));
    }

    // Still serving afterwards.
    let (status, _) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_index_degrades_to_form() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path()), post_form("demo_index=abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("&#39;abc&#39; is not a valid row number"));
    assert!(body.contains("Row 0 | Actual: $250,000"));
    assert!(!body.contains("class=\"result\""));
}

#[tokio::test]
async fn row_with_missing_feature_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path()), post_form("demo_index=3")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("row 3 has no value for feature &#39;Bedrooms&#39;"));
    assert!(body.contains("<option value=\"3\" selected>"));
}

#[tokio::test]
async fn health_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path()), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(
        health,
        HealthResponse {
            status: "ok".into(),
            items: 4,
            features: 3,
        }
    );
}

#[test]
fn startup_fails_on_feature_column_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("price_model.json");
    let demo_path = dir.path().join("demo_data.csv");
    std::fs::write(&model_path, BUNDLE).unwrap();
    std::fs::write(&demo_path, "SquareFeet,Bedrooms,ActualPrice\n1000,2,100000\n").unwrap();

    let config = Config {
        model_path,
        demo_path,
        ..Config::default()
    };
    let err = AppContext::load(&config).unwrap_err();
    assert!(err.to_string().contains("'Bathrooms'"));
}

#[test]
fn startup_fails_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        model_path: dir.path().join("price_model.json"),
        demo_path: dir.path().join("demo_data.csv"),
        ..Config::default()
    };
    let err = AppContext::load(&config).unwrap_err();
    assert!(err.to_string().contains("artifact not found"));
}
