use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use mock_server::routes::{DogWithId, HeaderTestResponse};
use tower::ServiceExt;
use typed_route_core::ErrorBody;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- create ---

#[tokio::test]
async fn create_dog_returns_dog_with_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/dog",
            r#"{"name":"Scooby Doo","breed":"Great Dane"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let dog: DogWithId = body_json(resp).await;
    assert_eq!(dog.name, "Scooby Doo");
    assert_eq!(dog.breed, "Great Dane");
    assert_eq!(dog.id.len(), 32);
    assert!(dog.id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn create_dog_missing_field_returns_400_error_body() {
    let resp = app()
        .oneshot(json_request("POST", "/dog", r#"{"name":"Rex"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.status, 400);
    assert!(err.msg.contains("POST /dog"), "{}", err.msg);
}

#[tokio::test]
async fn create_dog_malformed_json_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/dog", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = body_json(resp).await;
    assert!(err.msg.starts_with("invalid JSON body"), "{}", err.msg);
}

#[tokio::test]
async fn create_dog_without_body_returns_400() {
    let resp = app().oneshot(json_request("POST", "/dog", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- list ---

#[tokio::test]
async fn list_dogs_empty() {
    let resp = app().oneshot(get("/dog")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let dogs: Vec<DogWithId> = body_json(resp).await;
    assert!(dogs.is_empty());
}

// --- get ---

#[tokio::test]
async fn get_dog_not_found_sends_error_body() {
    let resp = app().oneshot(get("/dog/not-a-real-dog")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(
        err,
        ErrorBody::new(404, "No dog with _id not-a-real-dog could be found")
    );
}

#[tokio::test]
async fn create_then_get_and_list_on_one_app() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/dog",
            r#"{"name":"Scooby Doo","breed":"Great Dane"}"#,
        ))
        .await
        .unwrap();
    let created: DogWithId = body_json(resp).await;

    let resp = app
        .clone()
        .oneshot(get(&format!("/dog/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: DogWithId = body_json(resp).await;
    assert_eq!(fetched, created);

    let resp = app.oneshot(get("/dog")).await.unwrap();
    let dogs: Vec<DogWithId> = body_json(resp).await;
    assert_eq!(dogs, vec![created]);
}

// --- headers ---

#[tokio::test]
async fn header_test_echoes_header() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/header-tst")
                .header("myheader", "hello")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["test-header"], "hello");
    let body: HeaderTestResponse = body_json(resp).await;
    assert_eq!(body.header_value.as_deref(), Some("hello"));
}

#[tokio::test]
async fn header_test_without_header() {
    let resp = app().oneshot(get("/header-tst")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("test-header").is_none());
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], br#"{"headerValue":null}"#);
}

// --- routing ---

#[tokio::test]
async fn wrong_method_returns_405() {
    let resp = app()
        .oneshot(json_request("PUT", "/dog", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
