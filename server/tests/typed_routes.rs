use axum::extract::{Request as AxumRequest, State};
use axum::http::{self, HeaderValue, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use typed_route_axum::{
    send_error, typed_method_router, TypedRequest, TypedResponse, TypedRouter,
};
use typed_route_core::{EmptyRequest, Endpoint, ErrorBody, RequestOptions, Route};

#[derive(Debug, Serialize, Deserialize)]
struct ToyParams {
    owner: String,
    toy: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ToyQuery {
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    tag: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ToyHeaders {
    #[serde(rename = "x-trace")]
    trace: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ToyBody {
    squeaks: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct UpdateToyRequest {
    params: ToyParams,
    #[serde(default)]
    query: ToyQuery,
    #[serde(default)]
    headers: ToyHeaders,
    body: ToyBody,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct ToyEcho {
    owner: String,
    toy: String,
    color: Option<String>,
    tag: Vec<String>,
    trace: Option<String>,
    squeaks: bool,
}

struct UpdateToy;

impl Endpoint for UpdateToy {
    type Request = UpdateToyRequest;
    type Response = ToyEcho;
    type Error = ErrorBody;
    const ROUTE: Route = Route::put("/owner/:owner/toy/:toy");
}

#[derive(Clone)]
struct Limits {
    max_owner_len: usize,
}

async fn update_toy(
    State(limits): State<Limits>,
    TypedRequest(req): TypedRequest<UpdateToy>,
) -> TypedResponse<UpdateToy> {
    if req.params.owner.len() > limits.max_owner_len {
        return send_error(ErrorBody::new(422, "owner name too long"));
    }
    TypedResponse::ok(ToyEcho {
        owner: req.params.owner,
        toy: req.params.toy,
        color: req.query.color,
        tag: req.query.tag,
        trace: req.headers.trace,
        squeaks: req.body.squeaks,
    })
    .status(202)
    .header("x-handled-by", "update_toy")
}

fn app() -> Router {
    Router::new()
        .typed_route::<UpdateToy, _, _>(update_toy)
        .with_state(Limits { max_owner_len: 8 })
}

fn put(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("X-Trace", "abc")
        .body(body.to_string())
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn every_facet_reaches_the_handler() {
    let resp = app()
        .oneshot(put(
            "/owner/ann/toy/ball?color=red&tag=a&tag=b",
            r#"{"squeaks":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(resp.headers()["x-handled-by"], "update_toy");
    let echo: ToyEcho = body_json(resp).await;
    assert_eq!(
        echo,
        ToyEcho {
            owner: "ann".to_string(),
            toy: "ball".to_string(),
            color: Some("red".to_string()),
            tag: vec!["a".to_string(), "b".to_string()],
            trace: Some("abc".to_string()),
            squeaks: true,
        }
    );
}

#[tokio::test]
async fn single_query_value_fills_a_list_field() {
    let resp = app()
        .oneshot(put("/owner/ann/toy/ball?tag=a", r#"{"squeaks":false}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let echo: ToyEcho = body_json(resp).await;
    assert_eq!(echo.tag, vec!["a".to_string()]);
}

#[tokio::test]
async fn handler_error_uses_its_status() {
    let resp = app()
        .oneshot(put("/owner/bartholomew/toy/ball", r#"{"squeaks":false}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err, ErrorBody::new(422, "owner name too long"));
}

#[tokio::test]
async fn wrong_body_shape_is_rejected_with_error_body() {
    let resp = app()
        .oneshot(put("/owner/ann/toy/ball", r#"{"squeaks":"loud"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.status, 400);
    assert!(err.msg.contains("PUT /owner/:owner/toy/:toy"), "{}", err.msg);
}

// ---------------------------------------------------------------------------
// Non-string path and query fields
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct ThingParams {
    id: u64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct ThingQuery {
    page: u32,
    #[serde(default)]
    exact: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct GetThingRequest {
    params: ThingParams,
    query: ThingQuery,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Thing {
    id: u64,
    page: u32,
    exact: bool,
}

struct GetThing;

impl Endpoint for GetThing {
    type Request = GetThingRequest;
    type Response = Thing;
    type Error = ErrorBody;
    const ROUTE: Route = Route::get("/thing/:id");
}

struct Ping;

impl Endpoint for Ping {
    type Request = EmptyRequest;
    type Response = String;
    type Error = ErrorBody;
    const ROUTE: Route = Route::get("/ping");
}

async fn get_thing(TypedRequest(req): TypedRequest<GetThing>) -> TypedResponse<GetThing> {
    TypedResponse::ok(Thing {
        id: req.params.id,
        page: req.query.page,
        exact: req.query.exact,
    })
}

async fn ping(TypedRequest(_): TypedRequest<Ping>) -> TypedResponse<Ping> {
    TypedResponse::ok("pong".to_string())
}

async fn stamp(req: AxumRequest, next: Next) -> Response {
    let mut resp = next.run(req).await;
    resp.headers_mut().insert("x-stamped", HeaderValue::from_static("yes"));
    resp
}

fn things_app() -> Router {
    Router::new()
        .typed_service::<GetThing>(
            typed_method_router::<GetThing, _, _, ()>(get_thing).layer(middleware::from_fn(stamp)),
        )
        .typed_route::<Ping, _, _>(ping)
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

#[tokio::test]
async fn numeric_params_and_query_match_the_client_shape() {
    let request = GetThingRequest {
        params: ThingParams { id: 7 },
        query: ThingQuery {
            page: 2,
            exact: true,
        },
    };
    // The client sends these as JSON numbers and bools.
    let options = RequestOptions::from_request(&request).unwrap();
    assert_eq!(options.params["id"], 7);
    assert_eq!(options.query["page"], 2);

    let resp = things_app()
        .oneshot(get("/thing/7?page=2&exact=true"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let thing: Thing = body_json(resp).await;
    assert_eq!(
        thing,
        Thing {
            id: 7,
            page: 2,
            exact: true,
        }
    );
}

#[tokio::test]
async fn unparsable_numeric_param_is_rejected() {
    let resp = things_app()
        .oneshot(get("/thing/seven?page=2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = body_json(resp).await;
    assert!(err.msg.contains("GET /thing/:id"), "{}", err.msg);
}

#[tokio::test]
async fn undecodable_path_param_is_rejected() {
    let resp = things_app().oneshot(get("/thing/%FF?page=2")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = body_json(resp).await;
    assert!(err.msg.contains("invalid path parameters"), "{}", err.msg);
}

#[tokio::test]
async fn route_layer_runs_only_on_its_route() {
    let resp = things_app().oneshot(get("/thing/1?page=1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-stamped"], "yes");

    let resp = things_app().oneshot(get("/ping")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-stamped").is_none());
    let body: String = body_json(resp).await;
    assert_eq!(body, "pong");
}
