//! Endpoint contracts for the dog service, shared by server and clients.

use serde::{Deserialize, Serialize};
use typed_route_core::{EmptyRequest, Endpoint, ErrorBody, Route};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    pub name: String,
    pub breed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DogWithId {
    pub name: String,
    pub breed: String,
    #[serde(rename = "_id")]
    pub id: String,
}

/// Headers every client sends through its default options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultHeaders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub myheader: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDogRequest {
    pub body: Dog,
}

pub struct CreateDog;

impl Endpoint for CreateDog {
    type Request = CreateDogRequest;
    type Response = DogWithId;
    type Error = ErrorBody;
    const ROUTE: Route = Route::post("/dog");
}

pub struct GetDogs;

impl Endpoint for GetDogs {
    type Request = EmptyRequest;
    type Response = Vec<DogWithId>;
    type Error = ErrorBody;
    const ROUTE: Route = Route::get("/dog");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogIdParams {
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDogRequest {
    pub params: DogIdParams,
}

impl GetDogRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            params: DogIdParams { id: id.into() },
        }
    }
}

pub struct GetDog;

impl Endpoint for GetDog {
    type Request = GetDogRequest;
    type Response = DogWithId;
    type Error = ErrorBody;
    const ROUTE: Route = Route::get("/dog/:_id");
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderTestRequest {
    #[serde(default)]
    pub headers: DefaultHeaders,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderTestResponse {
    #[serde(rename = "headerValue")]
    pub header_value: Option<String>,
}

pub struct HeaderTest;

impl Endpoint for HeaderTest {
    type Request = HeaderTestRequest;
    type Response = HeaderTestResponse;
    type Error = ErrorBody;
    const ROUTE: Route = Route::get("/header-tst");
}
