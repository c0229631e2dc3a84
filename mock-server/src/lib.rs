use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, Router};
use tokio::{net::TcpListener, sync::RwLock};
use typed_route_axum::{send_error, TypedRequest, TypedResponse, TypedRouter};
use typed_route_core::ErrorBody;
use uuid::Uuid;

pub mod routes;

use routes::{CreateDog, DogWithId, GetDog, GetDogs, HeaderTest, HeaderTestResponse};

pub type Db = Arc<RwLock<HashMap<String, DogWithId>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::<Db>::new()
        .typed_route::<CreateDog, _, _>(create_dog)
        .typed_route::<GetDogs, _, _>(list_dogs)
        .typed_route::<GetDog, _, _>(get_dog)
        .typed_route::<HeaderTest, _, _>(header_test)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn create_dog(
    State(db): State<Db>,
    TypedRequest(req): TypedRequest<CreateDog>,
) -> TypedResponse<CreateDog> {
    let dog = DogWithId {
        id: Uuid::new_v4().simple().to_string(),
        name: req.body.name,
        breed: req.body.breed,
    };
    db.write().await.insert(dog.id.clone(), dog.clone());
    tracing::debug!(id = %dog.id, "created dog");
    TypedResponse::ok(dog)
}

async fn list_dogs(State(db): State<Db>, _req: TypedRequest<GetDogs>) -> TypedResponse<GetDogs> {
    let dogs = db.read().await;
    TypedResponse::ok(dogs.values().cloned().collect())
}

async fn get_dog(
    State(db): State<Db>,
    TypedRequest(req): TypedRequest<GetDog>,
) -> TypedResponse<GetDog> {
    let id = req.params.id;
    let found = db.read().await.get(&id).cloned();
    match found {
        Some(dog) => TypedResponse::ok(dog),
        None => send_error(ErrorBody::new(404, format!("No dog with _id {id} could be found"))),
    }
}

async fn header_test(TypedRequest(req): TypedRequest<HeaderTest>) -> TypedResponse<HeaderTest> {
    let value = req.headers.myheader;
    let response = TypedResponse::ok(HeaderTestResponse {
        header_value: value.clone(),
    });
    match value {
        Some(value) => response.header("test-header", value),
        None => response,
    }
}
