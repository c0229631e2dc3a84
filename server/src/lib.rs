//! Server-side half of typed routes for axum.
//!
//! # Overview
//! An [`Endpoint`](typed_route_core::Endpoint) declared once is registered
//! with [`TypedRouter::typed_route`], read with the [`TypedRequest`]
//! extractor and answered with a [`TypedResponse`]. Request, response and
//! error types are the endpoint's own, so a controller that compiles
//! speaks the same shapes as the client.
//!
//! ```ignore
//! async fn get_dog(
//!     State(db): State<Db>,
//!     TypedRequest(req): TypedRequest<GetDog>,
//! ) -> TypedResponse<GetDog> {
//!     match db.get(&req.params._id) {
//!         Some(dog) => TypedResponse::ok(dog),
//!         None => send_error(ErrorBody::new(404, "not found")),
//!     }
//! }
//!
//! let app = Router::new().typed_route::<GetDog, _, _>(get_dog).with_state(db);
//! ```

mod extract;
mod facet;
mod response;
mod router;

pub use extract::TypedRequest;
pub use response::{send_error, TypedResponse};
pub use router::{axum_path, method_filter, typed_method_router, TypedRouter};
