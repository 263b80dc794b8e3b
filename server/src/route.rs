use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{AppModule, Store};

pub use self::{customer::*, genre::*, movie::*, rental::*};

mod customer;
mod genre;
mod movie;
mod rental;

pub fn router<D: Store>(module: AppModule<D>) -> Router {
    Router::<AppModule<D>>::new()
        .route_genre()
        .route_movie()
        .route_customer()
        .route_rental()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new())
        .with_state(module)
}
