use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::api::handlers::{self, AppState};
use crate::model::{EntityKind, Id, Record};
use crate::store::EntityStore;

pub fn create_router<S: EntityStore + 'static>() -> Router<AppState<S>> {
    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check));

    EntityKind::ALL
        .into_iter()
        .fold(router, collection_routes::<S>)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

/// `/<collection>` and `/<collection>/:id` for one entity kind.
fn collection_routes<S: EntityStore + 'static>(
    router: Router<AppState<S>>,
    kind: EntityKind,
) -> Router<AppState<S>> {
    let collection = format!("/{}", kind.route_segment());
    let member = format!("/{}/:id", kind.route_segment());

    router
        .route(
            &collection,
            get(move |state: State<AppState<S>>| handlers::list_records(state, kind)).post(
                move |state: State<AppState<S>>, payload: Result<Json<Record>, JsonRejection>| {
                    handlers::create_record(state, kind, payload)
                },
            ),
        )
        .route(
            &member,
            get(move |state: State<AppState<S>>, id: Path<Id>| {
                handlers::get_record(state, id, kind)
            })
            .put(
                move |state: State<AppState<S>>,
                      id: Path<Id>,
                      payload: Result<Json<Record>, JsonRejection>| {
                    handlers::update_record(state, id, kind, payload)
                },
            )
            .delete(move |state: State<AppState<S>>, id: Path<Id>| {
                handlers::delete_record(state, id, kind)
            }),
        )
}
