use crate::handlers::{
    create_property_handler, delete_property_handler, get_property_handler,
    list_properties_handler, update_property_handler,
};
use crate::observability::{health_handler, metrics_handler};
use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Route table shared by every entry point.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/hubspot/{object_type}/properties",
            get(list_properties_handler).post(create_property_handler),
        )
        .route(
            "/hubspot/{object_type}/properties/{property_name}",
            get(get_property_handler)
                .patch(update_property_handler)
                .delete(delete_property_handler),
        )
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
