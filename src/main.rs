use anyhow::Context;
use axum::http::Method;
use hubspot_property_proxy::config::ProxyConfig;
use hubspot_property_proxy::observability::{init_tracing, HealthStatus, MetricsResponse};
use hubspot_property_proxy::routes::create_router;
use hubspot_property_proxy::state::AppState;
use hubspot_property_proxy::types::{ErrorBody, PropertyCollection, PropertyDefinition};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        hubspot_property_proxy::handlers::create_property_handler,
        hubspot_property_proxy::handlers::list_properties_handler,
        hubspot_property_proxy::handlers::get_property_handler,
        hubspot_property_proxy::handlers::update_property_handler,
        hubspot_property_proxy::handlers::delete_property_handler,
        hubspot_property_proxy::observability::health_handler,
        hubspot_property_proxy::observability::metrics_handler
    ),
    components(schemas(
        PropertyDefinition,
        PropertyCollection,
        ErrorBody,
        HealthStatus,
        MetricsResponse
    )),
    tags(
        (name = "Properties", description = "HubSpot CRM property definitions"),
        (name = "Operations", description = "Health and metrics")
    ),
    info(
        title = "HubSpot Property Proxy",
        description = "Forwards property-definition calls to the HubSpot CRM v3 API",
        version = "0.1.0"
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ProxyConfig::from_env().context("failed to load configuration")?;
    info!(upstream = ?config.upstream, "Configuration loaded");

    let state =
        AppState::from_config(&config.upstream).context("failed to build HubSpot client")?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Property API: http://{}/hubspot/{{objectType}}/properties", addr);
    info!("Swagger UI: http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
