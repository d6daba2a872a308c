use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::types::{
    ErrorBody, ListPropertiesQuery, PropertyCollection, PropertyDefinition, PropertyRequest,
};
use crate::upstream::UpstreamResponse;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
};
use serde_json::{json, Value};
use tracing::warn;

async fn forward(state: &AppState, request: PropertyRequest) -> AppResult<UpstreamResponse> {
    state.metrics.increment_requests();

    match state.client.send(request).await {
        Ok(response) => {
            state.metrics.increment_success();
            Ok(response)
        }
        Err(err) => {
            state.metrics.increment_failure();
            Err(err.into())
        }
    }
}

/// Same leniency as a typical JSON body parser: a body that is empty or not
/// declared as JSON is forwarded as `{}` and left for HubSpot to judge.
/// Only a declared-JSON body that fails to parse is rejected here.
fn json_body(headers: &HeaderMap, body: &Bytes) -> AppResult<Value> {
    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }

    serde_json::from_slice(body).map_err(|err| {
        warn!("Rejecting request body: {}", err);
        AppError::InvalidBody(err)
    })
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[utoipa::path(
    post,
    path = "/hubspot/{object_type}/properties",
    params(("object_type" = String, Path, description = "CRM object type, e.g. contacts")),
    request_body = PropertyDefinition,
    responses(
        (status = 201, description = "Property created", body = PropertyDefinition),
        (status = 400, description = "Rejected by HubSpot, or malformed JSON", body = ErrorBody),
        (status = 500, description = "HubSpot unreachable", body = ErrorBody)
    ),
    tag = "Properties"
)]
pub async fn create_property_handler(
    State(state): State<AppState>,
    Path(object_type): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<UpstreamResponse> {
    let body = json_body(&headers, &body)?;
    forward(&state, PropertyRequest::create(object_type, body)).await
}

#[utoipa::path(
    get,
    path = "/hubspot/{object_type}/properties",
    params(
        ("object_type" = String, Path, description = "CRM object type, e.g. deals"),
        ListPropertiesQuery
    ),
    responses(
        (status = 200, description = "All properties of the object type", body = PropertyCollection),
        (status = 500, description = "HubSpot unreachable", body = ErrorBody)
    ),
    tag = "Properties"
)]
pub async fn list_properties_handler(
    State(state): State<AppState>,
    Path(object_type): Path<String>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<UpstreamResponse> {
    let Query(pairs) = query?;
    let archived = pairs
        .into_iter()
        .filter(|(key, _)| key == "archived")
        .map(|(_, value)| value)
        .collect();
    forward(&state, PropertyRequest::list(object_type, archived)).await
}

#[utoipa::path(
    get,
    path = "/hubspot/{object_type}/properties/{property_name}",
    params(
        ("object_type" = String, Path, description = "CRM object type"),
        ("property_name" = String, Path, description = "Internal property name")
    ),
    responses(
        (status = 200, description = "Property definition", body = PropertyDefinition),
        (status = 404, description = "No such property", body = ErrorBody)
    ),
    tag = "Properties"
)]
pub async fn get_property_handler(
    State(state): State<AppState>,
    Path((object_type, property_name)): Path<(String, String)>,
) -> AppResult<UpstreamResponse> {
    forward(&state, PropertyRequest::get(object_type, property_name)).await
}

#[utoipa::path(
    patch,
    path = "/hubspot/{object_type}/properties/{property_name}",
    params(
        ("object_type" = String, Path, description = "CRM object type"),
        ("property_name" = String, Path, description = "Internal property name")
    ),
    request_body(
        content = PropertyDefinition,
        description = "Any subset of a property definition"
    ),
    responses(
        (status = 200, description = "Updated property definition", body = PropertyDefinition),
        (status = 404, description = "No such property", body = ErrorBody)
    ),
    tag = "Properties"
)]
pub async fn update_property_handler(
    State(state): State<AppState>,
    Path((object_type, property_name)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<UpstreamResponse> {
    let body = json_body(&headers, &body)?;
    forward(&state, PropertyRequest::update(object_type, property_name, body)).await
}

#[utoipa::path(
    delete,
    path = "/hubspot/{object_type}/properties/{property_name}",
    params(
        ("object_type" = String, Path, description = "CRM object type"),
        ("property_name" = String, Path, description = "Internal property name")
    ),
    responses(
        (status = 204, description = "Property archived"),
        (status = 404, description = "No such property", body = ErrorBody)
    ),
    tag = "Properties"
)]
pub async fn delete_property_handler(
    State(state): State<AppState>,
    Path((object_type, property_name)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    forward(&state, PropertyRequest::delete(object_type, property_name)).await?;
    Ok(StatusCode::NO_CONTENT)
}
