use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// The five property operations the proxy knows how to forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOperation {
    Create,
    List,
    Get,
    Update,
    Delete,
}

impl PropertyOperation {
    pub fn method(self) -> Method {
        match self {
            PropertyOperation::Create => Method::POST,
            PropertyOperation::List | PropertyOperation::Get => Method::GET,
            PropertyOperation::Update => Method::PATCH,
            PropertyOperation::Delete => Method::DELETE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyOperation::Create => "create",
            PropertyOperation::List => "list",
            PropertyOperation::Get => "get",
            PropertyOperation::Update => "update",
            PropertyOperation::Delete => "delete",
        }
    }
}

/// One inbound call, described in upstream terms.
#[derive(Debug, Clone)]
pub struct PropertyRequest {
    pub object_type: String,
    pub property_name: Option<String>,
    pub operation: PropertyOperation,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl PropertyRequest {
    pub fn create(object_type: String, body: Value) -> Self {
        Self {
            object_type,
            property_name: None,
            operation: PropertyOperation::Create,
            body: Some(body),
            query: Vec::new(),
        }
    }

    /// Every `archived` value the caller sent is forwarded, in order.
    pub fn list(object_type: String, archived: Vec<String>) -> Self {
        Self {
            object_type,
            property_name: None,
            operation: PropertyOperation::List,
            body: None,
            query: archived
                .into_iter()
                .map(|value| ("archived".to_string(), value))
                .collect(),
        }
    }

    pub fn get(object_type: String, property_name: String) -> Self {
        Self::named(object_type, property_name, PropertyOperation::Get, None)
    }

    pub fn update(object_type: String, property_name: String, body: Value) -> Self {
        Self::named(object_type, property_name, PropertyOperation::Update, Some(body))
    }

    pub fn delete(object_type: String, property_name: String) -> Self {
        Self::named(object_type, property_name, PropertyOperation::Delete, None)
    }

    fn named(
        object_type: String,
        property_name: String,
        operation: PropertyOperation,
        body: Option<Value>,
    ) -> Self {
        Self {
            object_type,
            property_name: Some(property_name),
            operation,
            body,
            query: Vec::new(),
        }
    }
}

/// Documents the list query. The handler reads raw pairs so a repeated
/// `archived` is forwarded rather than rejected.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPropertiesQuery {
    /// Return archived properties instead of active ones
    pub archived: Option<String>,
}

/// HubSpot property definition.
///
/// The proxy forwards request and response bodies untouched; this type only
/// documents the common fields for the OpenAPI document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    /// Internal property name, e.g. `age`
    pub name: String,
    /// Human readable label
    pub label: String,
    /// Data type: string, number, date, datetime, enumeration, bool
    #[serde(rename = "type")]
    pub property_type: String,
    /// How the property renders in HubSpot, e.g. `text` or `number`
    pub field_type: String,
    /// Property group the definition belongs to
    pub group_name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub options: Option<Vec<Value>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PropertyCollection {
    pub results: Vec<PropertyDefinition>,
}

/// Body returned for every failed proxied call.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Upstream error payload, or `"Unknown error"`
    #[schema(value_type = Object)]
    pub error: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_methods() {
        assert_eq!(PropertyOperation::Create.method(), Method::POST);
        assert_eq!(PropertyOperation::List.method(), Method::GET);
        assert_eq!(PropertyOperation::Get.method(), Method::GET);
        assert_eq!(PropertyOperation::Update.method(), Method::PATCH);
        assert_eq!(PropertyOperation::Delete.method(), Method::DELETE);
    }

    #[test]
    fn test_list_forwards_archived_only_when_present() {
        let with_flag = PropertyRequest::list("deals".to_string(), vec!["true".to_string()]);
        assert_eq!(
            with_flag.query,
            vec![("archived".to_string(), "true".to_string())]
        );

        let repeated = PropertyRequest::list(
            "deals".to_string(),
            vec!["true".to_string(), "false".to_string()],
        );
        assert_eq!(
            repeated.query,
            vec![
                ("archived".to_string(), "true".to_string()),
                ("archived".to_string(), "false".to_string()),
            ]
        );

        let without_flag = PropertyRequest::list("deals".to_string(), Vec::new());
        assert!(without_flag.query.is_empty());
        assert!(without_flag.property_name.is_none());
    }

    #[test]
    fn test_named_requests_carry_property_name() {
        let update = PropertyRequest::update(
            "contacts".to_string(),
            "age".to_string(),
            json!({"label": "Age (years)"}),
        );
        assert_eq!(update.property_name.as_deref(), Some("age"));
        assert_eq!(update.operation, PropertyOperation::Update);
        assert_eq!(update.body, Some(json!({"label": "Age (years)"})));

        let delete = PropertyRequest::delete("contacts".to_string(), "age".to_string());
        assert!(delete.body.is_none());
    }
}
