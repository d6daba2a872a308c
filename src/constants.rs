/// HubSpot CRM v3 property-definition endpoint.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.hubapi.com/crm/v3/properties";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

pub const ACCESS_TOKEN_VAR: &str = "HUBSPOT_ACCESS_TOKEN";
pub const UPSTREAM_BASE_VAR: &str = "HUBSPOT_API_BASE";
pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "PORT";

/// Error payload used when the upstream gave us nothing to relay.
pub const UNKNOWN_ERROR: &str = "Unknown error";

pub const USER_AGENT: &str = concat!("hubspot-property-proxy/", env!("CARGO_PKG_VERSION"));
