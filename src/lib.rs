pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod state;
pub mod types;
pub mod upstream;

#[cfg(test)]
pub mod test_support;
