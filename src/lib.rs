pub mod configuration;
pub mod domain;
pub mod email;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod wisher;
