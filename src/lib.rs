pub mod configuration;
pub mod crm;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
