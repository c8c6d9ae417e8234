pub mod controller;
pub mod language;
pub mod pipeline;
pub mod routes;
pub mod schema;
pub mod store;
