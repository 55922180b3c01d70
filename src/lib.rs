pub mod clients;
pub mod config;
pub mod decoder;
pub mod dispatcher;
pub mod error;
pub mod mapper;
pub mod models;
pub mod telemetry;
pub mod template;
pub mod utils;
pub mod worker;
