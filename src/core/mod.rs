//! Message model, naming and configuration

pub mod config;
pub mod message;
pub mod queue_names;
pub mod request;
