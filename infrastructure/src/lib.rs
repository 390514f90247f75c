//! Infrastructure layer for resolve
//!
//! Adapters implementing the application ports: HTTP transports for the
//! five provider APIs, the gateway wiring them to the panel, the figment
//! configuration loader, and the JSONL run logger.

pub mod config;
pub mod gateway;
pub mod http;
pub mod logging;

pub use config::file_config::FileConfig;
pub use config::loader::ConfigLoader;
pub use gateway::{HttpAdvocateGateway, HttpAssistGateway};
pub use http::ProviderTransport;
pub use logging::run_log::JsonlRunLogger;
