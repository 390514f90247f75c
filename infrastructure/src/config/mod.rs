//! Configuration: TOML file schema and the multi-source loader

pub mod file_config;
pub mod loader;
