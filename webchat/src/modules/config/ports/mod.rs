// Config Ports

mod config_repository;

pub use config_repository::*;
