// Config Infrastructure

mod memory_repository;
mod store_repository;

pub use memory_repository::*;
pub use store_repository::*;
