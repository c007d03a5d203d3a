// Library root for the hit counter API

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use app::create_router;
pub use db::HitCounterStore;
pub use error::{ApiError, StoreError};
pub use models::{HitRecord, HitsReport};
