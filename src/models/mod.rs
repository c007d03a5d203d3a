// Models module

pub mod hits;

// Re-export commonly used types
pub use hits::{HealthResponse, HitRecord, HitsReport, WelcomeResponse};
