// BloodLog Domain
// This crate contains the business logic for the BloodLog application

// Pure aggregation and classification over readings
pub mod aggregation;

// Timestamp parsing shared by every view
pub mod timestamp;

// Services that implement business logic
pub mod services;

// Session events and login types
pub mod auth;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the collaborator layer for convenience
pub use blood_log_data::{credentials, repository};

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
