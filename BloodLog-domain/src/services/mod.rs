pub mod readings;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use readings::{CollaboratorContact, ReadingService, ReadingServiceTrait, ServiceError, DASHBOARD_RECENT_LIMIT, SUPPORTED_RANGES};

#[cfg(feature = "mock")]
pub use crate::testing::create_mock_reading_service;
