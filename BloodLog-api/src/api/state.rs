use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use blood_log_domain::services::ReadingServiceTrait;

/// Service type for dependency injection
pub type ReadingService = Arc<dyn ReadingServiceTrait>;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: ReadingService,
    /// Offset for calendar days in history and charts
    pub tz: FixedOffset,
    /// Description of the collaborator, shown by the health check
    pub collaborator: String,
    pub environment: String,
    clock: fn() -> DateTime<Utc>,
}

impl AppState {
    pub fn new(service: ReadingService, tz: FixedOffset) -> Self {
        Self {
            service,
            tz,
            collaborator: "unknown".to_string(),
            environment: "development".to_string(),
            clock: Utc::now,
        }
    }

    pub fn with_collaborator(mut self, collaborator: impl Into<String>) -> Self {
        self.collaborator = collaborator.into();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Replace the wall clock, for deterministic views in tests
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Current time in the configured offset
    pub fn now(&self) -> DateTime<FixedOffset> {
        (self.clock)().with_timezone(&self.tz)
    }
}
