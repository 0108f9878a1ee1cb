//! Domain layer health check functionality
//! This module reports the state of the session and the reading cache

use std::collections::HashMap;

use crate::services::{CollaboratorContact, ReadingServiceTrait};

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Get overall system health.
///
/// A signed-out session is degraded: the server runs but every data view
/// answers 401 until someone logs in. So is a collaborator whose last request
/// failed in transport, since views then fall back to the cache.
pub fn get_system_health(service: &dyn ReadingServiceTrait, collaborator: &str) -> SystemHealth {
    let session = if service.is_signed_in() {
        HealthComponent {
            status: ComponentStatus::Healthy,
            details: Some(format!("signed in as {}", service.user_id())),
        }
    } else {
        HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some("signed out".to_string()),
        }
    };

    let cache = match service.cached_readings() {
        Ok(readings) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: Some(format!("{} readings cached", readings.len())),
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(e.to_string()),
        },
    };

    let collaborator = match service.last_contact() {
        CollaboratorContact::Untried => HealthComponent {
            status: ComponentStatus::Healthy,
            details: Some(format!("{}, not contacted yet", collaborator)),
        },
        CollaboratorContact::Reachable => HealthComponent {
            status: ComponentStatus::Healthy,
            details: Some(format!("{}, last request answered", collaborator)),
        },
        CollaboratorContact::Unreachable(reason) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(format!("{}, last request failed: {}", collaborator, reason)),
        },
    };

    let statuses = [session.status, cache.status, collaborator.status];
    let overall_status = if statuses.contains(&ComponentStatus::Unhealthy) {
        SystemStatus::Unhealthy
    } else if statuses.contains(&ComponentStatus::Degraded) {
        SystemStatus::Degraded
    } else {
        SystemStatus::Healthy
    };

    SystemHealth {
        status: overall_status,
        components: vec![
            ("session".to_string(), session),
            ("cache".to_string(), cache),
            ("collaborator".to_string(), collaborator),
        ]
        .into_iter()
        .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ReadingService;
    use blood_log_data::credentials::CredentialStore;
    use blood_log_data::repository::InMemoryCollaborator;

    #[tokio::test]
    async fn test_get_system_health() {
        let service = ReadingService::new(
            InMemoryCollaborator::default(),
            CredentialStore::in_memory(),
            "admin-user-001",
        );

        let health = get_system_health(&service, "in-memory");
        assert_eq!(health.status, SystemStatus::Degraded);
        assert!(health.components.contains_key("collaborator"));

        service.login("admin", "admin").await.unwrap();
        let health = get_system_health(&service, "in-memory");
        assert_eq!(health.status, SystemStatus::Healthy);
        assert_eq!(
            health.components["session"].details.as_deref(),
            Some("signed in as admin-user-001")
        );
    }

    #[tokio::test]
    async fn test_failed_collaborator_request_degrades_health() {
        let collaborator = InMemoryCollaborator::default();
        let service = ReadingService::new(collaborator.clone(), CredentialStore::in_memory(), "admin-user-001");
        service.login("admin", "admin").await.unwrap();
        assert_eq!(
            health_status(&service).components["collaborator"].status,
            ComponentStatus::Healthy
        );

        collaborator.set_offline(true).unwrap();
        assert!(service.refresh_readings().await.is_err());

        let health = health_status(&service);
        assert_eq!(health.status, SystemStatus::Degraded);
        assert_eq!(health.components["collaborator"].status, ComponentStatus::Degraded);
        assert!(health.components["collaborator"]
            .details
            .as_deref()
            .unwrap()
            .starts_with("in-memory, last request failed"));

        collaborator.set_offline(false).unwrap();
        service.refresh_readings().await.unwrap();
        assert_eq!(health_status(&service).status, SystemStatus::Healthy);
    }

    fn health_status(service: &ReadingService<InMemoryCollaborator>) -> SystemHealth {
        get_system_health(service, "in-memory")
    }
}
