use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Types of session events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionEventType {
    /// Credentials exchanged for an API secret
    Login,
    /// User signed out
    Logout,
    /// Login refused by the collaborator
    FailedLogin,
    /// Stored secret dropped after the collaborator refused it or it was missing
    ForcedSignOut,
}

impl std::fmt::Display for SessionEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEventType::Login => write!(f, "LOGIN"),
            SessionEventType::Logout => write!(f, "LOGOUT"),
            SessionEventType::FailedLogin => write!(f, "FAILED_LOGIN"),
            SessionEventType::ForcedSignOut => write!(f, "FORCED_SIGN_OUT"),
        }
    }
}

/// Session event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub event_type: SessionEventType,
    /// Username or collaborator user id, if known
    pub user: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    /// Reason or collaborator message
    pub details: Option<String>,
    /// Collaborator action that triggered the event
    pub action: Option<String>,
}

impl SessionEvent {
    pub fn new(event_type: SessionEventType, user: Option<&str>, success: bool) -> Self {
        Self {
            event_type,
            user: user.map(String::from),
            timestamp: Utc::now(),
            success,
            details: None,
            action: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Log a session event as a structured record
pub fn log_session_event(event: SessionEvent) {
    let user = event.user.as_deref().unwrap_or("anonymous");
    let details = event.details.as_deref().unwrap_or("");
    let action = event.action.as_deref().unwrap_or("");

    if event.success {
        info!(
            event = %event.event_type,
            user,
            action,
            at = %event.timestamp.to_rfc3339(),
            "SESSION-LOG {}",
            details
        );
    } else {
        warn!(
            event = %event.event_type,
            user,
            action,
            at = %event.timestamp.to_rfc3339(),
            "SESSION-LOG {}",
            details
        );
    }
}

/// Log a successful login
pub fn log_successful_login(username: &str) {
    log_session_event(SessionEvent::new(SessionEventType::Login, Some(username), true));
}

/// Log a refused login
pub fn log_failed_login(username: &str, reason: &str) {
    log_session_event(
        SessionEvent::new(SessionEventType::FailedLogin, Some(username), false).with_details(reason),
    );
}

/// Log a logout
pub fn log_logout(user_id: &str) {
    log_session_event(SessionEvent::new(SessionEventType::Logout, Some(user_id), true));
}

/// Log a forced sign-out
pub fn log_forced_sign_out(user_id: &str, action: &str, reason: &str) {
    log_session_event(
        SessionEvent::new(SessionEventType::ForcedSignOut, Some(user_id), false)
            .with_action(action)
            .with_details(reason),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session_event() {
        let event = SessionEvent::new(SessionEventType::ForcedSignOut, Some("admin-user-001"), false)
            .with_action("getBloodRecords")
            .with_details("權限不足");

        assert_eq!(event.event_type, SessionEventType::ForcedSignOut);
        assert_eq!(event.user, Some("admin-user-001".to_string()));
        assert!(!event.success);
        assert_eq!(event.action, Some("getBloodRecords".to_string()));
        assert_eq!(event.details, Some("權限不足".to_string()));
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(SessionEventType::Login.to_string(), "LOGIN");
        assert_eq!(SessionEventType::Logout.to_string(), "LOGOUT");
        assert_eq!(SessionEventType::FailedLogin.to_string(), "FAILED_LOGIN");
        assert_eq!(SessionEventType::ForcedSignOut.to_string(), "FORCED_SIGN_OUT");
    }
}
