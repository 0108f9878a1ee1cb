pub mod auth;
pub mod dashboard;
pub mod health;
pub mod history;
pub mod medical;
pub mod readings;

// Re-export handlers for easier imports
pub use auth::{login, logout, session};
pub use dashboard::{get_chart, get_dashboard};
pub use health::health_check;
pub use history::{get_history, get_history_years};
pub use medical::{create_medical_record, delete_medical_record, list_medical_records};
pub use readings::{create_reading, delete_reading, update_reading};
