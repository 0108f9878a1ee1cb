// Domain entities and value objects
pub mod conversions;
pub mod forms;
pub mod history;
pub mod medical;
pub mod reading;

// Re-export common types for easier imports
pub use forms::{Attachment, MedicalForm, ReadingForm};
pub use history::{Dashboard, HistoryBatch, HistoryEntry, HistoryRow, SeriesPoint};
pub use medical::MedicalRecord;
pub use reading::{DisplayReading, EffectiveReading, Measurement, Reading, StatusLevel, TimeSlot};
