// BloodLog Data
// This crate handles all traffic with the remote collaborator that owns persistence

// Wire models exchanged with the collaborator
pub mod models;

// Collaborator access (remote and in-memory)
pub mod repository;

// Stored API secret for the signed-in user
pub mod credentials;
