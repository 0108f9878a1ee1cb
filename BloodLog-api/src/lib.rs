// BloodLog-api lib.rs
//
// HTTP presentation layer for BloodLog: handlers, routing, configuration
// and the OpenAPI document.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
