// HealthLog Domain
// This crate contains the entry operations and input coercion for the HealthLog application

// Services that implement the entry operations
pub mod services;

// Domain entities
pub mod entities;

// Re-export the database module from health_log_data for convenience
pub use health_log_data::database;
