// HealthLog Data
// This crate handles the SQLite store behind the health log

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
