// Public entities for the HealthLog API
// This module contains data structures that are shared across the application boundary

// Entry request and response shapes
pub mod entry;

// Common entities for error handling and acknowledgements
pub mod common;
