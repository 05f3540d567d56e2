pub mod entry;

// Domain services
// This module contains the entry operations behind the HTTP handlers.

// Re-export service traits and factory functions
pub use entry::{create_default_entry_service, EntryService, EntryServiceError, EntryServiceTrait};
