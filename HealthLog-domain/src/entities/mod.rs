// Domain entities and value objects
pub mod entry;
pub mod conversions;

// Re-export common types for easier imports
pub use entry::{DateInput, Entry, EntryChanges, EntryData, EntryDraft, EntryRevision};
