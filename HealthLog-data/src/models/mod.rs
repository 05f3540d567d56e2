// Storage models
pub mod entry;

pub use entry::{Entry, EntryChanges, EntryData};
