// Repository module structure
pub mod errors;
mod entry;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use entry::{EntryRepository, EntryRepositoryTrait};
