// Export handler modules
pub mod config;
pub mod entries;
