// Public modules
pub mod defaults;
pub mod error;
pub mod relations;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
