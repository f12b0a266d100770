// Port Layer - Interfaces for external dependencies

pub mod merge_executor;

// Re-exports
pub use merge_executor::MergeExecutor;
