// Merge Invoker Infrastructure - System Adapters
// Implements: MergeExecutor

pub mod executable;
pub mod output_drain;
pub mod process_invoker;

pub use process_invoker::ProcessInvoker;
