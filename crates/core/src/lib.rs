// Merge Invoker Core - Domain Types & Ports
// NO process or OS dependencies: the adapter lives in infra-system

pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod port;

pub use config::InvokerConfig;
pub use domain::{InvocationRequest, InvocationResult};
pub use error::{InvokeError, Result};
pub use port::MergeExecutor;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
