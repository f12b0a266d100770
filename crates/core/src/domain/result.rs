// Invocation result: what the merge executable reported about itself

use serde::Serialize;
use std::fmt;

/// Outcome of one completed run of the merge executable
///
/// Built once, after the child has exited and its output has been fully read.
/// There is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    /// `exit_code == 0`, nothing else
    pub success: bool,
    /// Raw exit code, passed through uninterpreted
    pub exit_code: i32,
    /// Combined stdout + stderr, one `\n`-terminated line per line produced
    pub output: String,
    /// Wall-clock time spent inside the invocation
    pub elapsed_ms: u64,
}

impl InvocationResult {
    pub fn from_exit(exit_code: i32, output: String, elapsed_ms: u64) -> Self {
        Self {
            success: exit_code == 0,
            exit_code,
            output,
            elapsed_ms,
        }
    }
}

impl fmt::Display for InvocationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InvocationResult(success={}, exit_code={}, elapsed={}ms)",
            self.success, self.exit_code, self.elapsed_ms
        )
    }
}
