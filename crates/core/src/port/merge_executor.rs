// Merge Executor Port
// Abstraction over "run the external merge executable once"

use crate::domain::{InvocationRequest, InvocationResult};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Merge Executor trait
///
/// Implementations:
/// - ProcessInvoker (infra-system): spawns the external executable
/// - MockMergeExecutor: scripted outcomes for tests
#[async_trait]
pub trait MergeExecutor: Send + Sync {
    /// Run the merge once and report how it ended
    ///
    /// A non-zero exit is `Ok` with `success == false`.
    ///
    /// # Errors
    /// - InvokeError::Io if the process cannot be started or its output read
    /// - InvokeError::Timeout if it outlives the configured timeout (it is killed first)
    async fn execute(&self, request: &InvocationRequest) -> Result<InvocationResult>;

    /// Merge `current_file` and `generated_file` into `output_file`
    async fn invoke(
        &self,
        current_file: &Path,
        generated_file: &Path,
        output_file: &Path,
    ) -> Result<InvocationResult> {
        let request = InvocationRequest::new(current_file, generated_file, output_file);
        self.execute(&request).await
    }

    /// Same as [`MergeExecutor::invoke`] with the three files joined onto `root`
    async fn invoke_relative(
        &self,
        root: &Path,
        current_file: &Path,
        generated_file: &Path,
        output_file: &Path,
    ) -> Result<InvocationResult> {
        let request =
            InvocationRequest::new(current_file, generated_file, output_file).resolve_against(root);
        self.execute(&request).await
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::InvokeError;
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Executable ran and exited with this code
        Exit { code: i32, output: String },
        /// Process could not be started
        SpawnFailure(String),
        /// Process outlived this timeout
        Timeout(Duration),
    }

    /// Mock Merge Executor for testing
    ///
    /// Records every request it receives.
    pub struct MockMergeExecutor {
        behavior: MockBehavior,
        requests: Arc<Mutex<Vec<InvocationRequest>>>,
    }

    impl MockMergeExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Exit {
                code: 0,
                output: "mock output\n".to_string(),
            })
        }

        pub fn new_exit(code: i32) -> Self {
            Self::new(MockBehavior::Exit {
                code,
                output: String::new(),
            })
        }

        pub fn requests(&self) -> Vec<InvocationRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }

    #[async_trait]
    impl MergeExecutor for MockMergeExecutor {
        async fn execute(&self, request: &InvocationRequest) -> Result<InvocationResult> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());

            match &self.behavior {
                MockBehavior::Exit { code, output } => {
                    Ok(InvocationResult::from_exit(*code, output.clone(), 1))
                }
                MockBehavior::SpawnFailure(msg) => {
                    Err(InvokeError::Io(std::io::Error::other(msg.clone())))
                }
                MockBehavior::Timeout(timeout) => Err(InvokeError::Timeout(*timeout)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::{MockBehavior, MockMergeExecutor};
    use super::*;
    use crate::error::InvokeError;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_invoke_builds_request_in_order() {
        let executor = MockMergeExecutor::new_success();

        let result = assert_ok!(
            executor
                .invoke(
                    Path::new("current.dart"),
                    Path::new("generated.dart"),
                    Path::new("merged.dart"),
                )
                .await
        );

        assert!(result.success);
        assert_eq!(
            executor.requests(),
            vec![InvocationRequest::new(
                "current.dart",
                "generated.dart",
                "merged.dart"
            )]
        );
    }

    #[tokio::test]
    async fn test_invoke_relative_matches_invoke_with_joined_paths() {
        let relative = MockMergeExecutor::new_success();
        let direct = MockMergeExecutor::new_success();
        let root = Path::new("/srv/app");

        relative
            .invoke_relative(root, Path::new("a"), Path::new("b"), Path::new("c"))
            .await
            .unwrap();
        direct
            .invoke(&root.join("a"), &root.join("b"), &root.join("c"))
            .await
            .unwrap();

        assert_eq!(relative.requests(), direct.requests());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let executor = MockMergeExecutor::new_exit(2);

        let result = assert_ok!(
            executor
                .invoke(Path::new("a"), Path::new("b"), Path::new("c"))
                .await
        );

        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
    }

    #[tokio::test]
    async fn test_errors_propagate_unchanged() {
        let timeout = MockMergeExecutor::new(MockBehavior::Timeout(Duration::from_secs(3)));
        let spawn = MockMergeExecutor::new(MockBehavior::SpawnFailure("no such file".into()));

        let err = assert_err!(timeout.invoke(Path::new("a"), Path::new("b"), Path::new("c")).await);
        assert!(matches!(err, InvokeError::Timeout(d) if d == Duration::from_secs(3)));

        let err = assert_err!(spawn.invoke(Path::new("a"), Path::new("b"), Path::new("c")).await);
        assert!(matches!(err, InvokeError::Io(_)));
        assert_eq!(spawn.call_count(), 1);
    }

    #[test]
    fn test_trait_is_object_safe() {
        let executor: Box<dyn MergeExecutor> = Box::new(MockMergeExecutor::new_success());
        let result = tokio_test::block_on(executor.invoke(
            Path::new("a"),
            Path::new("b"),
            Path::new("c"),
        ));
        assert!(result.is_ok());
    }
}
