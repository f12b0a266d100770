// Process invoker: runs the external merge executable once per call
// reason: tokio for async process management and timeouts
use async_trait::async_trait;
use std::io::PipeReader;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::executable::ensure_executable;
use crate::output_drain::drain_lines;
use merge_invoker_core::constants::{SIGNAL_EXIT_CODE_BASE, UNKNOWN_EXIT_CODE};
use merge_invoker_core::{
    InvocationRequest, InvocationResult, InvokeError, InvokerConfig, MergeExecutor, Result,
};

/// Process invoker
///
/// Holds a validated executable path and a timeout. Every call spawns a fresh
/// child with stderr merged into stdout, drains that stream on a separate
/// thread while waiting for exit, and kills the child if the timeout expires.
/// No state is shared between calls, so one invoker may serve concurrent callers.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    config: InvokerConfig,
}

impl ProcessInvoker {
    /// Create a new process invoker
    ///
    /// # Arguments
    /// * `config` - Executable path and timeout
    ///
    /// # Errors
    /// InvokeError::Configuration if the executable is missing, not a regular
    /// file, not executable by this process, or the timeout is zero.
    /// No process is started either way.
    ///
    /// # Example
    /// ```ignore
    /// let invoker = ProcessInvoker::new(
    ///     InvokerConfig::new("./dart-ast-merge").with_timeout(Duration::from_secs(10)),
    /// )?;
    /// ```
    pub fn new(config: InvokerConfig) -> Result<Self> {
        ensure_executable(&config.executable)?;

        if config.timeout.is_zero() {
            return Err(InvokeError::configuration(
                &config.executable,
                "timeout must be greater than zero",
            ));
        }

        Ok(Self { config })
    }

    /// Invoker for `executable` with the default 30s timeout
    pub fn from_path(executable: impl Into<PathBuf>) -> Result<Self> {
        Self::new(InvokerConfig::new(executable))
    }

    /// Build an invoker and run it once
    pub async fn invoke_once(
        executable: impl Into<PathBuf>,
        timeout: Duration,
        current_file: &Path,
        generated_file: &Path,
        output_file: &Path,
    ) -> Result<InvocationResult> {
        let invoker = Self::new(InvokerConfig::new(executable).with_timeout(timeout))?;
        invoker
            .invoke(current_file, generated_file, output_file)
            .await
    }

    pub fn executable(&self) -> &Path {
        &self.config.executable
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Blocking variant of [`MergeExecutor::invoke`] for callers without a runtime
    ///
    /// Drives the call on a private current-thread runtime, so it must not be
    /// called from inside an async context.
    pub fn invoke_blocking(
        &self,
        current_file: &Path,
        generated_file: &Path,
        output_file: &Path,
    ) -> Result<InvocationResult> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(self.invoke(current_file, generated_file, output_file))
    }

    /// Spawn the executable with stdout and stderr sharing one pipe
    fn spawn_merged(&self, request: &InvocationRequest) -> std::io::Result<(Child, PipeReader)> {
        let (reader, writer) = std::io::pipe()?;

        let mut command = Command::new(&self.config.executable);
        command
            .args(request.command_args())
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .kill_on_drop(true);

        // Own process group so a timeout kill also reaches anything the tool forked
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn()?;

        // `command` still owns the parent's copies of the writer; the drain
        // only sees EOF once they are closed
        drop(command);

        Ok((child, reader))
    }

    /// Kill the child (and its process group on unix) and reap it
    async fn terminate(&self, child: &mut Child, pid: Option<u32>) {
        #[cfg(unix)]
        {
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            match pid.and_then(|p| i32::try_from(p).ok()) {
                Some(pgid) => {
                    warn!(pid = %pgid, "Sending SIGKILL to process group");
                    if let Err(errno) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
                        warn!(pid = %pgid, error = %errno, "killpg failed, killing child directly");
                        let _ = child.start_kill();
                    }
                }
                None => {
                    let _ = child.start_kill();
                }
            }
        }

        #[cfg(not(unix))]
        {
            warn!(pid = ?pid, "Killing process");
            let _ = child.start_kill();
        }

        if let Err(e) = child.wait().await {
            warn!(pid = ?pid, error = %e, "Failed to reap killed process");
        }
    }
}

/// Exit code as reported to callers
///
/// A child killed by signal N reports `128 + N` on unix.
fn exit_code_of(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return SIGNAL_EXIT_CODE_BASE + signal;
        }
    }

    status.code().unwrap_or(UNKNOWN_EXIT_CODE)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl MergeExecutor for ProcessInvoker {
    async fn execute(&self, request: &InvocationRequest) -> Result<InvocationResult> {
        let started = Instant::now();

        info!(
            executable = %self.config.executable.display(),
            current_file = %request.current_file().display(),
            generated_file = %request.generated_file().display(),
            output_file = %request.output_file().display(),
            timeout_ms = %self.config.timeout.as_millis(),
            "Starting merge executable"
        );

        let (mut child, reader) = self.spawn_merged(request)?;
        let pid = child.id();

        let drain = tokio::task::spawn_blocking(move || drain_lines(reader));

        let completion = async {
            let status = child.wait().await?;
            let output = drain.await.map_err(std::io::Error::other)??;
            Ok::<_, std::io::Error>((status, output))
        };

        let outcome = timeout(self.config.timeout, completion).await;

        match outcome {
            Ok(Ok((status, output))) => {
                let result =
                    InvocationResult::from_exit(exit_code_of(status), output, elapsed_ms(started));

                info!(
                    pid = ?pid,
                    exit_code = %result.exit_code,
                    success = %result.success,
                    elapsed_ms = %result.elapsed_ms,
                    "Merge executable finished"
                );

                Ok(result)
            }
            Ok(Err(e)) => {
                warn!(pid = ?pid, error = %e, "Failed while waiting for merge executable");
                self.terminate(&mut child, pid).await;
                Err(InvokeError::Io(e))
            }
            Err(_) => {
                warn!(
                    pid = ?pid,
                    timeout_ms = %self.config.timeout.as_millis(),
                    "Merge executable timed out"
                );
                self.terminate(&mut child, pid).await;
                Err(InvokeError::Timeout(self.config.timeout))
            }
        }
    }
}
