// Invoker constants (no magic values)

/// Default time the merge executable may run before it is killed (30s)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Flag naming the file carrying the user's modifications
pub const CURRENT_FILE_FLAG: &str = "--current-file";

/// Flag naming the freshly generated file
pub const GENERATED_FILE_FLAG: &str = "--generated-file";

/// Flag naming the file the executable writes the merge result to
pub const OUTPUT_FILE_FLAG: &str = "--output-file";

/// Exit code reported for a child terminated by signal N is `SIGNAL_EXIT_CODE_BASE + N`
/// (shell convention, e.g. 137 for SIGKILL)
pub const SIGNAL_EXIT_CODE_BASE: i32 = 128;

/// Exit code reported when the platform gives neither a code nor a signal
pub const UNKNOWN_EXIT_CODE: i32 = -1;
