// Executable validation, run once when an invoker is built

use merge_invoker_core::{InvokeError, Result};
use std::path::Path;

/// Check that `path` names an existing regular file this process may execute
///
/// Symlinks are followed. On unix the check is `access(2)` with `X_OK`, so
/// it reflects the real uid/gid of the current process.
///
/// # Errors
/// InvokeError::Configuration naming the path and what is wrong with it
pub fn ensure_executable(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| InvokeError::configuration(path, format!("executable not found ({e})")))?;

    if !metadata.is_file() {
        return Err(InvokeError::configuration(path, "not a regular file"));
    }

    #[cfg(unix)]
    {
        use nix::unistd::{access, AccessFlags};

        access(path, AccessFlags::X_OK).map_err(|errno| {
            InvokeError::configuration(path, format!("no execute permission ({errno})"))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("dart-ast-merge");

        let err = ensure_executable(&missing).unwrap_err();

        assert!(matches!(err, InvokeError::Configuration { ref path, .. } if *path == missing));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_directory_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = ensure_executable(dir.path()).unwrap_err();

        assert!(err.to_string().contains("not a regular file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_without_execute_bit_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge.sh");
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = ensure_executable(&path).unwrap_err();

        assert!(err.to_string().contains("no execute permission"));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_shell_is_accepted() {
        assert!(ensure_executable(Path::new("/bin/sh")).is_ok());
    }
}
