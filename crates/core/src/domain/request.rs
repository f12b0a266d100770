// Invocation request: the three files handed to the merge executable

use crate::constants::{CURRENT_FILE_FLAG, GENERATED_FILE_FLAG, OUTPUT_FILE_FLAG};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// The three file arguments of one merge
///
/// Paths are opaque: existence, encoding and extension are never checked here.
/// The merge executable alone decides what they mean.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvocationRequest {
    current_file: PathBuf,
    generated_file: PathBuf,
    output_file: PathBuf,
}

impl InvocationRequest {
    /// # Arguments
    /// * `current_file` - File carrying the user's modifications
    /// * `generated_file` - Freshly generated file
    /// * `output_file` - Where the executable writes the merge result
    pub fn new(
        current_file: impl Into<PathBuf>,
        generated_file: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            current_file: current_file.into(),
            generated_file: generated_file.into(),
            output_file: output_file.into(),
        }
    }

    pub fn current_file(&self) -> &Path {
        &self.current_file
    }

    pub fn generated_file(&self) -> &Path {
        &self.generated_file
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Same request with every path joined onto `root`
    ///
    /// Uses `Path::join`, so an absolute file argument replaces `root`.
    pub fn resolve_against(&self, root: &Path) -> Self {
        Self {
            current_file: root.join(&self.current_file),
            generated_file: root.join(&self.generated_file),
            output_file: root.join(&self.output_file),
        }
    }

    /// Arguments following the executable on the command line
    ///
    /// Order and spelling are the executable's contract:
    /// `--current-file <c> --generated-file <g> --output-file <o>`
    pub fn command_args(&self) -> Vec<OsString> {
        vec![
            CURRENT_FILE_FLAG.into(),
            self.current_file.clone().into_os_string(),
            GENERATED_FILE_FLAG.into(),
            self.generated_file.clone().into_os_string(),
            OUTPUT_FILE_FLAG.into(),
            self.output_file.clone().into_os_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_order_and_spelling() {
        let request = InvocationRequest::new("lib/a.dart", "lib/a.g.dart", "lib/a.merged.dart");

        let args: Vec<String> = request
            .command_args()
            .into_iter()
            .map(|a| a.into_string().unwrap())
            .collect();

        assert_eq!(
            args,
            vec![
                "--current-file",
                "lib/a.dart",
                "--generated-file",
                "lib/a.g.dart",
                "--output-file",
                "lib/a.merged.dart",
            ]
        );
    }

    #[test]
    fn test_paths_are_not_validated() {
        let request = InvocationRequest::new("", "does/not/exist.txt", "weird name ü.dart");

        assert_eq!(request.current_file(), Path::new(""));
        assert_eq!(request.generated_file(), Path::new("does/not/exist.txt"));
        assert_eq!(request.output_file(), Path::new("weird name ü.dart"));
    }

    #[test]
    fn test_resolve_against_joins_each_path() {
        let root = Path::new("/work/project");
        let request = InvocationRequest::new("a", "b", "c").resolve_against(root);

        assert_eq!(request.current_file(), root.join("a"));
        assert_eq!(request.generated_file(), root.join("b"));
        assert_eq!(request.output_file(), root.join("c"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_against_keeps_absolute_paths() {
        let request = InvocationRequest::new("/abs/current.dart", "gen.dart", "out.dart")
            .resolve_against(Path::new("/root"));

        assert_eq!(request.current_file(), Path::new("/abs/current.dart"));
        assert_eq!(request.generated_file(), Path::new("/root/gen.dart"));
    }
}
