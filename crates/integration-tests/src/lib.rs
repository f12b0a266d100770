//! Stub merge executables for black-box tests
//!
//! Every stub follows the real command-line contract
//! (`--current-file $2 --generated-file $4 --output-file $6`).
//! All stubs are written once per test binary, before any test spawns a
//! process, so no stub is ever exec'd while a write handle to it is open.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

/// Named stub executables
#[derive(Debug, Clone, Copy)]
pub enum Stub {
    /// Prints one line naming its files, exits 0
    Succeed,
    /// Prints to stderr, exits 3
    Conflict,
    /// Exits with the code given as the basename of `--current-file`
    ExitWith,
    /// Prints every argument it received, one per line
    EchoArgs,
    /// Writes its pid to `--output-file`, then sleeps for a minute
    Hang,
    /// Exits at once but leaves a background sleeper holding the output pipe
    Orphan,
    /// 30000 lines on stdout then 30000 on stderr
    Chatty,
    /// Sleeps one second, exits 0
    Nap,
    /// Writes "merged" to `--output-file`, exits 4 if it cannot
    Writer,
}

impl Stub {
    const ALL: [Stub; 9] = [
        Stub::Succeed,
        Stub::Conflict,
        Stub::ExitWith,
        Stub::EchoArgs,
        Stub::Hang,
        Stub::Orphan,
        Stub::Chatty,
        Stub::Nap,
        Stub::Writer,
    ];

    fn file_name(self) -> &'static str {
        match self {
            Stub::Succeed => "succeed",
            Stub::Conflict => "conflict",
            Stub::ExitWith => "exit-with",
            Stub::EchoArgs => "echo-args",
            Stub::Hang => "hang",
            Stub::Orphan => "orphan",
            Stub::Chatty => "chatty",
            Stub::Nap => "nap",
            Stub::Writer => "writer",
        }
    }

    fn script(self) -> &'static str {
        match self {
            Stub::Succeed => "#!/bin/sh\necho \"merging $2 and $4 into $6\"\nexit 0\n",
            Stub::Conflict => "#!/bin/sh\necho \"unresolved conflict in $2\" >&2\nexit 3\n",
            Stub::ExitWith => "#!/bin/sh\nexit \"$(basename \"$2\")\"\n",
            Stub::EchoArgs => "#!/bin/sh\nfor arg in \"$@\"; do echo \"$arg\"; done\n",
            Stub::Hang => "#!/bin/sh\necho $$ > \"$6\"\nexec sleep 60\n",
            Stub::Orphan => "#!/bin/sh\nsleep 60 &\necho detached\nexit 0\n",
            Stub::Chatty => "#!/bin/sh\nseq 1 30000\nseq 30001 60000 >&2\n",
            Stub::Nap => "#!/bin/sh\nsleep 1\nexit 0\n",
            Stub::Writer => "#!/bin/sh\necho merged > \"$6\" || exit 4\n",
        }
    }

    /// Absolute path of the stub
    pub fn path(self) -> PathBuf {
        stub_dir().join(self.file_name())
    }
}

fn stub_dir() -> &'static Path {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = tempfile::tempdir().expect("create stub dir");
        for stub in Stub::ALL {
            write_executable(&dir.path().join(stub.file_name()), stub.script());
        }
        dir
    })
    .path()
}

/// Write `body` to `path` with mode 0755
pub fn write_executable(path: &Path, body: &str) {
    std::fs::write(path, body).expect("write stub");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).expect("chmod stub");
}

/// Is `pid` still a live process?
pub fn is_alive(pid: i32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid), None).is_ok()
}
