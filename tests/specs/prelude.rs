//! Shared harness for CLI behavioral specs.
//!
//! Each `Env` is a fully isolated installation: its own state dir,
//! socket dir, and save root, with the daemon binary pinned to the one
//! built alongside the test. The daemon is stopped when the `Env` drops.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Upper bound for polling waits in specs
pub const SPEC_WAIT_MAX_MS: u64 = 5000;

/// Poll `cond` until it returns true or `max_ms` elapses
pub fn wait_for(max_ms: u64, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    cond()
}

/// An isolated becupe installation rooted in a temp directory
pub struct Env {
    root: TempDir,
}

impl Env {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let env = Self { root };
        for dir in ["state", "sockets", "dest"] {
            std::fs::create_dir_all(env.root.path().join(dir)).unwrap();
        }
        for game in ["My Summer Car", "My Winter Car"] {
            std::fs::create_dir_all(env.save_root().join("Amistech").join(game)).unwrap();
        }
        env
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.path().join("state")
    }

    pub fn socket_path(&self) -> PathBuf {
        self.root.path().join("sockets")
    }

    pub fn save_root(&self) -> PathBuf {
        self.root.path().join("saves")
    }

    /// Save directory for a game ("My Summer Car" / "My Winter Car")
    pub fn save_dir(&self, game: &str) -> PathBuf {
        self.save_root().join("Amistech").join(game)
    }

    /// Default destination folder for archives in specs
    pub fn dest(&self) -> PathBuf {
        self.root.path().join("dest")
    }

    /// Write a file under the env root, creating parent dirs
    pub fn file(&self, rel: impl AsRef<Path>, contents: &str) {
        let path = self.root.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    /// Build a `becupe` invocation against this env
    pub fn becupe(&self) -> Becupe {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin("becupe"));
        cmd.env("BECUPE_STATE_DIR", self.state_path())
            .env("BECUPE_SOCKET_DIR", self.socket_path())
            .env("BECUPE_SAVE_ROOT", self.save_root())
            .env(
                "BECUPE_DAEMON_BINARY",
                assert_cmd::cargo::cargo_bin("becuped"),
            )
            .env("HOME", self.root.path())
            .stdin(Stdio::null());
        Becupe { cmd, stdin: None }
    }
}

impl Drop for Env {
    fn drop(&mut self) {
        // Stop the daemon so the process doesn't outlive the temp dir
        let _ = self.becupe().cmd.args(["daemon", "stop"]).output();
    }
}

/// A single CLI invocation
pub struct Becupe {
    cmd: Command,
    stdin: Option<String>,
}

impl Becupe {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Feed the confirmation prompt through a pipe
    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.stdin(Stdio::piped());
        self.stdin = Some(input.to_string());
        self
    }

    fn run(mut self) -> Outcome {
        use std::io::Write;

        let output = match self.stdin {
            Some(payload) => {
                let mut child = self
                    .cmd
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .spawn()
                    .expect("spawn becupe");
                if let Some(mut stdin) = child.stdin.take() {
                    stdin.write_all(payload.as_bytes()).unwrap();
                }
                child.wait_with_output().expect("wait for becupe")
            }
            None => self.cmd.output().expect("run becupe"),
        };

        Outcome {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn passes(self) -> Outcome {
        let outcome = self.run();
        assert!(
            outcome.status.success(),
            "expected success, got {:?}\nstdout: {}\nstderr: {}",
            outcome.status.code(),
            outcome.stdout,
            outcome.stderr
        );
        outcome
    }

    pub fn fails(self) -> Outcome {
        let outcome = self.run();
        assert!(
            !outcome.status.success(),
            "expected failure, got success\nstdout: {}",
            outcome.stdout
        );
        outcome
    }
}

/// Captured output of a finished invocation
pub struct Outcome {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {:?}\nstdout: {}\nstderr: {}",
            needle,
            self.stdout,
            self.stderr
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout unexpectedly has {:?}\nstdout: {}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr missing {:?}\nstdout: {}\nstderr: {}",
            needle,
            self.stdout,
            self.stderr
        );
        self
    }
}
