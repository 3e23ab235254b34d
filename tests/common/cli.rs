//! CLI test runner for the `booth` binary.
//!
//! Every run gets an isolated config home so a config file on the machine
//! running the tests is never picked up.

use std::collections::HashMap;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Runner for the compiled `booth` binary.
///
/// # Example
///
/// ```ignore
/// let cli = CliRunner::new();
/// cli.run_robot(&["version"]).assert_success();
/// ```
pub struct CliRunner {
    home: TempDir,
    env_vars: HashMap<String, String>,
}

impl Default for CliRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create temp home"),
            env_vars: HashMap::new(),
        }
    }

    /// Add an environment variable for command execution.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    /// The isolated home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        self.home.path()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("booth").expect("booth binary not built");
        cmd.env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("NO_COLOR", "true")
            .env("RUST_LOG", "off")
            .env_remove("BOOTH_CONFIG")
            .env_remove("BOOTH_FORMAT");
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        cmd
    }

    /// Execute the binary with the given arguments.
    ///
    /// # Panics
    ///
    /// Panics if the binary cannot be spawned.
    #[must_use]
    pub fn run(&self, args: &[&str]) -> CliResult {
        let output = self
            .command()
            .args(args)
            .output()
            .expect("Failed to execute booth");
        CliResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Execute with `--robot` for JSON output.
    #[must_use]
    pub fn run_robot(&self, args: &[&str]) -> CliResult {
        let mut full_args = vec!["--robot"];
        full_args.extend(args);
        self.run(&full_args)
    }

    /// Execute through assert_cmd's assertion API.
    pub fn assert(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert()
    }
}

/// Captured output of one run.
#[derive(Debug)]
pub struct CliResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub args: Vec<String>,
}

impl CliResult {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// # Panics
    ///
    /// Panics if the exit code is non-zero.
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success(),
            "booth {:?} exited with {}\nstdout:\n{}\nstderr:\n{}",
            self.args,
            self.exit_code,
            self.stdout,
            self.stderr
        );
        self
    }

    /// # Panics
    ///
    /// Panics if the exit code is zero.
    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.success(),
            "booth {:?} unexpectedly succeeded\nstdout:\n{}",
            self.args,
            self.stdout
        );
        self
    }

    pub fn assert_stdout_contains(&self, needle: &str) -> &Self {
        assert!(
            self.stdout.contains(needle),
            "stdout of booth {:?} lacks {needle:?}:\n{}",
            self.args,
            self.stdout
        );
        self
    }

    /// Parse stdout as one JSON document.
    ///
    /// # Panics
    ///
    /// Panics if stdout is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(self.stdout.trim())
            .unwrap_or_else(|e| panic!("Failed to parse JSON ({e}):\n{}", self.stdout))
    }

    /// Parse stderr as one JSON document.
    #[must_use]
    pub fn stderr_json(&self) -> Value {
        serde_json::from_str(self.stderr.trim())
            .unwrap_or_else(|e| panic!("Failed to parse stderr JSON ({e}):\n{}", self.stderr))
    }
}
