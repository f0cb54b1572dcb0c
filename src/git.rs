//! # Git Command Runner
//!
//! Everything this crate asks of git goes through the [`GitRunner`] trait:
//! "is git installed?" and "run these arguments, optionally inside this
//! directory, and give me stdout as lines". [`SystemGit`] implements it with
//! the system `git` executable, which automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig
//!
//! Tests substitute their own runner to count and script git invocations.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use log::debug;

use crate::error::{Error, Result};

/// Trait for git operations - allows mocking in tests
pub trait GitRunner: Send + Sync {
    /// Whether a usable git executable is present.
    fn is_available(&self) -> bool;

    /// Runs git with `args`, inside `working_dir` when given, and returns the
    /// lines of its standard output.
    ///
    /// A non-zero exit status is an error.
    fn run(&self, args: &[&str], working_dir: Option<&Path>) -> Result<Vec<String>>;
}

/// The default implementation of `GitRunner`, which uses the system's `git`
/// command.
#[derive(Debug, Default)]
pub struct SystemGit {
    program: OnceLock<Option<&'static str>>,
}

impl SystemGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// The executable name that answered `--version`, detected once.
    fn program(&self) -> Option<&'static str> {
        *self.program.get_or_init(|| {
            let candidates: &[&'static str] = if cfg!(windows) {
                &["git.cmd", "git"]
            } else {
                &["git"]
            };
            candidates.iter().copied().find(|candidate| {
                Command::new(candidate)
                    .arg("--version")
                    .output()
                    .map(|output| output.status.success())
                    .unwrap_or(false)
            })
        })
    }
}

impl GitRunner for SystemGit {
    fn is_available(&self) -> bool {
        self.program().is_some()
    }

    fn run(&self, args: &[&str], working_dir: Option<&Path>) -> Result<Vec<String>> {
        let program = self.program().ok_or_else(tool_missing)?;

        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }
        debug!(
            "Running git {} in {}",
            args.join(" "),
            working_dir
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| ".".to_string())
        );

        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                tool_missing()
            } else {
                Error::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::GitCommand {
                command: args.join(" "),
                location: working_dir
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|| ".".to_string()),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

/// Error returned when git cannot be found.
pub fn tool_missing() -> Error {
    Error::ToolMissing {
        tool: "git".to_string(),
        hint: Some(
            "Git packages need git to be installed and available on your PATH".to_string(),
        ),
    }
}

/// Re-labels a failed clone or fetch of `url`.
///
/// Unreachable remotes become [`Error::Network`]; authentication problems get
/// a [`Error::GitClone`] with a hint. Anything else passes through untouched.
pub fn classify_remote_error(url: &str, error: Error) -> Error {
    let stderr = match &error {
        Error::GitCommand { stderr, .. } => stderr.clone(),
        _ => return error,
    };

    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        return Error::GitClone {
            url: url.to_string(),
            message: stderr,
            hint: Some(
                "Make sure you have access to the repository. For private repos, ensure you \
                 have an SSH key added to ssh-agent, git credentials configured, or a \
                 personal access token set up"
                    .to_string(),
            ),
        };
    }

    if stderr.contains("Could not resolve host")
        || stderr.contains("unable to access")
        || stderr.contains("Connection refused")
        || stderr.contains("Connection timed out")
        || stderr.contains("Network is unreachable")
    {
        return Error::Network {
            url: url.to_string(),
            message: stderr,
        };
    }

    error
}

/// Whether `s` looks like a full commit hash (SHA-1 or SHA-256).
pub fn is_commit_hash(s: &str) -> bool {
    (s.len() == 40 || s.len() == 64) && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Path argument for a git command line.
pub fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_error(stderr: &str) -> Error {
        Error::GitCommand {
            command: "clone --mirror".to_string(),
            location: ".".to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_classify_auth_failure() {
        let err = classify_remote_error(
            "git@github.com:private/repo.git",
            command_error("fatal: Could not read from remote repository."),
        );
        match err {
            Error::GitClone { url, hint, .. } => {
                assert_eq!(url, "git@github.com:private/repo.git");
                assert!(hint.unwrap().contains("ssh-agent"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classify_network_failure() {
        let err = classify_remote_error(
            "https://nowhere.invalid/repo.git",
            command_error("fatal: unable to access 'https://nowhere.invalid/repo.git/': Could not resolve host: nowhere.invalid"),
        );
        assert!(matches!(err, Error::Network { .. }));
    }

    #[test]
    fn test_classify_other_failure_passes_through() {
        let err = classify_remote_error("repo.git", command_error("fatal: repository 'repo.git' does not exist"));
        assert!(matches!(err, Error::GitCommand { .. }));

        let err = classify_remote_error("repo.git", tool_missing());
        assert!(matches!(err, Error::ToolMissing { .. }));
    }

    #[test]
    fn test_is_commit_hash() {
        assert!(is_commit_hash("0123456789abcdef0123456789abcdef01234567"));
        assert!(is_commit_hash(&"a".repeat(64)));
        assert!(!is_commit_hash("main"));
        assert!(!is_commit_hash("0123456"));
        assert!(!is_commit_hash("g123456789abcdef0123456789abcdef01234567"));
    }

    #[test]
    fn test_system_git_reports_missing_tool_consistently() {
        let git = SystemGit::new();
        // Whatever the host has, availability and run() must agree.
        if !git.is_available() {
            let err = git.run(&["--version"], None).unwrap_err();
            assert!(matches!(err, Error::ToolMissing { .. }));
        } else {
            let lines = git.run(&["--version"], None).unwrap();
            assert!(lines[0].starts_with("git version"));
        }
    }
}
