//! Scripted stand-in for git used by unit tests.
//!
//! `MockGit` keeps an "upstream" ref table. Cloning or fetching copies it into
//! the target directory's own table, so a mirror only sees upstream changes
//! after a fetch. Every invocation is recorded.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::git::GitRunner;
use crate::layout::STAGING_PREFIX;

pub const HASH_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const HASH_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const HASH_C: &str = "cccccccccccccccccccccccccccccccccccccccc";

#[derive(Debug, Clone)]
pub struct Call {
    pub args: Vec<String>,
    pub dir: Option<PathBuf>,
}

impl Call {
    pub fn subcommand(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Default)]
struct State {
    upstream: HashMap<String, String>,
    local: HashMap<PathBuf, HashMap<String, String>>,
    fail: HashMap<String, String>,
}

#[derive(Clone)]
pub struct MockGit {
    available: bool,
    state: Arc<Mutex<State>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockGit {
    /// Upstream with `HEAD` and `main` at [`HASH_A`], `dev` at [`HASH_B`].
    pub fn new() -> Self {
        let mock = Self {
            available: true,
            state: Arc::new(Mutex::new(State::default())),
            calls: Arc::new(Mutex::new(Vec::new())),
        };
        mock.set_upstream_ref("HEAD", HASH_A);
        mock.set_upstream_ref("main", HASH_A);
        mock.set_upstream_ref("dev", HASH_B);
        mock
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn set_upstream_ref(&self, name: &str, hash: &str) {
        self.state
            .lock()
            .unwrap()
            .upstream
            .insert(name.to_string(), hash.to_string());
    }

    /// Make every invocation of `subcommand` fail with `stderr`.
    pub fn fail_on(&self, subcommand: &str, stderr: &str) {
        self.state
            .lock()
            .unwrap()
            .fail
            .insert(subcommand.to_string(), stderr.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, subcommand: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.subcommand() == subcommand)
            .count()
    }

    /// Number of `clone --mirror` invocations.
    pub fn mirror_clones(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.subcommand() == "clone" && c.args.iter().any(|a| a == "--mirror"))
            .count()
    }

    /// Number of working-copy clones.
    pub fn snapshot_clones(&self) -> usize {
        self.count("clone") - self.mirror_clones()
    }
}

/// Clones land in a staging directory that is renamed afterwards; track
/// them under their final name.
fn canonical(path: &Path) -> PathBuf {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) if name.starts_with(STAGING_PREFIX) => {
            path.with_file_name(&name[STAGING_PREFIX.len()..])
        }
        _ => path.to_path_buf(),
    }
}

fn strip_peel(rev: &str) -> &str {
    rev.strip_suffix("^{commit}").unwrap_or(rev)
}

impl GitRunner for MockGit {
    fn is_available(&self) -> bool {
        self.available
    }

    fn run(&self, args: &[&str], working_dir: Option<&Path>) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push(Call {
            args: args.iter().map(|a| a.to_string()).collect(),
            dir: working_dir.map(Path::to_path_buf),
        });

        if !self.available {
            return Err(crate::git::tool_missing());
        }

        let fail = |stderr: String| Error::GitCommand {
            command: args.join(" "),
            location: working_dir
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| ".".to_string()),
            stderr,
        };

        let mut state = self.state.lock().unwrap();
        let subcommand = args.first().copied().unwrap_or_default();
        if let Some(stderr) = state.fail.get(subcommand) {
            return Err(fail(stderr.clone()));
        }

        match subcommand {
            "clone" => {
                let source = args[args.len() - 2];
                let target = PathBuf::from(args[args.len() - 1]);
                let refs = if args.contains(&"--mirror") {
                    state.upstream.clone()
                } else {
                    state
                        .local
                        .get(&canonical(Path::new(source)))
                        .cloned()
                        .ok_or_else(|| fail(format!("repository '{}' does not exist", source)))?
                };
                fs::create_dir_all(&target)?;
                fs::write(target.join("CONTENTS"), refs.get("HEAD").cloned().unwrap_or_default())?;
                state.local.insert(canonical(&target), refs);
                Ok(vec![])
            }
            "fetch" => {
                let dir = canonical(working_dir.expect("fetch runs inside the mirror"));
                let upstream = state.upstream.clone();
                state.local.insert(dir, upstream);
                Ok(vec![])
            }
            "rev-parse" => {
                let dir = &canonical(working_dir.expect("rev-parse runs inside a repository"));
                let rev = strip_peel(args[args.len() - 1]);
                let refs = state.local.get(dir).cloned().unwrap_or_default();
                match refs.get(rev) {
                    Some(hash) => Ok(vec![hash.clone()]),
                    None if refs.values().any(|h| h == rev) => Ok(vec![rev.to_string()]),
                    None => Err(fail(format!("fatal: Needed a single revision ({rev})"))),
                }
            }
            "cat-file" => {
                let dir = &canonical(working_dir.expect("cat-file runs inside a repository"));
                let rev = strip_peel(args[args.len() - 1]);
                let known = state
                    .local
                    .get(dir)
                    .map(|refs| refs.values().any(|h| h == rev))
                    .unwrap_or(false);
                if known {
                    Ok(vec![])
                } else {
                    Err(fail(format!("fatal: Not a valid object name {rev}")))
                }
            }
            "checkout" => {
                let dir = working_dir.expect("checkout runs inside a working copy");
                let rev = args[1..]
                    .iter()
                    .find(|a| !a.starts_with('-'))
                    .map(|a| a.to_string())
                    .unwrap_or_default();
                fs::write(dir.join("CONTENTS"), &rev)?;
                let dir = canonical(dir);
                if let Some(refs) = state.local.get_mut(&dir) {
                    refs.insert("HEAD".to_string(), rev);
                }
                Ok(vec![])
            }
            other => Err(fail(format!("unsupported mock command {other}"))),
        }
    }
}
