//! External weaver invocation.
//!
//! The weaver is an opaque executable (noweave by default) that takes a
//! source file path and emits HTML on stdout. It is always spawned with a
//! discrete argument vector, never through a shell interpreter, and its
//! stdout is redirected straight into the destination file.
//!
//! A failed or killed weave can leave the destination empty or partial;
//! callers must not treat the destination as valid just because the weaver
//! ran.

use regex::Regex;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How often a time-limited weave polls the child for exit.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// Subprocess failures from the weaver.
#[derive(Debug, Error)]
pub enum WeaveError {
    #[error("could not run `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` {status}{}", format_stderr(.stderr))]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("`{program}` exceeded the {}s time limit and was killed", .limit.as_secs())]
    Timeout { program: String, limit: Duration },

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] io::Error),
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Invokes the external weaving executable.
#[derive(Debug, Clone)]
pub struct Weaver {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl Weaver {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Compile `source` into `dest`, blocking until the weaver exits.
    ///
    /// Spawns `program [args..] <source>` with stdout truncating `dest` and
    /// stderr captured for the error message. A configured timeout kills the
    /// child once exceeded.
    pub fn weave(&self, source: &Path, dest: &Path) -> Result<(), WeaveError> {
        let out = File::create(dest).map_err(|e| WeaveError::Io(dest.to_path_buf(), e))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(out)
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| WeaveError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        // Drain stderr off-thread so a chatty weaver cannot fill the pipe
        // and deadlock against our wait loop.
        let mut stderr_pipe = child.stderr.take();
        let stderr_handle = std::thread::spawn(move || {
            let mut buf = String::new();
            if let Some(ref mut pipe) = stderr_pipe {
                let _ = pipe.read_to_string(&mut buf);
            }
            buf
        });

        let status = match self.timeout {
            None => child.wait(),
            Some(limit) => {
                let deadline = Instant::now() + limit;
                loop {
                    match child.try_wait() {
                        Ok(Some(status)) => break Ok(status),
                        Ok(None) if Instant::now() >= deadline => {
                            let _ = child.kill();
                            let _ = child.wait();
                            let _ = stderr_handle.join();
                            return Err(WeaveError::Timeout {
                                program: self.program.clone(),
                                limit,
                            });
                        }
                        Ok(None) => std::thread::sleep(WAIT_POLL),
                        Err(e) => break Err(e),
                    }
                }
            }
        }
        .map_err(|e| WeaveError::Spawn {
            program: self.program.clone(),
            source: e,
        })?;

        let stderr = stderr_handle.join().unwrap_or_default();

        if !status.success() {
            return Err(WeaveError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
                stderr: strip_ansi(stderr.trim()).into_owned(),
            });
        }

        Ok(())
    }
}

/// Strip ANSI escape codes from string.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());
    re.replace_all(s, "")
}
