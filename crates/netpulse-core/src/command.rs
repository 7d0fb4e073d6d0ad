//! Timed external command execution.
//!
//! Every measurement tool runs under a deadline. Stdout is drained on a
//! helper thread so a chatty tool cannot fill the pipe and stall, and the
//! child is killed and reaped if it overruns.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::ProbeError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A program and its arguments, plus extra environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Split a configured `[program, args...]` list. `None` when empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            env: Vec::new(),
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Exit status and captured stdout of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
}

impl CommandOutput {
    /// Stdout of a successful run, or an [`ProbeError::ExitStatus`].
    pub fn into_success(self, program: &str) -> Result<String, ProbeError> {
        if self.status.success() {
            Ok(self.stdout)
        } else {
            Err(ProbeError::ExitStatus {
                program: program.to_string(),
                status: self.status,
            })
        }
    }
}

/// Run `cmd` to completion or until `timeout` elapses.
pub fn run_timed(cmd: &CommandLine, timeout: Duration) -> Result<CommandOutput, ProbeError> {
    let t0 = Instant::now();
    debug!("running {} {}", cmd.program, cmd.args.join(" "));

    let mut child = Command::new(&cmd.program)
        .args(&cmd.args)
        .envs(cmd.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ProbeError::Spawn {
            program: cmd.program.clone(),
            source,
        })?;

    let reader = child.stdout.take().map(|mut stdout| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        })
    });

    let deadline = t0 + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    // The reader thread is detached; a grandchild may still hold the pipe.
                    drop(reader);
                    warn!("{} timed out after {:?}", cmd.program, timeout);
                    return Err(ProbeError::Timeout {
                        program: cmd.program.clone(),
                        timeout,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProbeError::Io {
                    program: cmd.program.clone(),
                    source,
                });
            }
        }
    };

    let bytes = match reader {
        Some(handle) => match handle.join() {
            Ok(Ok(buf)) => buf,
            Ok(Err(source)) => {
                return Err(ProbeError::Io {
                    program: cmd.program.clone(),
                    source,
                });
            }
            Err(_) => Vec::new(),
        },
        None => Vec::new(),
    };

    debug!(
        "{} exited with {} after {:?}",
        cmd.program,
        status,
        t0.elapsed()
    );
    Ok(CommandOutput {
        status,
        stdout: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
