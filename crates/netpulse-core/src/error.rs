//! Error types shared by the probes, the speed-test parser and config loading.
//!
//! None of these ever abort a monitoring cycle. The session logs them and the
//! affected source simply contributes no fields.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Failure while running an external measurement tool.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("`{program}` exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },

    #[error("probe is disabled: {0}")]
    Disabled(&'static str),

    #[error("I/O error while talking to `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while obtaining or decoding the local speed-test result.
#[derive(Debug, Error)]
pub enum SpeedTestError {
    #[error("speed-test output contained no JSON line")]
    NoJson,

    #[error("speed-test tool reported an error: {0}")]
    ToolReported(String),

    #[error("malformed speed-test JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// Failure while reading, parsing or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
