// ABOUTME: Error types for SSH key operations using thiserror.
// ABOUTME: Covers scratch allocation, external command failures, and output parsing.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while generating keys or scanning hosts.
#[derive(Error, Debug)]
pub enum SshError {
    /// Failed to allocate a scratch directory for key generation.
    #[error("failed to create scratch directory under {path}: {source}")]
    ScratchDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to start an external program.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An external program did not finish in time and was killed.
    #[error("{program} timed out after {}s", timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    /// An external program exited unsuccessfully.
    #[error("{program} failed ({status}): {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Failed to read a generated key file back from disk.
    #[error("failed to read SSH key from {path}: {source}")]
    ReadKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `ssh-keygen -y` failed; carries its output verbatim.
    #[error("{0}")]
    KeyExtraction(String),

    /// Fingerprint listing output did not have the expected shape.
    #[error("could not parse {algorithm} fingerprint: {line:?}")]
    FingerprintParse { algorithm: String, line: String },
}

/// Result type alias using SshError.
pub type Result<T> = std::result::Result<T, SshError>;
