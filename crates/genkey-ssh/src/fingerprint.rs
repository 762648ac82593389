// ABOUTME: Parses `ssh-keygen -l -v` output into a Fingerprint.
// ABOUTME: First line carries the hash, the rest is the random-art block.

use crate::error::{Result, SshError};
use crate::types::{Fingerprint, HashAlgorithm};
use regex::Regex;
use std::sync::LazyLock;

/// `<bits> <ALGO>:<hash> <comment> (<key type>)`
static FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([[:digit:]]+) ([^:]+):([^ ]+) (.*?) \(([^)]+)\)$")
        .unwrap_or_else(|e| panic!("fingerprint pattern is invalid: {e}"))
});

/// Whole match plus bits, algorithm, hash, comment and key type.
const CAPTURE_COUNT: usize = 6;

/// Parse the verbose fingerprint listing for one hash algorithm.
///
/// The hash is the part after the colon in the second field; everything after
/// the first newline is kept verbatim as the random art.
///
/// # Errors
/// Returns `SshError::FingerprintParse` when the output has no newline or the
/// first line does not match the expected field layout.
pub fn parse_fingerprint(algorithm: HashAlgorithm, output: &str) -> Result<Fingerprint> {
    let parse_error = |line: &str| SshError::FingerprintParse {
        algorithm: algorithm.to_string(),
        line: line.to_string(),
    };

    let (first_line, randomart) = output.split_once('\n').ok_or_else(|| parse_error(output))?;

    let captures = FIELD_PATTERN
        .captures(first_line)
        .filter(|c| c.len() == CAPTURE_COUNT)
        .ok_or_else(|| parse_error(first_line))?;

    Ok(Fingerprint {
        hash: captures[3].to_string(),
        randomart: randomart.to_string(),
    })
}
