// ABOUTME: Value types for generated SSH key material.
// ABOUTME: KeyPair, PublicKey and per-algorithm Fingerprint records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Hash algorithms passed to `ssh-keygen -E` when listing fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha256,
}

impl HashAlgorithm {
    /// Every algorithm a `PublicKey` carries a fingerprint for.
    pub const ALL: [HashAlgorithm; 2] = [HashAlgorithm::Md5, HashAlgorithm::Sha256];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-auditable form of a public key under one hash algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub hash: String,
    pub randomart: String,
}

/// Public half of a generated key plus its fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub key: String,
    pub fingerprints: BTreeMap<HashAlgorithm, Fingerprint>,
}

impl PublicKey {
    pub fn fingerprint(&self, algorithm: HashAlgorithm) -> Option<&Fingerprint> {
        self.fingerprints.get(&algorithm)
    }
}

/// A freshly generated keypair. The private key is unencrypted OpenSSH PEM.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: Vec<u8>,
    pub public_key: PublicKey,
}

// Keep private key bytes out of logs.
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &format_args!("<{} bytes>", self.private_key.len()))
            .field("public_key", &self.public_key)
            .finish()
    }
}
