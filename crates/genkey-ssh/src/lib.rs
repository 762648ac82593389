// ABOUTME: SSH key material utilities for kube-genkey.
// ABOUTME: Wraps ssh-keygen and ssh-keyscan and renders the shared SSH client config.

pub mod command;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod keygen;
pub mod keyscan;
pub mod types;

pub use command::run_command;
pub use config::{build_config, CONFIG_HOST};
pub use error::{Result, SshError};
pub use fingerprint::parse_fingerprint;
pub use keygen::{GeneratedKey, KeyGenerationCapability, KeyGenerator, SshKeygen};
pub use keyscan::{HostKeyScanner, HostScanCapability, SshKeyscan, DEFAULT_SCAN_DOMAINS};
pub use types::{Fingerprint, HashAlgorithm, KeyPair, PublicKey};
