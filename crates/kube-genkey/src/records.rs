// ABOUTME: Naming and payload layout of the records kube-genkey writes.
// ABOUTME: Per-key Secret/ConfigMap pairs plus the shared ssh-setup ConfigMap.

use genkey_ssh::KeyPair;
use std::collections::BTreeMap;

/// Secret field holding the private key.
pub const IDENTITY_FIELD: &str = "identity";
/// ConfigMap field holding the public key text.
pub const PUBLIC_KEY_FIELD: &str = "publicKey";
/// ConfigMap field holding the JSON fingerprint map.
pub const FINGERPRINTS_FIELD: &str = "fingerprints";

/// Name of the shared setup ConfigMap.
pub const SSH_SETUP_RECORD: &str = "ssh-setup";
pub const KNOWN_HOSTS_FIELD: &str = "known_hosts";
pub const CONFIG_FIELD: &str = "config";

/// Store names derived from a key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKeys {
    /// `<name>-ssh`, the Secret holding the private key.
    pub private: String,
    /// `<name>-ssh.pub`, the ConfigMap holding the public key.
    pub public: String,
}

impl RecordKeys {
    pub fn for_name(name: &str) -> Self {
        let private = format!("{name}-ssh");
        let public = format!("{private}.pub");
        Self { private, public }
    }
}

/// Secret payload for a generated key.
pub fn private_payload(key_pair: &KeyPair) -> BTreeMap<String, Vec<u8>> {
    BTreeMap::from([(IDENTITY_FIELD.to_string(), key_pair.private_key.clone())])
}

/// ConfigMap payload for a generated key.
///
/// # Errors
/// Returns an error if the fingerprints cannot be serialized.
pub fn public_payload(key_pair: &KeyPair) -> serde_json::Result<BTreeMap<String, String>> {
    let fingerprints = serde_json::to_string(&key_pair.public_key.fingerprints)?;
    Ok(BTreeMap::from([
        (
            PUBLIC_KEY_FIELD.to_string(),
            key_pair.public_key.key.clone(),
        ),
        (FINGERPRINTS_FIELD.to_string(), fingerprints),
    ]))
}

/// Payload of the shared `ssh-setup` ConfigMap.
pub fn setup_payload(known_hosts: String, config: String) -> BTreeMap<String, String> {
    BTreeMap::from([
        (KNOWN_HOSTS_FIELD.to_string(), known_hosts),
        (CONFIG_FIELD.to_string(), config),
    ])
}
