// ABOUTME: Idempotent provisioning of SSH keys and the shared ssh-setup record.
// ABOUTME: Generates each missing key once, then refreshes known_hosts and SSH config.

use crate::error::{ProvisionError, StoreError};
use crate::records::{self, RecordKeys, SSH_SETUP_RECORD};
use crate::store::RecordStore;
use genkey_ssh::{build_config, HashAlgorithm, HostKeyScanner, KeyGenerator};
use std::path::PathBuf;
use std::sync::Arc;

/// What happened to a single name during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A new keypair was generated and stored.
    Created,
    /// The private record was already present; nothing was done.
    AlreadyExists,
    /// The existence check failed; the name was skipped.
    Skipped(String),
}

/// Whether the ssh-setup record was created or overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    Created,
    Updated,
}

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// One entry per input name, in input order.
    pub keys: Vec<(String, KeyOutcome)>,
    pub setup: SetupOutcome,
}

impl ProvisionReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, KeyOutcome::Created))
    }

    pub fn existing(&self) -> usize {
        self.count(|o| matches!(o, KeyOutcome::AlreadyExists))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, KeyOutcome::Skipped(_)))
    }

    fn count(&self, pred: impl Fn(&KeyOutcome) -> bool) -> usize {
        self.keys.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Drives one provisioning run against a namespace.
///
/// Names are handled sequentially in the order given. A failed existence
/// check skips that name; any other failure aborts the run.
pub struct Provisioner {
    store: Arc<dyn RecordStore>,
    namespace: String,
    generator: KeyGenerator,
    scanner: HostKeyScanner,
    scratch_dir: PathBuf,
}

impl Provisioner {
    pub fn new(
        store: Arc<dyn RecordStore>,
        namespace: impl Into<String>,
        generator: KeyGenerator,
        scanner: HostKeyScanner,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            generator,
            scanner,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Ensure a key exists for every name, then refresh `ssh-setup`.
    ///
    /// # Errors
    /// Returns the first fatal `ProvisionError`; later names are not processed.
    pub async fn run<S: AsRef<str>>(&self, names: &[S]) -> Result<ProvisionReport, ProvisionError> {
        let mut keys = Vec::with_capacity(names.len());

        for name in names {
            let name = name.as_ref();
            let outcome = match self.ensure_key(name).await {
                Ok(outcome) => outcome,
                Err(e) if !e.is_fatal() => {
                    tracing::error!(name, namespace = %self.namespace, error = %e, "Skipping key");
                    KeyOutcome::Skipped(e.to_string())
                }
                Err(e) => return Err(e),
            };
            keys.push((name.to_string(), outcome));
        }

        let setup = self.refresh_setup(names).await?;
        Ok(ProvisionReport { keys, setup })
    }

    /// Check for, and if missing generate and store, the key for `name`.
    pub async fn ensure_key(&self, name: &str) -> Result<KeyOutcome, ProvisionError> {
        let record_keys = RecordKeys::for_name(name);

        let exists = self
            .store
            .secret_exists(&self.namespace, &record_keys.private)
            .await
            .map_err(|e| ProvisionError::StoreQuery {
                name: name.to_string(),
                source: e,
            })?;

        if exists {
            tracing::info!(name, namespace = %self.namespace, "Key already exists");
            return Ok(KeyOutcome::AlreadyExists);
        }

        tracing::info!(name, namespace = %self.namespace, "Creating key");
        let generated = self
            .generator
            .generate(&self.scratch_dir)
            .await
            .map_err(|e| ProvisionError::KeyGeneration {
                name: name.to_string(),
                source: e,
            })?;
        let key_pair = &generated.key_pair;

        let persist_error = |record: &str, source| ProvisionError::StorePersist {
            name: name.to_string(),
            record: record.to_string(),
            source,
        };

        self.store
            .create_secret(
                &self.namespace,
                &record_keys.private,
                records::private_payload(key_pair),
            )
            .await
            .map_err(|e| persist_error(&record_keys.private, e))?;

        let partial_error = |source| {
            tracing::error!(
                name,
                namespace = %self.namespace,
                created = %record_keys.private,
                missing = %record_keys.public,
                "Public record not stored; delete both records before retrying"
            );
            ProvisionError::PartialKey {
                name: name.to_string(),
                created: record_keys.private.clone(),
                missing: record_keys.public.clone(),
                source,
            }
        };

        let public = records::public_payload(key_pair)
            .map_err(|e| partial_error(StoreError::Backend(e.to_string())))?;
        self.store
            .create_config_map(&self.namespace, &record_keys.public, public)
            .await
            .map_err(partial_error)?;

        let fingerprint = key_pair
            .public_key
            .fingerprint(HashAlgorithm::Sha256)
            .map(|f| f.hash.as_str())
            .unwrap_or_default();
        tracing::info!(name, namespace = %self.namespace, fingerprint, "Created key");

        // Scratch copy of the private key goes away here.
        drop(generated);
        Ok(KeyOutcome::Created)
    }

    /// Rebuild known_hosts and SSH config for `names` and upsert `ssh-setup`.
    pub async fn refresh_setup<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<SetupOutcome, ProvisionError> {
        let known_hosts = self.scanner.scan().await.map_err(ProvisionError::HostScan)?;
        let config = build_config(names);
        let payload = records::setup_payload(known_hosts, config);

        let setup_error = |source| ProvisionError::SetupRecord {
            record: SSH_SETUP_RECORD.to_string(),
            source,
        };

        let exists = self
            .store
            .config_map_exists(&self.namespace, SSH_SETUP_RECORD)
            .await
            .map_err(setup_error)?;

        let outcome = if exists {
            self.store
                .update_config_map(&self.namespace, SSH_SETUP_RECORD, payload)
                .await
                .map_err(setup_error)?;
            SetupOutcome::Updated
        } else {
            self.store
                .create_config_map(&self.namespace, SSH_SETUP_RECORD, payload)
                .await
                .map_err(setup_error)?;
            SetupOutcome::Created
        };

        tracing::info!(
            namespace = %self.namespace,
            record = SSH_SETUP_RECORD,
            outcome = ?outcome,
            "Refreshed SSH setup"
        );
        Ok(outcome)
    }
}
