// ABOUTME: Error types for cluster resolution, record storage and provisioning.
// ABOUTME: Only store-query failures are per-name; everything else ends the run.

use genkey_ssh::SshError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a `RecordStore`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The Kubernetes API rejected or failed the request.
    #[error(transparent)]
    Kube(#[from] kube::Error),

    /// Failure reported by a non-Kubernetes store.
    #[error("{0}")]
    Backend(String),
}

/// Errors while working out which cluster and namespace to talk to.
#[derive(Error, Debug)]
pub enum ConfigResolutionError {
    #[error("unable to load in-cluster configuration: {0}")]
    InCluster(#[from] kube::config::InClusterError),

    #[error("unable to read namespace from {path}: {source}")]
    Namespace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("namespace file {0} is empty")]
    EmptyNamespace(PathBuf),

    #[error("unable to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("invalid API server address {url}: {message}")]
    InvalidMaster { url: String, message: String },

    #[error("unable to build Kubernetes client: {0}")]
    Client(#[source] kube::Error),
}

/// Errors from a provisioning run.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Existence check failed; the name is skipped and the run continues.
    #[error("unable to retrieve existing secret for {name}: {source}")]
    StoreQuery {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("unable to generate key {name}: {source}")]
    KeyGeneration {
        name: String,
        #[source]
        source: SshError,
    },

    #[error("unable to store {record} for key {name}: {source}")]
    StorePersist {
        name: String,
        record: String,
        #[source]
        source: StoreError,
    },

    /// The private record was stored but its public record was not, leaving
    /// `created` paired with whatever `missing` holds.
    #[error(
        "stored {created} but unable to store {missing} for key {name}: {source}; \
         delete both {created} and {missing} before retrying"
    )]
    PartialKey {
        name: String,
        created: String,
        missing: String,
        #[source]
        source: StoreError,
    },

    #[error("unable to scan host keys: {0}")]
    HostScan(#[source] SshError),

    #[error("unable to write {record}: {source}")]
    SetupRecord {
        record: String,
        #[source]
        source: StoreError,
    },
}

impl ProvisionError {
    /// Whether this error ends the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ProvisionError::StoreQuery { .. })
    }
}
