// ABOUTME: Resolves which cluster and namespace kube-genkey operates on.
// ABOUTME: In-cluster service account by default, kubeconfig/master when flags are given.

use crate::error::ConfigResolutionError;
use http::uri::InvalidUri;
use http::Uri;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::{Path, PathBuf};

/// Namespace of the pod's service account when running in-cluster.
pub const SERVICE_ACCOUNT_NAMESPACE_PATH: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Namespace used when only `--master` is given and no kubeconfig exists.
const FALLBACK_NAMESPACE: &str = "default";

/// Where cluster credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterSource {
    /// Service account token and namespace mounted into the pod.
    InCluster,
    /// Kubeconfig file (explicit path or default locations) with an optional
    /// API server override.
    Explicit {
        kubeconfig: Option<PathBuf>,
        master: Option<String>,
    },
}

impl ClusterSource {
    /// In-cluster unless either out-of-cluster flag is set.
    pub fn from_flags(kubeconfig: Option<PathBuf>, master: Option<String>) -> Self {
        if kubeconfig.is_none() && master.is_none() {
            ClusterSource::InCluster
        } else {
            ClusterSource::Explicit { kubeconfig, master }
        }
    }
}

/// A Kubernetes client together with the namespace all records live in.
#[derive(Clone)]
pub struct ClusterContext {
    pub client: Client,
    pub namespace: String,
}

impl ClusterContext {
    /// Resolve credentials and namespace once at startup.
    ///
    /// # Errors
    /// Returns `ConfigResolutionError` if no usable configuration or
    /// namespace can be found.
    pub async fn resolve(source: &ClusterSource) -> Result<Self, ConfigResolutionError> {
        let (config, namespace) = match source {
            ClusterSource::InCluster => {
                let config = Config::incluster()?;
                let namespace = read_namespace(Path::new(SERVICE_ACCOUNT_NAMESPACE_PATH)).await?;
                (config, namespace)
            }
            ClusterSource::Explicit { kubeconfig, master } => {
                explicit_config(kubeconfig.as_deref(), master.as_deref()).await?
            }
        };

        tracing::info!(cluster = %config.cluster_url, namespace = %namespace, "Resolved cluster configuration");

        let client = Client::try_from(config).map_err(ConfigResolutionError::Client)?;
        Ok(Self { client, namespace })
    }
}

/// Read and validate a mounted namespace file.
pub async fn read_namespace(path: &Path) -> Result<String, ConfigResolutionError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigResolutionError::Namespace {
            path: path.to_path_buf(),
            source: e,
        })?;

    let namespace = raw.trim();
    if namespace.is_empty() {
        return Err(ConfigResolutionError::EmptyNamespace(path.to_path_buf()));
    }
    Ok(namespace.to_string())
}

async fn explicit_config(
    kubeconfig: Option<&Path>,
    master: Option<&str>,
) -> Result<(Config, String), ConfigResolutionError> {
    let explicit_path = kubeconfig.is_some();
    let loaded = match kubeconfig {
        Some(path) => Kubeconfig::read_from(path),
        None => Kubeconfig::read(),
    };

    let kubeconfig = match (loaded, master) {
        (Ok(kubeconfig), _) => kubeconfig,
        // No kubeconfig to speak of: talk to the given server directly.
        (Err(e), Some(master)) if !explicit_path => {
            tracing::debug!(error = %e, "No default kubeconfig found, using --master only");
            let config = Config::new(parse_master(master)?);
            return Ok((config, FALLBACK_NAMESPACE.to_string()));
        }
        (Err(e), _) => return Err(e.into()),
    };

    let mut config =
        Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
    if let Some(master) = master {
        config.cluster_url = parse_master(master)?;
    }

    let namespace = config.default_namespace.clone();
    Ok((config, namespace))
}

fn parse_master(master: &str) -> Result<Uri, ConfigResolutionError> {
    master
        .parse()
        .map_err(|e: InvalidUri| ConfigResolutionError::InvalidMaster {
            url: master.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_no_flags_means_in_cluster() {
        assert_eq!(ClusterSource::from_flags(None, None), ClusterSource::InCluster);
    }

    #[test]
    fn test_kubeconfig_flag_means_explicit() {
        let source = ClusterSource::from_flags(Some(PathBuf::from("/etc/kube/config")), None);
        assert_eq!(
            source,
            ClusterSource::Explicit {
                kubeconfig: Some(PathBuf::from("/etc/kube/config")),
                master: None,
            }
        );
    }

    #[test]
    fn test_master_flag_means_explicit() {
        let source = ClusterSource::from_flags(None, Some("https://10.0.0.1:6443".to_string()));
        assert!(matches!(source, ClusterSource::Explicit { master: Some(_), .. }));
    }

    #[tokio::test]
    async fn test_read_namespace_trims_whitespace() {
        let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
        writeln!(file, "builds").expect("should write");

        let namespace = read_namespace(file.path()).await.expect("should read");
        assert_eq!(namespace, "builds");
    }

    #[tokio::test]
    async fn test_read_namespace_missing_file() {
        let dir = tempfile::TempDir::new().expect("should create temp dir");
        let err = read_namespace(&dir.path().join("namespace")).await.unwrap_err();
        assert!(matches!(err, ConfigResolutionError::Namespace { .. }));
    }

    #[tokio::test]
    async fn test_read_namespace_empty_file() {
        let file = tempfile::NamedTempFile::new().expect("should create temp file");
        let err = read_namespace(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigResolutionError::EmptyNamespace(_)));
    }

    #[test]
    fn test_parse_master_rejects_garbage() {
        let err = parse_master("http://exa mple").unwrap_err();
        assert!(matches!(err, ConfigResolutionError::InvalidMaster { .. }));
    }

    #[tokio::test]
    async fn test_explicit_kubeconfig_missing_file_fails() {
        let dir = tempfile::TempDir::new().expect("should create temp dir");
        let missing = dir.path().join("config");
        let err = explicit_config(Some(&missing), Some("https://10.0.0.1:6443"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigResolutionError::Kubeconfig(_)));
    }
}
