// ABOUTME: Record store abstraction over namespaced Secrets and ConfigMaps.
// ABOUTME: KubeStore implements it against the Kubernetes API.

use crate::error::StoreError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::api::{ListParams, PostParams};
use kube::{Api, Client};
use std::collections::BTreeMap;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Namespaced key-value store holding opaque-byte records (Secrets) and
/// string-map records (ConfigMaps).
///
/// Existence checks and creates are separate calls; callers must not assume
/// any transactional guarantee between them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether a Secret named exactly `name` exists.
    async fn secret_exists(&self, namespace: &str, name: &str) -> Result<bool>;

    async fn create_secret(
        &self,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, Vec<u8>>,
    ) -> Result<()>;

    /// Whether a ConfigMap named exactly `name` exists.
    async fn config_map_exists(&self, namespace: &str, name: &str) -> Result<bool>;

    async fn create_config_map(
        &self,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, String>,
    ) -> Result<()>;

    /// Replace all data of an existing ConfigMap.
    async fn update_config_map(
        &self,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, String>,
    ) -> Result<()>;
}

/// `RecordStore` backed by the Kubernetes core/v1 API.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn config_maps(&self, namespace: &str) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// List parameters matching a single object by name.
fn single_object(name: &str) -> ListParams {
    ListParams::default().fields(&format!("metadata.name={name}"))
}

fn metadata(namespace: &str, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl RecordStore for KubeStore {
    async fn secret_exists(&self, namespace: &str, name: &str) -> Result<bool> {
        let secrets = self.secrets(namespace).list(&single_object(name)).await?;
        Ok(!secrets.items.is_empty())
    }

    async fn create_secret(
        &self,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, Vec<u8>>,
    ) -> Result<()> {
        let secret = Secret {
            metadata: metadata(namespace, name),
            data: Some(
                data.into_iter()
                    .map(|(key, value)| (key, ByteString(value)))
                    .collect(),
            ),
            ..Default::default()
        };
        self.secrets(namespace)
            .create(&PostParams::default(), &secret)
            .await?;
        Ok(())
    }

    async fn config_map_exists(&self, namespace: &str, name: &str) -> Result<bool> {
        let config_maps = self
            .config_maps(namespace)
            .list(&single_object(name))
            .await?;
        Ok(!config_maps.items.is_empty())
    }

    async fn create_config_map(
        &self,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, String>,
    ) -> Result<()> {
        let config_map = ConfigMap {
            metadata: metadata(namespace, name),
            data: Some(data),
            ..Default::default()
        };
        self.config_maps(namespace)
            .create(&PostParams::default(), &config_map)
            .await?;
        Ok(())
    }

    async fn update_config_map(
        &self,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, String>,
    ) -> Result<()> {
        let api = self.config_maps(namespace);
        // Keep the fetched resourceVersion so a concurrent writer causes a conflict.
        let mut config_map = api.get(name).await?;
        config_map.data = Some(data);
        config_map.binary_data = None;
        api.replace(name, &PostParams::default(), &config_map).await?;
        Ok(())
    }
}
