// ABOUTME: kube-genkey library: SSH deploy key provisioning for Kubernetes namespaces.
// ABOUTME: Wires CLI flags, cluster resolution, record storage and the provisioner together.

pub mod cli;
pub mod cluster;
pub mod error;
pub mod provision;
pub mod records;
pub mod store;

pub use cli::Cli;
pub use cluster::{ClusterContext, ClusterSource};
pub use error::{ConfigResolutionError, ProvisionError, StoreError};
pub use provision::{KeyOutcome, ProvisionReport, Provisioner, SetupOutcome};
pub use records::RecordKeys;
pub use store::{KubeStore, RecordStore};

use anyhow::{Context, Result};
use genkey_ssh::{HostKeyScanner, KeyGenerator, SshKeygen, SshKeyscan};
use std::sync::Arc;

/// Run one provisioning pass with the given flags.
pub async fn run(cli: Cli) -> Result<ProvisionReport> {
    let context = ClusterContext::resolve(&cli.cluster_source())
        .await
        .context("Unable to connect to API server")?;

    let timeout = cli.command_timeout();
    let generator = KeyGenerator::new(Arc::new(SshKeygen::new(&cli.ssh_keygen_bin, timeout)));
    let scanner =
        HostKeyScanner::with_default_domains(Arc::new(SshKeyscan::new(&cli.ssh_keyscan_bin, timeout)));

    let provisioner = Provisioner::new(
        Arc::new(KubeStore::new(context.client)),
        context.namespace,
        generator,
        scanner,
        &cli.ssh_keygen_dir,
    );

    let report = provisioner.run(cli.names()).await?;

    tracing::info!(
        namespace = provisioner.namespace(),
        created = report.created(),
        existing = report.existing(),
        skipped = report.skipped(),
        "Provisioning complete"
    );
    Ok(report)
}
