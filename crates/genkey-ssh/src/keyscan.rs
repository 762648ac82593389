// ABOUTME: Known-hosts collection through ssh-keyscan.
// ABOUTME: Scans a fixed domain list and returns the raw known_hosts text.

use crate::command::{check_status, run_command};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Hosts whose keys are pre-trusted in the shared known_hosts blob.
pub const DEFAULT_SCAN_DOMAINS: &[&str] = &["github.com"];

/// The operation kube-genkey needs from `ssh-keyscan`.
#[async_trait]
pub trait HostScanCapability: Send + Sync {
    /// Return known_hosts lines for `domains`.
    async fn scan(&self, domains: &[String]) -> Result<String>;
}

/// `HostScanCapability` backed by the `ssh-keyscan` binary.
#[derive(Debug, Clone)]
pub struct SshKeyscan {
    program: String,
    timeout: Duration,
}

impl SshKeyscan {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl HostScanCapability for SshKeyscan {
    async fn scan(&self, domains: &[String]) -> Result<String> {
        let output = run_command(&self.program, domains, self.timeout).await?;
        let output = check_status(&self.program, output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Scans a fixed, ordered list of domains.
#[derive(Clone)]
pub struct HostKeyScanner {
    capability: Arc<dyn HostScanCapability>,
    domains: Vec<String>,
}

impl HostKeyScanner {
    pub fn new(capability: Arc<dyn HostScanCapability>, domains: Vec<String>) -> Self {
        Self {
            capability,
            domains,
        }
    }

    /// Scanner for `DEFAULT_SCAN_DOMAINS`.
    pub fn with_default_domains(capability: Arc<dyn HostScanCapability>) -> Self {
        let domains = DEFAULT_SCAN_DOMAINS.iter().map(|d| d.to_string()).collect();
        Self::new(capability, domains)
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Collect the known_hosts blob for the configured domains.
    pub async fn scan(&self) -> Result<String> {
        tracing::debug!(domains = ?self.domains, "Scanning host keys");
        self.capability.scan(&self.domains).await
    }
}
