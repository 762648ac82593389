// ABOUTME: Command-line flags for kube-genkey.
// ABOUTME: Names come from --key-name or --repo-name; the rest configures cluster and tooling.

use crate::cluster::ClusterSource;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for each ssh-keygen / ssh-keyscan invocation, in seconds.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "kube-genkey",
    version,
    about = "Create SSH deploy keys as Kubernetes secrets and keep ssh-setup in sync"
)]
pub struct Cli {
    /// Name of key to create SSH key for (repeatable)
    #[arg(long = "key-name", value_name = "NAME", conflicts_with = "repo_names")]
    pub key_names: Vec<String>,

    /// Name of repository to create SSH key for (repeatable)
    #[arg(long = "repo-name", value_name = "NAME")]
    pub repo_names: Vec<String>,

    /// Tmpfs directory to use when generating keys
    #[arg(long, value_name = "DIR")]
    pub ssh_keygen_dir: PathBuf,

    /// Kubernetes configuration to use for out-of-cluster operation
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Address of the Kubernetes API server for out-of-cluster operation
    #[arg(long, value_name = "URL")]
    pub master: Option<String>,

    /// Seconds to wait for each ssh-keygen or ssh-keyscan call
    #[arg(
        long,
        value_name = "SECS",
        env = "GENKEY_COMMAND_TIMEOUT",
        default_value_t = DEFAULT_COMMAND_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub command_timeout: u64,

    /// ssh-keygen binary to run
    #[arg(long, value_name = "PATH", default_value = "ssh-keygen")]
    pub ssh_keygen_bin: String,

    /// ssh-keyscan binary to run
    #[arg(long, value_name = "PATH", default_value = "ssh-keyscan")]
    pub ssh_keyscan_bin: String,
}

impl Cli {
    /// The names to provision, in the order given.
    pub fn names(&self) -> &[String] {
        if self.key_names.is_empty() {
            &self.repo_names
        } else {
            &self.key_names
        }
    }

    pub fn cluster_source(&self) -> ClusterSource {
        ClusterSource::from_flags(self.kubeconfig.clone(), self.master.clone())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("kube-genkey").chain(args.iter().copied()))
    }

    #[test]
    fn test_repeated_key_names_keep_order() {
        let cli = parse(&[
            "--ssh-keygen-dir",
            "/dev/shm",
            "--key-name",
            "web",
            "--key-name",
            "api",
            "--key-name",
            "web",
        ])
        .expect("should parse");
        assert_eq!(cli.names(), ["web", "api", "web"]);
        assert_eq!(cli.ssh_keygen_dir, PathBuf::from("/dev/shm"));
    }

    #[test]
    fn test_repo_names() {
        let cli = parse(&["--ssh-keygen-dir", "/dev/shm", "--repo-name", "infra"])
            .expect("should parse");
        assert_eq!(cli.names(), ["infra"]);
    }

    #[test]
    fn test_key_and_repo_names_conflict() {
        let err = parse(&[
            "--ssh-keygen-dir",
            "/dev/shm",
            "--key-name",
            "a",
            "--repo-name",
            "b",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_keygen_dir_is_required() {
        let err = parse(&["--key-name", "a"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--ssh-keygen-dir", "/dev/shm"]).expect("should parse");
        assert!(cli.names().is_empty());
        assert_eq!(cli.ssh_keygen_bin, "ssh-keygen");
        assert_eq!(cli.ssh_keyscan_bin, "ssh-keyscan");
        assert_eq!(cli.cluster_source(), ClusterSource::InCluster);
    }

    #[test]
    fn test_explicit_timeout() {
        let cli = parse(&["--ssh-keygen-dir", "/dev/shm", "--command-timeout", "5"])
            .expect("should parse");
        assert_eq!(cli.command_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = parse(&["--ssh-keygen-dir", "/dev/shm", "--command-timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_out_of_cluster_flags() {
        let cli = parse(&[
            "--ssh-keygen-dir",
            "/dev/shm",
            "--kubeconfig",
            "/home/ci/.kube/config",
            "--master",
            "https://10.0.0.1:6443",
        ])
        .expect("should parse");
        assert_eq!(
            cli.cluster_source(),
            ClusterSource::Explicit {
                kubeconfig: Some(PathBuf::from("/home/ci/.kube/config")),
                master: Some("https://10.0.0.1:6443".to_string()),
            }
        );
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
