// ABOUTME: Shared logging setup for kube-genkey binaries
// ABOUTME: init_for() logs the named crates at INFO and keeps dependencies at WARN

use tracing_subscriber::EnvFilter;

/// Crate-filtered logging to stderr. Default: INFO for the named crates, WARN for
/// everything else (kube, hyper, tower). RUST_LOG directives are applied on top.
pub fn init_for(crate_names: &[&str]) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(crate_names))
        .with_writer(std::io::stderr)
        .init();
}

fn filter_for(crate_names: &[&str]) -> EnvFilter {
    crate_names.iter().fold(
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        |filter, name| match format!("{name}=info").parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    )
}
