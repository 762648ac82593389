// ABOUTME: Renders the shared SSH client configuration.
// ABOUTME: One Host alias per name, each pointing at that name's mounted identity.

use std::fmt::Write;

/// Real host every alias resolves to.
pub const CONFIG_HOST: &str = "github.com";

/// Build the SSH client config for `names`, one stanza per name in input order.
///
/// Each name gets a `github.com-<name>` alias so repositories can select
/// their deploy key by host name. Output is deterministic.
pub fn build_config<S: AsRef<str>>(names: &[S]) -> String {
    let mut config = String::new();

    for name in names {
        let name = name.as_ref();
        // Writing into a String cannot fail.
        let _ = writeln!(config, "Host {CONFIG_HOST}-{name}");
        let _ = writeln!(config, "    HostName {CONFIG_HOST}");
        let _ = writeln!(config, "    User git");
        let _ = writeln!(config, "    IdentityFile ~/.ssh/{name}/identity");
        config.push('\n');
    }

    config
}
