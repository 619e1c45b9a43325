use std::path::PathBuf;

use super::fixtures_path;

pub fn two_hosts_config() -> PathBuf {
    fixtures_path().join("two-hosts.yaml")
}

pub fn minimal_config() -> PathBuf {
    fixtures_path().join("minimal.yaml")
}
