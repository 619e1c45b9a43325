use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Engine endpoint used when none is given
pub const DOCKER_UNIX_SOCKET: &str = "unix:///var/run/docker.sock";
/// Driver under test
pub const DRIVER_NAME: &str = "vmdk";
/// Parent directory of every in-container mount point
pub const DEFAULT_MOUNT_LOCATION: &str = "/mnt/vol";
pub const DEFAULT_VOLUME_NAME: &str = "TestVol";
pub const DEFAULT_IMAGE: &str = "busybox";
pub const DEFAULT_TOUCH_FILE: &str = "file_to_touch";
/// Request timeout handed to the client library, in seconds (container waits excepted)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse yaml: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Invalid driver option `{0}`, expected key=value")]
    InvalidDriverOpt(String),
    #[error("{0}")]
    Invalid(String),
}

/// Everything a sanity run needs to know, built once and passed by reference
///
/// Values come from [`SanityConfig::default`], optionally overlaid by a YAML file
/// ([`SanityConfig::from_file`]) and finally by command line flags.
///
/// ```yaml
/// endpoints:
///   - unix:///var/run/docker.sock
///   - tcp://10.0.0.2:2375
/// volume_name: TestVol
/// driver: vmdk
/// driver_opts:
///   size: 1gb
///   policy: good
/// remove_containers: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    /// Engine addresses; the first one is the master
    pub endpoints: Vec<String>,
    /// API version to pin, e.g. `v1.22`. The client library default is used when unset.
    pub api_version: Option<String>,
    /// Per-request timeout in seconds. The container wait is exempt and blocks until exit.
    pub timeout_secs: u64,
    pub volume_name: String,
    pub driver: String,
    pub driver_opts: HashMap<String, String>,
    pub image: String,
    pub mount_location: String,
    pub touch_file: String,
    /// Remove each container once it has exited
    pub remove_containers: bool,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![DOCKER_UNIX_SOCKET.to_string(), DOCKER_UNIX_SOCKET.to_string()],
            api_version: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            volume_name: DEFAULT_VOLUME_NAME.to_string(),
            driver: DRIVER_NAME.to_string(),
            driver_opts: default_driver_opts(),
            image: DEFAULT_IMAGE.to_string(),
            mount_location: DEFAULT_MOUNT_LOCATION.to_string(),
            touch_file: DEFAULT_TOUCH_FILE.to_string(),
            remove_containers: true,
        }
    }
}

fn default_driver_opts() -> HashMap<String, String> {
    HashMap::from([
        ("size".to_string(), "1gb".to_string()),
        ("policy".to_string(), "good".to_string()),
    ])
}

impl SanityConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// In-container mount point of `volume`
    #[must_use]
    pub fn mount_point(&self, volume: &str) -> String {
        format!("{}/{}", self.mount_location.trim_end_matches('/'), volume)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::Invalid("at least one endpoint is required".into()));
        }
        if self.volume_name.is_empty() {
            return Err(ConfigError::Invalid("volume name is empty".into()));
        }
        // Would break the `volume:mountpoint` bind spec
        if self.volume_name.contains([':', '/']) {
            return Err(ConfigError::Invalid(format!(
                "volume name `{}` must not contain ':' or '/'",
                self.volume_name
            )));
        }
        if !self.mount_location.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "mount location `{}` is not absolute",
                self.mount_location
            )));
        }
        if self.image.is_empty() {
            return Err(ConfigError::Invalid("image is empty".into()));
        }
        if self.driver.is_empty() {
            return Err(ConfigError::Invalid("driver is empty".into()));
        }
        Ok(())
    }
}

/// Parse a `key=value` driver option
pub fn parse_driver_opt(opt: &str) -> Result<(String, String), ConfigError> {
    match opt.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ConfigError::InvalidDriverOpt(opt.to_string())),
    }
}
