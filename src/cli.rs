//! Command line flags, layered over the configuration file and the built-in defaults

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use vmdk_sanity::config::{ConfigError, SanityConfig, parse_driver_opt};

/// Sanity checks for a Docker volume driver.
///
/// Creates a volume on the first endpoint, touches and stats a file through it from two
/// containers, checks every endpoint lists it, removes it and checks it is gone everywhere.
#[derive(Parser, Debug)]
#[command(name = "vmdk-sanity", version, about, long_about = None)]
pub struct Cli {
    /// Endpoint (Host1) to connect to. Volumes are created and removed here.
    #[arg(long = "h1", visible_alias = "H1")]
    pub h1: Option<String>,

    /// Endpoint (Host2) to connect to.
    #[arg(long = "h2", visible_alias = "H2")]
    pub h2: Option<String>,

    /// Volume name to use in sanity tests.
    #[arg(short = 'v', long = "volume")]
    pub volume: Option<String>,

    /// Remove containers after they run. A bare `--rm` means true.
    #[arg(
        long = "rm",
        action = ArgAction::Set,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub rm: Option<bool>,

    /// Volume driver under test.
    #[arg(long)]
    pub driver: Option<String>,

    /// Driver option as key=value. Replaces the default options when given.
    #[arg(short = 'o', long = "opt", value_parser = parse_driver_opt)]
    pub opts: Vec<(String, String)>,

    /// Image to run touch/stat in.
    #[arg(long)]
    pub image: Option<String>,

    /// Per-request timeout in seconds. Waiting for a container to exit is not bounded.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Pin the engine API version, e.g. v1.22.
    #[arg(long)]
    pub api_version: Option<String>,

    /// YAML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Build the run configuration: defaults, then the config file, then flags
    pub fn into_config(self) -> Result<SanityConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SanityConfig::from_file(path)?,
            None => SanityConfig::default(),
        };

        if let Some(h1) = self.h1 {
            set_endpoint(&mut config.endpoints, 0, h1);
        }
        if let Some(h2) = self.h2 {
            set_endpoint(&mut config.endpoints, 1, h2);
        }
        if let Some(volume) = self.volume {
            config.volume_name = volume;
        }
        if let Some(rm) = self.rm {
            config.remove_containers = rm;
        }
        if let Some(driver) = self.driver {
            config.driver = driver;
        }
        if !self.opts.is_empty() {
            config.driver_opts = self.opts.into_iter().collect();
        }
        if let Some(image) = self.image {
            config.image = image;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if self.api_version.is_some() {
            config.api_version = self.api_version;
        }

        config.validate()?;
        Ok(config)
    }
}

fn set_endpoint(endpoints: &mut Vec<String>, idx: usize, addr: String) {
    match endpoints.get_mut(idx) {
        Some(slot) => *slot = addr,
        None => endpoints.push(addr),
    }
}
