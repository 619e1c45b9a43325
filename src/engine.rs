//! The slice of the Docker Engine API a sanity run consumes
//!
//! [`EngineClient`] is implemented for [`bollard::Docker`]; the orchestrator is generic over it
//! so tests can substitute an in-memory engine.

use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, RemoveContainerOptions, StartContainerOptions,
    WaitContainerOptions,
};
use bollard::errors::Error;
use bollard::models::{ContainerCreateResponse, HostConfig};
use bollard::volume::{CreateVolumeOptions, ListVolumesOptions};
use futures_util::StreamExt;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::VolumeBind;

/// Request timeout for the container wait, which blocks until the container exits
const WAIT_TIMEOUT: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A volume as reported by an engine's volume listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeRecord {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
}

/// What to run in a throwaway container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSpec {
    pub image: String,
    pub cmd: Vec<String>,
    /// In-container paths declared as volumes
    pub volumes: Vec<String>,
    pub binds: Vec<String>,
}

impl ContainerSpec {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }

    /// Set the command to run
    ///
    /// NOTE: This will override any existing command
    pub fn cmd(&mut self, cmd: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.cmd = cmd.into_iter().map(Into::into).collect();
        self
    }

    /// Declare `bind.mount_point` as a volume and bind `bind.volume` onto it
    pub fn mount(&mut self, bind: &VolumeBind) -> &mut Self {
        self.volumes.push(bind.mount_point.clone());
        self.binds.push(bind.to_string());
        self
    }
}

pub trait EngineClient {
    async fn create_volume(
        &self,
        name: &str,
        driver: &str,
        driver_opts: &HashMap<String, String>,
    ) -> Result<(), Error>;

    async fn list_volumes(&self) -> Result<Vec<VolumeRecord>, Error>;

    async fn remove_volume(&self, name: &str) -> Result<(), Error>;

    /// Returns the new container's id
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String, Error>;

    async fn start_container(&self, id: &str) -> Result<(), Error>;

    /// Blocks until the container stops and returns its exit code
    async fn wait_container(&self, id: &str) -> Result<i64, Error>;

    async fn remove_container(&self, id: &str, force: bool, remove_volumes: bool)
    -> Result<(), Error>;
}

impl EngineClient for Docker {
    #[tracing::instrument(skip(self, driver_opts))]
    async fn create_volume(
        &self,
        name: &str,
        driver: &str,
        driver_opts: &HashMap<String, String>,
    ) -> Result<(), Error> {
        let driver_opts = driver_opts
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let volume = Docker::create_volume(self, CreateVolumeOptions {
            name,
            driver,
            driver_opts,
            ..Default::default()
        })
        .await?;

        log::debug!("Created volume {} at {}", volume.name, volume.mountpoint);
        Ok(())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeRecord>, Error> {
        let reply = Docker::list_volumes(self, None::<ListVolumesOptions<String>>).await?;

        for warning in reply.warnings.unwrap_or_default() {
            log::warn!("{}", warning);
        }

        Ok(reply
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| VolumeRecord {
                name: v.name,
                driver: v.driver,
                mountpoint: v.mountpoint,
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_volume(&self, name: &str) -> Result<(), Error> {
        Docker::remove_volume(self, name, None).await
    }

    #[tracing::instrument(skip_all)]
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String, Error> {
        log::debug!("Creating container");

        let volumes = spec
            .volumes
            .iter()
            .map(|path| (path.clone(), HashMap::new()))
            .collect::<HashMap<_, _>>();

        let config = Config {
            image: Some(spec.image.clone()),
            cmd: Some(spec.cmd.clone()),
            volumes: Some(volumes),
            host_config: Some(HostConfig {
                binds: Some(spec.binds.clone()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let ContainerCreateResponse { id, warnings } = Docker::create_container(
            self,
            None::<CreateContainerOptions<String>>,
            config,
        )
        .await?;
        for warning in warnings {
            log::warn!("{}", warning);
        }

        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn start_container(&self, id: &str) -> Result<(), Error> {
        log::debug!("Starting container");
        Docker::start_container(self, id, None::<StartContainerOptions<String>>).await
    }

    #[tracing::instrument(skip(self))]
    async fn wait_container(&self, id: &str) -> Result<i64, Error> {
        let docker = self.clone().with_timeout(WAIT_TIMEOUT);
        wait_for_exit(&docker, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn remove_container(
        &self,
        id: &str,
        force: bool,
        remove_volumes: bool,
    ) -> Result<(), Error> {
        let options = RemoveContainerOptions {
            v: remove_volumes,
            force,
            ..Default::default()
        };

        Docker::remove_container(self, id, Some(options)).await
    }
}

/// Wait for a container to stop running and report its exit code
async fn wait_for_exit(docker: &Docker, id: &str) -> Result<i64, Error> {
    let options = WaitContainerOptions {
        condition: "not-running",
    };

    let mut wait_stream = docker.wait_container(id, Some(options));

    let mut code = 0;
    while let Some(msg) = wait_stream.next().await {
        code = match msg {
            Ok(msg) => exit_status(msg.status_code, msg.error.and_then(|e| e.message))?,
            // bollard turns a non-zero exit into an error
            Err(Error::DockerContainerWaitError { error, code }) => {
                exit_status(code, Some(error))?
            }
            Err(e) => {
                log::error!("Container failed with error: {:?}", e);
                return Err(e);
            }
        };
    }

    Ok(code)
}

/// Interpret one wait response
///
/// A positive status code is the container's exit code whatever error text comes with it. Error
/// text with a zero or negative code means the engine could not wait on the container (it was
/// removed, or the daemon lost track of it), so there is no exit code to report.
pub(crate) fn exit_status(status_code: i64, error: Option<String>) -> Result<i64, Error> {
    let error = error.filter(|e| !e.is_empty());

    if status_code > 0 {
        if let Some(error) = error {
            log::debug!("Container exited with status code `{}`: {error}", status_code);
        }
        return Ok(status_code);
    }

    match error {
        Some(error) => {
            log::error!("Failed to wait for container: {:?}", error);
            Err(Error::DockerContainerWaitError {
                error,
                code: status_code,
            })
        }
        None => Ok(status_code),
    }
}
