use thiserror::Error;

use crate::config::ConfigError;

/// A failure that aborts the sanity run
#[derive(Debug, Error)]
pub enum SanityError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("No endpoints configured")]
    NoEndpoints,
    #[error("Unsupported endpoint address `{0}`")]
    InvalidEndpoint(String),
    #[error("Invalid API version `{0}`")]
    InvalidApiVersion(String),
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: bollard::errors::Error,
    },
    #[error("Failed to create volume {name}: {source}")]
    VolumeCreate {
        name: String,
        #[source]
        source: bollard::errors::Error,
    },
    #[error("Failed to delete volume {name}: {source}")]
    VolumeRemove {
        name: String,
        #[source]
        source: bollard::errors::Error,
    },
    #[error("Failed to enumerate volumes on {addr}: {source}")]
    VolumeList {
        addr: String,
        #[source]
        source: bollard::errors::Error,
    },
    #[error("Volume={name} is missing on {addr} after create")]
    VolumeMissing { name: String, addr: String },
    #[error("Volume={name} already exists on {addr} before create")]
    VolumeAlreadyExists { name: String, addr: String },
    #[error("Wrong driver ({found}) for volume {name}, expected {expected}")]
    WrongDriver {
        name: String,
        expected: String,
        found: String,
    },
    #[error("Container create failed: {0}")]
    ContainerCreate(#[source] bollard::errors::Error),
    #[error("Container start failed: id={id}, err {source}")]
    ContainerStart {
        id: String,
        #[source]
        source: bollard::errors::Error,
    },
    #[error("Container wait failed: id={id}, err {source}")]
    ContainerWait {
        id: String,
        #[source]
        source: bollard::errors::Error,
    },
    #[error("Container removal failed: id={id}, err {source}")]
    ContainerRemove {
        id: String,
        #[source]
        source: bollard::errors::Error,
    },
}
