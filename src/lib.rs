pub use config::{ConfigError, SanityConfig, VolumeBind};
pub use endpoint::{Endpoint, EndpointAddr, connect_all};
pub use engine::{ContainerSpec, EngineClient, VolumeRecord};
pub use error::SanityError;
pub use report::{Check, Failure, Report};

pub use bollard;

pub mod config;
pub mod container;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod report;
pub mod sanity;
pub mod verify;
pub mod volume;

#[cfg(test)]
pub mod tests;
