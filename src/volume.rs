//! Volume create/list/remove against an engine endpoint

use std::collections::HashMap;

use crate::endpoint::Endpoint;
use crate::engine::{EngineClient, VolumeRecord};
use crate::error::SanityError;

pub async fn create_volume<C: EngineClient>(
    master: &Endpoint<C>,
    name: &str,
    driver: &str,
    driver_opts: &HashMap<String, String>,
) -> Result<(), SanityError> {
    log::info!("Creating vol={} on client {}.", name, master.addr());

    master
        .client()
        .create_volume(name, driver, driver_opts)
        .await
        .map_err(|source| SanityError::VolumeCreate {
            name: name.to_string(),
            source,
        })
}

pub async fn remove_volume<C: EngineClient>(
    master: &Endpoint<C>,
    name: &str,
) -> Result<(), SanityError> {
    log::info!("Removing vol={} on client {}.", name, master.addr());

    master
        .client()
        .remove_volume(name)
        .await
        .map_err(|source| SanityError::VolumeRemove {
            name: name.to_string(),
            source,
        })
}

/// Look `name` up in the endpoint's volume list
///
/// Returns `None` when no volume has that name. The driver is not checked here, see
/// [`ensure_driver`].
pub async fn volume_exists<C: EngineClient>(
    endpoint: &Endpoint<C>,
    name: &str,
) -> Result<Option<VolumeRecord>, SanityError> {
    let volumes = endpoint
        .client()
        .list_volumes()
        .await
        .map_err(|source| SanityError::VolumeList {
            addr: endpoint.addr().to_string(),
            source,
        })?;

    for v in volumes {
        log::trace!("{} {} {}", v.name, v.driver, v.mountpoint);
        if v.name == name {
            return Ok(Some(v));
        }
    }

    Ok(None)
}

/// A volume owned by another driver means a naming collision or a misconfigured driver
pub fn ensure_driver(volume: &VolumeRecord, expected: &str) -> Result<(), SanityError> {
    if volume.driver != expected {
        return Err(SanityError::WrongDriver {
            name: volume.name.clone(),
            expected: expected.to_string(),
            found: volume.driver.clone(),
        });
    }

    Ok(())
}
