//! Checks that every endpoint agrees on the state of the test volume

use crate::endpoint::Endpoint;
use crate::engine::EngineClient;
use crate::error::SanityError;
use crate::report::{Check, Report};
use crate::volume::{ensure_driver, volume_exists};

/// The volume must be listed, with `driver`, on every endpoint
pub async fn verify_present<C: EngineClient>(
    endpoints: &[Endpoint<C>],
    name: &str,
    driver: &str,
) -> Result<(), SanityError> {
    for endpoint in endpoints {
        let Some(volume) = volume_exists(endpoint, name).await? else {
            return Err(SanityError::VolumeMissing {
                name: name.to_string(),
                addr: endpoint.addr().to_string(),
            });
        };

        ensure_driver(&volume, driver)?;
        log::debug!("Volume={} present on {} (driver {})", name, endpoint.addr(), volume.driver);
    }

    Ok(())
}

/// The volume must be gone from every endpoint
///
/// Every endpoint is checked even after a hit so one run reports all of them.
pub async fn verify_absent<C: EngineClient>(
    endpoints: &[Endpoint<C>],
    name: &str,
    report: &mut Report,
) -> Result<(), SanityError> {
    for endpoint in endpoints {
        if volume_exists(endpoint, name).await?.is_some() {
            report.fail(
                Check::VolumeRemoved,
                format!(
                    "Volume={} is still present on {} after removal",
                    name,
                    endpoint.addr()
                ),
            );
        }
    }

    Ok(())
}
