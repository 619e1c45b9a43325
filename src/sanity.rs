//! The end-to-end sanity run
//!
//! connect → pre-flight → create → touch/stat → verify present → remove → verify absent

use crate::config::SanityConfig;
use crate::container::check_touch;
use crate::endpoint::Endpoint;
use crate::engine::EngineClient;
use crate::error::SanityError;
use crate::report::Report;
use crate::verify::{verify_absent, verify_present};
use crate::volume::{create_volume, ensure_driver, remove_volume, volume_exists};

/// Run the sanity checks against already connected endpoints
///
/// The first endpoint is the master: it creates and removes the volume and runs the
/// containers. Every endpoint takes part in the presence and absence checks.
///
/// A returned error means the run was aborted; check [`Report::passed`] otherwise.
pub async fn run<C: EngineClient>(
    config: &SanityConfig,
    endpoints: &[Endpoint<C>],
) -> Result<Report, SanityError> {
    let Some(master) = endpoints.first() else {
        return Err(SanityError::NoEndpoints);
    };
    let name = config.volume_name.as_str();
    let driver = config.driver.as_str();

    log::info!("Running tests on {} (may take a while)...", master.addr());
    let mut report = Report::new();

    preflight(master, name, driver).await?;

    create_volume(master, name, driver, &config.driver_opts).await?;
    match volume_exists(master, name).await? {
        Some(volume) => ensure_driver(&volume, driver)?,
        None => {
            return Err(SanityError::VolumeMissing {
                name: name.to_string(),
                addr: master.addr().to_string(),
            });
        }
    }

    check_touch(master, config, name, &config.touch_file, &mut report).await?;

    verify_present(endpoints, name, driver).await?;

    remove_volume(master, name).await?;

    verify_absent(endpoints, name, &mut report).await?;

    log::info!("Sanity run finished: {}", report);
    Ok(report)
}

/// Refuse to start on top of a volume this run did not create
async fn preflight<C: EngineClient>(
    master: &Endpoint<C>,
    name: &str,
    driver: &str,
) -> Result<(), SanityError> {
    let Some(existing) = volume_exists(master, name).await? else {
        return Ok(());
    };

    ensure_driver(&existing, driver)?;
    Err(SanityError::VolumeAlreadyExists {
        name: name.to_string(),
        addr: master.addr().to_string(),
    })
}
