//! Short-lived containers that exercise a volume through its mount point

use crate::config::{SanityConfig, VolumeBind};
use crate::endpoint::Endpoint;
use crate::engine::{ContainerSpec, EngineClient};
use crate::error::SanityError;
use crate::report::{Check, Report};

/// A command to run against the volume and the exit code it must produce
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestCase {
    pub image: String,
    pub cmd: Vec<String>,
    pub expected: i64,
}

impl TestCase {
    pub fn new(
        image: impl Into<String>,
        cmd: impl IntoIterator<Item = impl Into<String>>,
        expected: i64,
    ) -> Self {
        Self {
            image: image.into(),
            cmd: cmd.into_iter().map(Into::into).collect(),
            expected,
        }
    }
}

/// `touch` a file through the volume, then `stat` it from a second container
#[must_use]
pub fn touch_cases(image: &str, mount_point: &str, file: &str) -> Vec<TestCase> {
    let path = format!("{}/{}", mount_point, file);
    vec![
        TestCase::new(image, ["touch", path.as_str()], 0),
        TestCase::new(image, ["stat", path.as_str()], 0),
    ]
}

/// Run `cmd` in a fresh container with `volume` mounted and return its exit code
///
/// The container is created, started, waited on and, when `remove` is set, force removed
/// along with its anonymous volumes. Any engine error along the way aborts the run.
pub async fn run_container_cmd<C: EngineClient>(
    endpoint: &Endpoint<C>,
    config: &SanityConfig,
    volume: &str,
    image: &str,
    cmd: &[String],
) -> Result<i64, SanityError> {
    let bind = VolumeBind::new(volume, config.mount_point(volume));
    log::info!(
        "Running cmd={:?} with vol={} on client {}",
        cmd,
        volume,
        endpoint.addr()
    );

    let mut spec = ContainerSpec::new(image);
    spec.cmd(cmd).mount(&bind);

    let client = endpoint.client();
    let id = client
        .create_container(&spec)
        .await
        .map_err(SanityError::ContainerCreate)?;

    client
        .start_container(&id)
        .await
        .map_err(|source| SanityError::ContainerStart {
            id: id.clone(),
            source,
        })?;

    let code = client
        .wait_container(&id)
        .await
        .map_err(|source| SanityError::ContainerWait {
            id: id.clone(),
            source,
        })?;

    if !config.remove_containers {
        log::info!("\tSkipping container removal, id={} (remove_containers == false)", id);
        return Ok(code);
    }

    client
        .remove_container(&id, true, true)
        .await
        .map_err(|source| SanityError::ContainerRemove {
            id: id.clone(),
            source,
        })?;

    Ok(code)
}

/// Run each case in order, recording mismatched exit codes without stopping
pub async fn run_cases<C: EngineClient>(
    endpoint: &Endpoint<C>,
    config: &SanityConfig,
    volume: &str,
    cases: &[TestCase],
    report: &mut Report,
) -> Result<(), SanityError> {
    for case in cases {
        let code = run_container_cmd(endpoint, config, volume, &case.image, &case.cmd).await?;
        report.container_ran();

        if code != case.expected {
            report.fail(
                Check::ExitCode,
                format!(
                    "Expected {}, got {} (cmd: {:?})",
                    case.expected, code, case.cmd
                ),
            );
        }
    }

    Ok(())
}

/// Check a file touched in one container can be stat'ed from another one using the same volume
pub async fn check_touch<C: EngineClient>(
    endpoint: &Endpoint<C>,
    config: &SanityConfig,
    volume: &str,
    file: &str,
    report: &mut Report,
) -> Result<(), SanityError> {
    let cases = touch_cases(&config.image, &config.mount_point(volume), file);
    run_cases(endpoint, config, volume, &cases, report).await
}
