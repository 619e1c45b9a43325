use bollard::Docker;
use bollard::container::{ListContainersOptions, RemoveContainerOptions};
use bollard::image::CreateImageOptions;
use futures_util::TryStreamExt;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::process::Command;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use uuid::Uuid;

pub fn is_docker_running() -> bool {
    Command::new("docker")
        .arg("info")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Pull `image` so container creation doesn't trip over a missing image
pub async fn pull_image(image: &str) -> bool {
    let Ok(client) = Docker::connect_with_local_defaults() else {
        return false;
    };

    let result = client
        .create_image(
            Some(CreateImageOptions {
                from_image: image,
                tag: "latest",
                ..Default::default()
            }),
            None,
            None,
        )
        .try_collect::<Vec<_>>()
        .await;

    match result {
        Ok(_) => true,
        Err(e) => {
            println!("Failed to pull {}: {}", image, e);
            false
        }
    }
}

/// Whether the daemon has a volume plugin named `driver` installed
#[allow(dead_code)]
pub async fn has_volume_driver(driver: &str) -> bool {
    let Ok(client) = Docker::connect_with_local_defaults() else {
        return false;
    };
    let Ok(info) = client.info().await else {
        return false;
    };

    info.plugins
        .and_then(|plugins| plugins.volume)
        .unwrap_or_default()
        .iter()
        .any(|v| v == driver)
}

pub struct DockerTestContext {
    client: Docker,
    volume_name: String,
}

impl DockerTestContext {
    pub async fn cleanup(&self) {
        // Containers left behind with `remove_containers: false` or by an aborted run
        let mut filters = HashMap::new();
        filters.insert(String::from("volume"), vec![self.volume_name.clone()]);

        if let Ok(containers) = self
            .client
            .list_containers(Some(ListContainersOptions {
                all: true,
                filters,
                ..Default::default()
            }))
            .await
        {
            for container in containers {
                if let Some(id) = container.id {
                    match self
                        .client
                        .remove_container(
                            &id,
                            Some(RemoveContainerOptions {
                                force: true,
                                v: true,
                                ..Default::default()
                            }),
                        )
                        .await
                    {
                        Ok(()) => println!("Removed container: {}", id),
                        Err(e) => println!("Error removing container {}: {}", id, e),
                    }
                }
            }
        }

        if self
            .client
            .remove_volume(&self.volume_name, None)
            .await
            .is_ok()
        {
            println!("Removed volume: {}", self.volume_name);
        }
    }
}

// Drop guard to ensure cleanup happens even if test panics
pub struct TestGuard {
    volume_name: String,
    cleanup_thread: Option<JoinHandle<()>>,
    cleanup_sender: mpsc::SyncSender<String>,
}

impl TestGuard {
    pub fn new() -> Self {
        let volume_name = format!("sanity-{}", Uuid::new_v4());

        let (tx, rx) = mpsc::sync_channel(0);

        let cleanup_thread = thread::spawn(move || {
            if let Ok(volume_name) = rx.recv() {
                let rt = tokio::runtime::Runtime::new().unwrap();
                let client = Docker::connect_with_local_defaults().unwrap();
                let ctx = DockerTestContext {
                    client,
                    volume_name,
                };
                rt.block_on(ctx.cleanup());
            }
        });

        Self {
            volume_name,
            cleanup_thread: Some(cleanup_thread),
            cleanup_sender: tx,
        }
    }
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        let _ = self.cleanup_sender.send(self.volume_name.clone());
        if let Some(thread) = self.cleanup_thread.take() {
            let _ = thread.join();
        }
    }
}

/// Run `test_body` with a unique volume name, removing the volume and its containers afterwards
///
/// Skips (returns `Ok`) when Docker isn't running or `image` can't be pulled.
pub async fn with_docker_cleanup<F>(image: &str, mut test_body: F) -> color_eyre::Result<()>
where
    F: FnMut(String) -> Pin<Box<dyn Future<Output = color_eyre::Result<()>> + 'static>>,
{
    if !is_docker_running() {
        println!("Skipping test: Docker is not running");
        return Ok(());
    }
    if !pull_image(image).await {
        println!("Skipping test: {} is unavailable", image);
        return Ok(());
    }

    let guard = TestGuard::new();
    test_body(guard.volume_name.clone()).await?;

    Ok(())
}
