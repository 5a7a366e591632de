use anyhow::Result;
use log::{debug, warn};

use crate::runtimes::ContainerRuntime;

/// A container created for the lifetime of one pipeline run.
///
/// Dropping the guard force-removes the container unless [`ContainerGuard::remove`]
/// already did; failures on that path are logged and otherwise ignored.
pub struct ContainerGuard<'a, R: ContainerRuntime + ?Sized> {
    runtime: &'a R,
    id: String,
    removed: bool,
}

impl<'a, R: ContainerRuntime + ?Sized> ContainerGuard<'a, R> {
    /// Instantiates a container from `image_id` without starting it.
    pub fn create(runtime: &'a R, image_id: &str) -> Result<Self> {
        let id = runtime.create_container(image_id)?;
        debug!("Created container {} with {}", id, runtime.name());
        Ok(Self {
            runtime,
            id,
            removed: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Removes the container now. The guard is consumed either way, so a failed
    /// removal is not retried on drop.
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        self.runtime.remove_container(&self.id)
    }
}

impl<R: ContainerRuntime + ?Sized> Drop for ContainerGuard<'_, R> {
    fn drop(&mut self) {
        if self.removed {
            return;
        }

        debug!("Cleaning up container {} after an incomplete run", self.id);
        if let Err(e) = self.runtime.remove_container(&self.id) {
            warn!("Failed to remove container {}: {:#}", self.id, e);
        }
    }
}
