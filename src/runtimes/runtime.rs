use anyhow::Result;
use std::path::Path;

use crate::reference::ImageReference;

/// Operations the manifest pipeline needs from a container runtime.
pub trait ContainerRuntime {
    /// Returns the name of the runtime for identification purposes
    fn name(&self) -> &str;

    /// Resolves `reference` to an image identifier.
    /// Only the first listed match is considered; `None` when nothing matches.
    fn find_image(&self, reference: &ImageReference) -> Result<Option<String>>;

    /// Instantiates, without starting, a container from `image_id` and returns its identifier
    fn create_container(&self, image_id: &str) -> Result<String>;

    /// Writes the container's filesystem to `archive_path` as a tar archive
    fn export_container(&self, container_id: &str, archive_path: &Path) -> Result<()>;

    /// Forcibly removes the container
    fn remove_container(&self, container_id: &str) -> Result<()>;
}
