//! End-to-end "container image → manifest" pipeline orchestrator.
//!
//! [`ManifestProcessor`] runs the steps in order, printing one progress line after each:
//! 1. resolve the repository[:tag] to an image identifier,
//! 2. create (but do not start) a container from it,
//! 3. export the container filesystem to `<name>.tar`,
//! 4. list the archive into `<name>.manifest.txt`,
//! 5. force-remove the container.
//!
//! When no image matches, only the absence line is printed and nothing is created.
//! The container is held by a [`ContainerGuard`], so a failure in steps 3–4 still
//! removes it before the error is returned.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::container::ContainerGuard;
use crate::manifest;
use crate::naming;
use crate::notifier::Notifier;
use crate::reference::ImageReference;
use crate::runtimes::ContainerRuntime;

/// Artifacts and identifiers produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReport {
    pub image_id: String,
    pub container_id: String,
    pub archive_path: PathBuf,
    pub manifest_path: PathBuf,
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The runtime listed no image for the reference.
    NotFound,
    Generated(ManifestReport),
}

/// Orchestrates the manifest pipeline for a concrete [`ContainerRuntime`].
pub struct ManifestProcessor<R: ContainerRuntime> {
    runtime: R,
    notifier: Notifier,
}

impl<R: ContainerRuntime> ManifestProcessor<R> {
    pub fn new(runtime: R, notifier: Notifier) -> Self {
        Self { runtime, notifier }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Generates the archive and manifest for `reference` inside `output_dir`.
    ///
    /// An empty `output_dir` means the current directory. The directory is created
    /// only once an image has been found.
    ///
    /// # Errors
    /// - The runtime CLI cannot be executed or exits non-zero for lookup, create or export.
    /// - The image listing has a data row without an identifier column.
    /// - The exported archive cannot be read, or the manifest cannot be written.
    ///
    /// Container removal failures are logged, never returned.
    pub fn generate(&self, reference: &ImageReference, output_dir: &Path) -> Result<Outcome> {
        self.notifier.begin(&format!(
            "Looking up {} with {}...",
            reference,
            self.runtime.name()
        ));

        let image_id = match self
            .runtime
            .find_image(reference)
            .with_context(|| format!("Failed to look up image {}", reference))?
        {
            Some(image_id) => image_id,
            None => {
                self.notifier
                    .step(&format!("No image is available for {}.", reference))?;
                self.notifier.finish();
                return Ok(Outcome::NotFound);
            }
        };
        self.notifier
            .step(&format!("Image identifer for {} is {}.", reference, image_id))?;

        if !output_dir.as_os_str().is_empty() {
            fs::create_dir_all(output_dir).with_context(|| {
                format!("Failed to create output directory: {}", output_dir.display())
            })?;
        }

        self.notifier
            .begin(&format!("Creating container from image {}...", image_id));
        let container = ContainerGuard::create(&self.runtime, &image_id)
            .with_context(|| format!("Failed to create container from image {}", image_id))?;
        let container_id = container.id().to_string();
        self.notifier
            .step(&format!("Created container {}.", container_id))?;

        let archive_path = naming::archive_path(output_dir, reference);
        self.notifier.begin(&format!(
            "Exporting container {} to {}...",
            container_id,
            archive_path.display()
        ));
        self.runtime
            .export_container(&container_id, &archive_path)
            .with_context(|| format!("Failed to export container {}", container_id))?;
        self.notifier.step(&format!(
            "Exported container {} to file {}.",
            container_id,
            archive_path.display()
        ))?;

        let manifest_path = naming::manifest_path(output_dir, reference);
        self.notifier
            .begin(&format!("Listing {}...", archive_path.display()));
        let entry_count = manifest::write_manifest(&archive_path, &manifest_path)?;
        info!(
            "Manifest {} lists {} entries",
            manifest_path.display(),
            entry_count
        );
        self.notifier.step(&format!(
            "Directed view of {} content to {}.",
            archive_path.display(),
            manifest_path.display()
        ))?;

        self.notifier
            .begin(&format!("Removing container {}...", container_id));
        match container.remove() {
            Ok(()) => self
                .notifier
                .step(&format!("Removed container {}.", container_id))?,
            Err(e) => warn!("Failed to remove container {}: {:#}", container_id, e),
        }
        self.notifier.finish();

        Ok(Outcome::Generated(ManifestReport {
            image_id,
            container_id,
            archive_path,
            manifest_path,
            entry_count,
        }))
    }
}
