use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::path::Path;

use super::{ContainerRuntime, Engine};
use crate::listing;
use crate::reference::ImageReference;
use crate::runner::{CommandRunner, SystemRunner};

/// [`ContainerRuntime`] backed by a runtime's command line client.
pub struct CliRuntime<R: CommandRunner = SystemRunner> {
    program: String,
    runner: R,
}

impl CliRuntime<SystemRunner> {
    /// Checks that the engine's CLI can be executed before handing out a runtime.
    pub fn new(engine: Engine) -> Result<Self> {
        Self::verify(engine, SystemRunner)
    }
}

impl<R: CommandRunner> CliRuntime<R> {
    /// Runs `<program> --version` through `runner` and fails when the CLI is unusable.
    pub fn verify(engine: Engine, runner: R) -> Result<Self> {
        let program = engine.program();
        // The runner's spawn error already names the program and suggests installing it
        let output = runner.run(program, &["--version"])?;

        if !output.success() {
            return Err(anyhow!("{} is not available", program));
        }
        debug!("Using {}", output.stdout.trim());

        Ok(Self::with_runner(engine, runner))
    }

    pub fn with_runner(engine: Engine, runner: R) -> Self {
        Self {
            program: engine.program().to_string(),
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run_command(&self, what: &str, args: &[&str]) -> Result<String> {
        let output = self.runner.run(&self.program, args)?;
        let output = output.into_success(&format!("{} {}", self.program, what))?;
        Ok(output.stdout)
    }
}

impl<R: CommandRunner> ContainerRuntime for CliRuntime<R> {
    fn name(&self) -> &str {
        &self.program
    }

    fn find_image(&self, reference: &ImageReference) -> Result<Option<String>> {
        let filter = reference.to_string();
        debug!("Listing images matching '{}'", filter);

        let stdout = self.run_command("image ls", &["image", "ls", &filter])?;
        let image_id = listing::parse_image_id(&stdout)
            .with_context(|| format!("Unexpected output from {} image ls", self.program))?;

        match &image_id {
            Some(id) => debug!("First image matching '{}' is {}", filter, id),
            None => debug!("No image matches '{}'", filter),
        }
        Ok(image_id)
    }

    fn create_container(&self, image_id: &str) -> Result<String> {
        info!("Creating container from image {}...", image_id);
        let stdout = self.run_command("create", &["create", image_id])?;

        let container_id = stdout.trim_end().to_string();
        if container_id.is_empty() {
            return Err(anyhow!(
                "{} create returned no container identifier for image {}",
                self.program,
                image_id
            ));
        }
        Ok(container_id)
    }

    fn export_container(&self, container_id: &str, archive_path: &Path) -> Result<()> {
        let archive_path = archive_path
            .to_str()
            .ok_or_else(|| anyhow!("Archive path is not valid UTF-8: {:?}", archive_path))?;

        info!("Exporting container {} to {}...", container_id, archive_path);
        let output_arg = format!("--output={}", archive_path);
        self.run_command("export", &["export", &output_arg, container_id])?;
        Ok(())
    }

    fn remove_container(&self, container_id: &str) -> Result<()> {
        debug!("Removing container {}", container_id);
        self.run_command("rm", &["rm", "--force", container_id])?;
        Ok(())
    }
}
