pub mod cli;
pub mod runtime;

pub use cli::CliRuntime;
pub use runtime::ContainerRuntime;

use clap::ValueEnum;

/// Container runtime CLIs that share the `image ls` / `create` / `export` / `rm` surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Engine {
    Docker,
    Nerdctl,
    Podman,
}

impl Engine {
    /// Executable invoked for this engine.
    pub fn program(self) -> &'static str {
        match self {
            Engine::Docker => "docker",
            Engine::Nerdctl => "nerdctl",
            Engine::Podman => "podman",
        }
    }
}
