pub mod archive;
pub mod container;
pub mod listing;
pub mod manifest;
pub mod naming;
pub mod notifier;
pub mod processor;
pub mod reference;
pub mod runner;
pub mod runtimes;

// Re-exports for easy access
pub use container::ContainerGuard;
pub use manifest::{ArchiveListing, ManifestEntry};
pub use notifier::Notifier;
pub use processor::{ManifestProcessor, ManifestReport, Outcome};
pub use reference::ImageReference;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use runtimes::{CliRuntime, ContainerRuntime, Engine};
