use anyhow::{anyhow, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use env_logger::Env;
use log::debug;
use std::path::PathBuf;

use image_manifest::notifier::VerbosityLevel;
use image_manifest::{CliRuntime, Engine, ImageReference, ManifestProcessor, Notifier, Outcome};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_parser = NonEmptyStringValueParser::new(),
        help = "Container image repository (e.g., alpine)"
    )]
    repository: String,

    #[arg(short, long, default_value = "", help = "Container image tag")]
    tag: String,

    #[arg(
        short,
        long,
        value_enum,
        default_value = "docker",
        help = "Container engine to use"
    )]
    engine: Engine,

    #[arg(
        short,
        long,
        help = "Directory for the exported archive and manifest [default: current directory]"
    )]
    output_dir: Option<PathBuf>,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Verbose mode (-v for info, -vv for debug, -vvv for trace). Also disables the spinner"
    )]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity level
    env_logger::Builder::from_env(Env::default())
        .filter_level(VerbosityLevel::from(cli.verbose).to_log_level())
        .init();

    let reference = ImageReference::new(cli.repository, cli.tag)?;
    let output_dir = cli.output_dir.unwrap_or_default();

    debug!("Image reference: {}", reference);
    debug!("Engine: {:?}", cli.engine);
    debug!("Output directory: {}", output_dir.display());

    let runtime = CliRuntime::new(cli.engine)
        .map_err(|e| anyhow!("Failed to initialize {:?} engine: {:#}", cli.engine, e))?;
    let processor = ManifestProcessor::new(runtime, Notifier::new(cli.verbose));

    match processor.generate(&reference, &output_dir)? {
        Outcome::Generated(report) => debug!(
            "Wrote {} entries to {}",
            report.entry_count,
            report.manifest_path.display()
        ),
        Outcome::NotFound => debug!("Nothing to do for {}", reference),
    }

    Ok(())
}
