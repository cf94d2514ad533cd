//! Entry point for the stubpack packer.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap`.
//! 2. Load the payload and map the template.
//! 3. Locate the reserved sections with the ELF backend.
//! 4. Pack: derive, encode, serialize, patch.
//! 5. Write the final executable.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stubpack::config::Config;
use stubpack::input;
use stubpack::locator::elf::ElfLocator;
use stubpack::packer::Packer;
use stubpack::transform::Rotation;

fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let payload = input::read_payload(&config.payload)?;
    let template = input::map_template(&config.template)?;

    let locator = ElfLocator::parse(&template)
        .with_context(|| format!("failed to parse template {}", config.template.display()))?;

    let rotation = match config.rotation {
        Some(amount) => Rotation::new(amount)?,
        None => Rotation::random(&mut rand::thread_rng()),
    };

    let packer = Packer::new(locator, config.pack_options());
    let packed = packer
        .pack(&template, &payload, rotation)
        .with_context(|| format!("failed to pack {}", config.payload.display()))?;

    tracing::info!(
        payload_size = packed.metadata.payload_size,
        checksum = format_args!("0x{:08x}", packed.metadata.checksum),
        rotation = packed.params.rotation.get(),
        passphrase = packed.metadata.passphrase_hash.is_some(),
        "Encoded payload"
    );

    packed
        .write(&config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    tracing::info!("Packed successfully into {}", config.output.display());
    Ok(())
}
