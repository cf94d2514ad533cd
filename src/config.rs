//! Configuration module.
//!
//! This module defines the command-line interface (CLI) for the packer using `clap`.

use clap::Parser;
use std::path::PathBuf;

use crate::metadata::MetadataLayout;
use crate::packer::{PackOptions, META_SECTION, PACKED_SECTION};

/// Packs a payload into a prebuilt stub template.
///
/// The payload is obfuscated and written into the template's payload section,
/// and a metadata record for the runtime stub is written into its metadata
/// section. The result is a new executable; the template is not modified.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Raw payload to pack
    #[arg(short, long)]
    pub payload: PathBuf,

    /// Prebuilt stub template executable
    #[arg(short, long)]
    pub template: PathBuf,

    /// Output file
    #[arg(short, long, help = "Path to the packed executable")]
    pub output: PathBuf,

    /// Section receiving the encoded payload
    #[arg(long, default_value = PACKED_SECTION)]
    pub packed_section: String,

    /// Section receiving the metadata record
    #[arg(long, default_value = META_SECTION)]
    pub meta_section: String,

    /// Bit rotation (random in 1..=7 when omitted)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=7))]
    pub rotation: Option<u8>,

    /// Passphrase the stub asks for; only its hash is stored
    #[arg(long, env = "STUBPACK_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// Metadata record layout (extended when a passphrase is given)
    #[arg(long, value_enum)]
    pub layout: Option<MetadataLayout>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: String,
}

impl Config {
    pub fn pack_options(&self) -> PackOptions {
        PackOptions {
            packed_section: self.packed_section.clone(),
            meta_section: self.meta_section.clone(),
            passphrase: self.passphrase.clone(),
            layout: self.layout,
        }
    }
}
