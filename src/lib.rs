//! Stub Template Packer Library.
//!
//! This library provides the core components for the `stubpack` packer.
//! It is organized into several modules:
//! - `config`: CLI configuration.
//! - `locator`: Section lookup in the template executable.
//! - `transform`: The reversible byte obfuscation.
//! - `key`: Key derivation, checksum and passphrase hashing.
//! - `metadata`: The record read by the runtime stub.
//! - `patcher`: Overlaying regions and writing the output.
//! - `packer`: The packing pipeline.

pub mod config;
pub mod error;
pub mod input;
pub mod key;
pub mod layout;
pub mod locator;
pub mod metadata;
pub mod packer;
pub mod patcher;
pub mod transform;

#[cfg(test)]
mod fixture;
