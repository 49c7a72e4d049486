//! Hides a byte message in the low bits of an RGBA image.
//!
//! Provides a command line interface and the pure codec that embeds and
//! extracts messages one byte per pixel pair.
pub mod cli;
pub mod stego;
