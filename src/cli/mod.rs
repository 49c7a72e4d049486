//! Command line interface for the application.
//!
//! Provides an entry point for the application and handles the CLI arguments.
mod image_io;
mod logging;
mod payload;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use const_format::formatcp;
use log::{info, warn};
use thiserror::Error;

pub use self::image_io::OUTPUT_PREFIX;
use self::image_io::{default_output_path, ensure_png, load_image, write_image};
use self::payload::{deliver_message, resolve_message};
use crate::stego::{
    SENTINEL, StegoError, Strategy, embed_message, extract_message,
    max_message_size,
};

/// Errors that can be emitted while handling the CLI
#[derive(Debug, Error)]
pub enum AppError
{
    /// An I/O error occurred
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read
    {
        path: Box<Path>,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written
    #[error("failed to write {}: {source}", .path.display())]
    Write
    {
        path: Box<Path>,
        #[source]
        source: std::io::Error,
    },

    /// The input is not a decodable image
    #[error("failed to decode image {}: {source}", .path.display())]
    ImageDecode
    {
        path: Box<Path>,
        #[source]
        source: image::ImageError,
    },

    /// The image is decodable but not 8-bit RGBA
    #[error(
        "{} has pixel format {color}, only 8-bit RGBA is supported (use \
         --convert)",
        .path.display()
    )]
    UnsupportedPixelFormat
    {
        path: Box<Path>,
        color: Box<str>,
    },

    /// The image could not be encoded
    #[error("failed to encode image {}: {source}", .path.display())]
    ImageEncode
    {
        path: Box<Path>,
        #[source]
        source: image::ImageError,
    },

    /// The output format is unsupported
    #[error("unsupported output format {extension}, only png is written")]
    UnsupportedFormat
    {
        extension: Box<str>
    },

    /// A steganography error occurred
    #[error(transparent)]
    Stego(#[from] StegoError),

    /// The logger could not be installed
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

/// The main CLI parser
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Hide a message in the low bits of an RGBA PNG image",
    after_help = formatcp!(
        "Encoded images are written as {}<image>.png unless --output is \
         given. Messages must not contain '{}'.",
        OUTPUT_PREFIX,
        SENTINEL as char
    )
)]
struct Cli
{
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    codec: CodecOptions,
    /// Log more details, repeat for even more.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Disable logging.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

/// Options shared by every command
#[derive(Args, Clone, Copy, Debug)]
struct CodecOptions
{
    /// Pixel selection strategy, must match between writing and reading.
    #[arg(long, value_enum, default_value_t, global = true)]
    strategy: Strategy,
    /// Convert images that are not 8-bit RGBA instead of rejecting them.
    #[arg(long, global = true)]
    convert: bool,
}

/// The main command
#[derive(Debug, Subcommand)]
enum Command
{
    #[command(name = "w", visible_alias = "write")]
    Encode(EncodingArgs),
    #[command(name = "r", visible_alias = "read")]
    Decode(DecodingArgs),
    #[command(name = "cap", visible_alias = "capacity")]
    Cap(CapacityArgs),
}

/// Write a message into an image.
#[derive(Args, Debug)]
struct EncodingArgs
{
    /// PNG image that will receive the message.
    input: PathBuf,
    /// Words of the message, joined with single spaces. Everything after the
    /// first word is part of the message, so options go before it.
    #[arg(
        value_name = "WORD",
        conflicts_with = "message_file",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    words: Vec<String>,
    /// Read the message bytes from a file instead.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    message_file: Option<PathBuf>,
    /// Output path for the encoded image. Defaults to INKT_<image>.png next
    /// to the input.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Read a message from an image.
#[derive(Args, Debug)]
struct DecodingArgs
{
    /// Image that contains the message.
    input: PathBuf,
    /// Optional file to write the message to. Prints to stdout when omitted.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Print the largest message an image can hold.
#[derive(Args, Debug)]
struct CapacityArgs
{
    /// Image to calculate the capacity for.
    input: PathBuf,
}

/// Parses CLI arguments and executes the requested operation.
///
/// Unknown commands or missing arguments print the usage text and are not an
/// error.
///
/// # Errors
///
/// Returns [`AppError`] when reading or writing files, decoding images, or
/// running steganography routines fails.
pub fn run() -> Result<(), AppError>
{
    let cli = match Cli::try_parse()
    {
        Ok(cli) => cli,
        Err(usage) =>
        {
            usage.print()?;
            return Ok(());
        },
    };

    logging::init(cli.verbose, cli.quiet)?;
    execute(cli)
}

/// Dispatches a parsed command line.
fn execute(cli: Cli) -> Result<(), AppError>
{
    match cli.command
    {
        Command::Encode(mut args) => handle_encode(&mut args, cli.codec),
        Command::Decode(args) => handle_decode(&args, cli.codec),
        Command::Cap(args) => handle_capacity(&args, cli.codec),
    }
}

/// Handles the encoding of a message into an image.
///
/// # Errors
///
/// Returns [`AppError`] when reading or writing files, or encoding the image.
fn handle_encode(
    args: &mut EncodingArgs,
    codec: CodecOptions,
) -> Result<(), AppError>
{
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    // Fail before any pixel work when the output cannot be written as PNG
    ensure_png(&output)?;

    let image = load_image(&args.input, codec.convert)?;
    let message = resolve_message(args)?;
    info!(
        "embedding {} bytes into {} ({}x{}) with the {:?} strategy",
        message.len(),
        args.input.display(),
        image.width(),
        image.height(),
        codec.strategy
    );

    // Embedding the message happens here
    let encoded = embed_message(&image, &message, codec.strategy.selection())?;

    write_image(&encoded, &output)?;
    info!("wrote {}", output.display());

    Ok(())
}

/// Handles the decoding of a message from an image.
///
/// # Errors
///
/// Returns [`AppError`] when reading or writing files, or decoding the image.
fn handle_decode(
    args: &DecodingArgs,
    codec: CodecOptions,
) -> Result<(), AppError>
{
    let image = load_image(&args.input, codec.convert)?;
    let message = extract_message(&image, codec.strategy.selection())?;
    info!(
        "recovered {} bytes from {}",
        message.len(),
        args.input.display()
    );

    deliver_message(&message, args.output.as_deref())
}

/// Handles the capacity calculation of a message for an image.
///
/// # Errors
///
/// Returns [`AppError`] when reading the image.
fn handle_capacity(
    args: &CapacityArgs,
    codec: CodecOptions,
) -> Result<(), AppError>
{
    let image = load_image(&args.input, codec.convert)?;
    let capacity = max_message_size(&image, codec.strategy.selection());
    if capacity == 0
    {
        warn!("{} is too small to carry a message", args.input.display());
    }

    println!("Maximum message size: {capacity} bytes");
    Ok(())
}
