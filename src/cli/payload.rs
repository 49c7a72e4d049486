//! CLI payload orchestration.
//!
//! Turns the encode arguments into message bytes and writes a recovered
//! message to its destination.
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::{AppError, EncodingArgs};

/// Resolves the message to embed from the command line arguments.
///
/// Words are joined with a single space. A message file is read as raw bytes.
///
/// # Errors
///
/// Returns [`AppError::Read`] when the message file cannot be read.
pub(super) fn resolve_message(
    args: &mut EncodingArgs,
) -> Result<Vec<u8>, AppError>
{
    match args.message_file.as_deref()
    {
        Some(path) => fs::read(path).map_err(|source| AppError::Read {
            path: path.into(),
            source,
        }),
        // take the ownership of the words
        None => Ok(std::mem::take(&mut args.words).join(" ").into_bytes()),
    }
}

/// Writes a recovered message to `output`, or to stdout followed by a newline
/// when no path is given.
///
/// # Errors
///
/// Returns [`AppError::Write`] when the file cannot be written or
/// [`AppError::Io`] when stdout is closed.
pub(super) fn deliver_message(
    message: &[u8],
    output: Option<&Path>,
) -> Result<(), AppError>
{
    match output
    {
        Some(path) => fs::write(path, message).map_err(|source| {
            AppError::Write {
                path: path.into(),
                source,
            }
        }),
        None =>
        {
            let stdout = io::stdout();
            print_message(&mut stdout.lock(), message)?;
            Ok(())
        },
    }
}

/// Writes the message bytes as they are, then a newline.
fn print_message(writer: &mut impl Write, message: &[u8]) -> io::Result<()>
{
    writer.write_all(message)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests
{
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    fn encoding_args(
        words: &[&str],
        message_file: Option<PathBuf>,
    ) -> EncodingArgs
    {
        EncodingArgs {
            input: PathBuf::from("input.png"),
            words: words.iter().map(ToString::to_string).collect(),
            message_file,
            output: None,
        }
    }

    #[test]
    fn resolve_message_joins_words()
    {
        let mut args = encoding_args(&["meet", "at", "noon"], None);

        let resolved = resolve_message(&mut args).expect("should resolve");
        assert_eq!(resolved, b"meet at noon");
    }

    #[test]
    fn resolve_message_without_words_is_empty()
    {
        let mut args = encoding_args(&[], None);

        let resolved = resolve_message(&mut args).expect("should resolve");
        assert!(resolved.is_empty());
    }

    #[test]
    fn resolve_message_reads_from_file()
    {
        let dir = TempDir::new().expect("failed to create tempdir");
        let path = dir.path().join("message.bin");
        fs::write(&path, [0u8, 1, 2, 0xFF]).expect("failed to write message");

        let mut args = encoding_args(&[], Some(path));

        let resolved = resolve_message(&mut args).expect("should resolve file");
        assert_eq!(resolved, [0u8, 1, 2, 0xFF]);
    }

    #[test]
    fn resolve_message_accepts_empty_file()
    {
        let dir = TempDir::new().expect("failed to create tempdir");
        let path = dir.path().join("empty.txt");
        fs::write(&path, b"").expect("failed to write message");

        let mut args = encoding_args(&[], Some(path));

        let resolved = resolve_message(&mut args).expect("should resolve file");
        assert!(resolved.is_empty());
    }

    #[test]
    fn resolve_message_reports_missing_file()
    {
        let dir = TempDir::new().expect("failed to create tempdir");
        let mut args =
            encoding_args(&[], Some(dir.path().join("missing.txt")));

        let error =
            resolve_message(&mut args).expect_err("missing file must fail");
        assert!(matches!(error, AppError::Read { .. }));
    }

    #[test]
    fn print_message_appends_newline()
    {
        let mut out = Vec::new();
        print_message(&mut out, b"hello").expect("write to vec");
        assert_eq!(out, b"hello\n");
    }

    #[test]
    fn deliver_message_writes_file_verbatim()
    {
        let dir = TempDir::new().expect("failed to create tempdir");
        let path = dir.path().join("out.txt");

        deliver_message(b"hidden", Some(path.as_path()))
            .expect("should write file");

        assert_eq!(fs::read(&path).expect("should read back"), b"hidden");
    }
}
