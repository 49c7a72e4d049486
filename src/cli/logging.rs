//! Logger setup for the command line.
//!
//! Log lines go to stderr so they never mix with a message printed to stdout.
use std::io::Write;

use env_logger::{Builder, Target};
use log::{LevelFilter, SetLoggerError};

/// Installs the global logger for the requested verbosity.
///
/// # Errors
///
/// Returns [`SetLoggerError`] when a logger is already installed.
pub(super) fn init(verbose: u8, quiet: bool) -> Result<(), SetLoggerError>
{
    Builder::new()
        .format(|buf, record| {
            writeln!(buf, "[{}] {}", record.level(), record.args())
        })
        .filter_level(level_filter(verbose, quiet))
        .target(Target::Stderr)
        .try_init()
}

/// Maps `-v` occurrences and `-q` to a level, warnings being the default.
fn level_filter(verbose: u8, quiet: bool) -> LevelFilter
{
    if quiet
    {
        return LevelFilter::Off;
    }

    match verbose
    {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn verbosity_raises_the_level()
    {
        assert_eq!(level_filter(0, false), LevelFilter::Warn);
        assert_eq!(level_filter(1, false), LevelFilter::Info);
        assert_eq!(level_filter(2, false), LevelFilter::Debug);
        assert_eq!(level_filter(7, false), LevelFilter::Trace);
    }

    #[test]
    fn quiet_wins()
    {
        assert_eq!(level_filter(3, true), LevelFilter::Off);
    }
}
