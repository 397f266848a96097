use crate::error::{CliError, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry, filter::LevelFilter, fmt, prelude::*};

/// Maps `-v` repetitions to a level; `--quiet` keeps errors only.
fn console_level(verbosity: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbosity) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Plain-text records with targets, for `--log-file`.
fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
}

/// Installs the global subscriber. Workflow spans and events go to stderr,
/// and are copied into `log_file` when one is given.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let copy = log_file
        .map(|path| File::create(path).map(file_layer::<Registry>))
        .transpose()?;

    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(copy)
        .with(console)
        .with(console_level(verbosity, quiet))
        .try_init()
        .map_err(|e| CliError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::{debug, info, trace};

    #[test]
    fn verbosity_selects_the_console_level() {
        assert_eq!(console_level(0, false), LevelFilter::WARN);
        assert_eq!(console_level(1, false), LevelFilter::INFO);
        assert_eq!(console_level(2, false), LevelFilter::DEBUG);
        assert_eq!(console_level(9, false), LevelFilter::TRACE);
        assert_eq!(console_level(3, true), LevelFilter::ERROR);
    }

    #[test]
    #[serial]
    fn log_file_copy_records_workflow_messages_with_targets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("molpipe.log");
        let subscriber = tracing_subscriber::registry()
            .with(file_layer::<Registry>(File::create(&path).unwrap()));

        tracing::subscriber::with_default(subscriber, || {
            debug!("Requesting {} SMILES ({} left).", 4, 10);
            trace!("Wrote conformer {} of {}.", 1, 1);
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("DEBUG"));
        assert!(content.contains("Requesting 4 SMILES (10 left)."));
        assert!(content.contains("Wrote conformer 1 of 1."));
        assert!(content.contains("logging::tests"));
        assert!(!content.contains("\x1b["));
    }

    #[test]
    #[serial]
    fn global_subscriber_installs_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        setup_logging(3, false, Some(path.clone())).unwrap();
        info!("Sampling 5 SMILES in batches of 2.");
        let second = setup_logging(1, false, None);

        assert!(std::fs::read_to_string(&path).unwrap().contains("Sampling 5 SMILES"));
        assert!(matches!(second, Err(CliError::Other(_))));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = setup_logging(0, false, Some(dir.path().to_path_buf()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
