// ABOUTME: Logging setup for the hostkeys binary
// ABOUTME: Builds a tracing subscriber for stdout, stderr, or a log file and returns its guard

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::dispatcher::DefaultGuard;
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogDestination {
    #[default]
    Stdout,
    Stderr,
    /// Appended to; created if missing.
    File(PathBuf),
}

/// Logging settings chosen on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub destination: LogDestination,
    pub level: Level,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            destination: LogDestination::default(),
            level: Level::WARN,
        }
    }
}

/// Keeps the subscriber installed. Logging stops when it is dropped.
#[must_use = "logging is disabled as soon as the guard is dropped"]
pub struct LogGuard {
    _default: DefaultGuard,
}

/// Install a subscriber for the current thread. `options.level` applies
/// unless `RUST_LOG` is set, in which case its directives replace it.
///
/// # Errors
/// Returns an error if the log file cannot be opened.
pub fn init(options: &LogOptions) -> std::io::Result<LogGuard> {
    let (writer, ansi) = match &options.destination {
        LogDestination::Stdout => (BoxMakeWriter::new(std::io::stdout), false),
        LogDestination::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogDestination::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(build_filter(
            options.level,
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_ansi(ansi)
        .finish();

    Ok(LogGuard {
        _default: tracing::subscriber::set_default(subscriber),
    })
}

fn build_filter(level: Level, rust_log: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn default_options_log_warnings_to_stdout() {
        let options = LogOptions::default();
        assert_eq!(options.destination, LogDestination::Stdout);
        assert_eq!(options.level, Level::WARN);
    }

    #[test]
    fn file_destination_receives_events() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("hostkeys.log");
        let options = LogOptions {
            destination: LogDestination::File(path.clone()),
            level: Level::INFO,
        };

        {
            let _guard = init(&options).expect("should open log file");
            tracing::info!(host = "alpha.example.torproject.org", "generated key");
            tracing::debug!("below the threshold");
        }
        tracing::info!("after the guard is gone");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("generated key"));
        assert!(contents.contains("alpha.example.torproject.org"));
        assert!(!contents.contains("below the threshold"));
        assert!(!contents.contains("after the guard is gone"));
    }

    #[test]
    fn file_destination_appends() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("hostkeys.log");
        std::fs::write(&path, "earlier run\n").unwrap();
        let options = LogOptions {
            destination: LogDestination::File(path.clone()),
            level: Level::WARN,
        };

        {
            let _guard = init(&options).expect("should open log file");
            tracing::warn!("later run");
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier run\n"));
        assert!(contents.contains("later run"));
    }

    #[test]
    fn level_applies_without_rust_log() {
        let filter = build_filter(Level::INFO, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));

        let filter = build_filter(Level::ERROR, Some(""));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn rust_log_replaces_level() {
        let filter = build_filter(Level::WARN, Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = build_filter(Level::WARN, Some("error"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn unopenable_log_file_is_an_error() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let options = LogOptions {
            destination: LogDestination::File(temp_dir.path().join("missing/dir/x.log")),
            level: Level::WARN,
        };
        assert!(init(&options).is_err());
    }
}
