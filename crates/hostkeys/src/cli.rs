// ABOUTME: Command line interface for hostkeys
// ABOUTME: Parses flags with clap and merges them with the config file into a Config

use crate::config::{
    expand_home, Backend, Config, FileConfig, DEFAULT_KEY_DIR, DEFAULT_REGEX, DEFAULT_URL,
};
use crate::source::split_hosts;
use anyhow::Result;
use clap::{ArgGroup, Parser, ValueEnum};
use hostkeys_log::{LogDestination, LogOptions};
use std::path::PathBuf;

/// Log severities accepted by `--loglevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            // tracing has nothing above ERROR
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hostkeys")]
#[command(about = "Generate one SSH key per host and print allowed_hosts and ssh_config entries")]
#[command(version)]
#[command(group(ArgGroup::new("log_destination").args(["stderr", "stdout", "logfile"])))]
pub struct Cli {
    /// Comma-separated hostnames, appended after any fetched hosts
    #[arg(long, value_name = "HOST,...")]
    pub hosts: Option<String>,

    /// Directory for generated keys (defaults to ~/.ssh/torproject)
    #[arg(long, env = "HOSTKEYS_DIR")]
    pub dir: Option<PathBuf>,

    /// Replace key files that already exist
    #[arg(long)]
    pub clobber: bool,

    /// Comment embedded in every generated key
    #[arg(long)]
    pub comment: Option<String>,

    /// Prompt once for a passphrase shared by all generated keys
    #[arg(long)]
    pub password: bool,

    /// Fetch hostnames from this page (without a value: the default machine list)
    #[arg(long, value_name = "URL", num_args = 0..=1)]
    pub url: Option<Option<String>>,

    /// Pattern extracting hostnames from the fetched page
    #[arg(long, env = "HOSTKEYS_REGEX")]
    pub regex: Option<String>,

    /// Generate keys in-process instead of running ssh-keygen
    #[arg(long)]
    pub native: bool,

    /// ssh-keygen compatible executable
    #[arg(long, env = "HOSTKEYS_KEYGEN", value_name = "PATH")]
    pub keygen_binary: Option<PathBuf>,

    /// Config file (defaults to ~/.config/hostkeys/config.toml)
    #[arg(long, env = "HOSTKEYS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log to stderr
    #[arg(long)]
    pub stderr: bool,

    /// Log to stdout (default)
    #[arg(long)]
    pub stdout: bool,

    /// Log to a file
    #[arg(long, value_name = "PATH")]
    pub logfile: Option<PathBuf>,

    /// Minimum severity to log
    #[arg(long, value_enum, default_value_t = LogLevel::Warning)]
    pub loglevel: LogLevel,
}

impl Cli {
    /// Load the config file and merge it under the command line flags.
    pub fn into_config(self) -> Result<Config> {
        let file = FileConfig::load_or_default(self.config.as_deref())?;
        self.resolve(file)
    }

    /// Merge flags over `file` over the built-in defaults.
    pub fn resolve(self, file: FileConfig) -> Result<Config> {
        let url = match self.url {
            None => None,
            Some(Some(url)) => Some(url),
            Some(None) => Some(file.url.unwrap_or_else(|| DEFAULT_URL.to_string())),
        };

        let dir = self
            .dir
            .or(file.dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KEY_DIR));

        let backend = if self.native || file.native.unwrap_or(false) {
            Backend::Native
        } else {
            Backend::SshKeygen(
                self.keygen_binary
                    .or(file.keygen_binary)
                    .unwrap_or_else(|| PathBuf::from(hostkeys_ssh::DEFAULT_KEYGEN_BINARY)),
            )
        };

        let destination = if self.stderr {
            LogDestination::Stderr
        } else if let Some(path) = self.logfile {
            LogDestination::File(path)
        } else {
            LogDestination::Stdout
        };

        Ok(Config {
            url,
            pattern: self
                .regex
                .or(file.regex)
                .unwrap_or_else(|| DEFAULT_REGEX.to_string()),
            hosts: self.hosts.as_deref().map(split_hosts).unwrap_or_default(),
            dir: expand_home(&dir)?,
            clobber: self.clobber,
            comment: self.comment.or(file.comment),
            prompt_password: self.password,
            backend,
            log: LogOptions {
                destination,
                level: self.loglevel.into(),
            },
        })
    }
}
