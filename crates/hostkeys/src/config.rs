// ABOUTME: Run configuration for hostkeys and its optional TOML config file
// ABOUTME: Holds built-in defaults and resolves ~ in key directories

use anyhow::{Context, Result};
use hostkeys_log::LogOptions;
use hostkeys_ssh::{KeyGenerator, NativeKeygen, SshKeygen};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Machine list scraped when `--url` is given without a value.
pub const DEFAULT_URL: &str = "https://db.torproject.org/machines.cgi";

/// Pattern matching hostnames on the default machine list.
pub const DEFAULT_REGEX: &str = r"[a-z0-9-]+\.torproject\.org";

/// Where keys are written unless told otherwise.
pub const DEFAULT_KEY_DIR: &str = "~/.ssh/torproject";

/// Optional settings file (~/.config/hostkeys/config.toml)
///
/// Every field is optional; command line flags and environment variables
/// take precedence.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// URL fetched by a bare `--url`
    pub url: Option<String>,
    pub regex: Option<String>,
    pub dir: Option<PathBuf>,
    pub comment: Option<String>,
    /// Generate keys in-process instead of running ssh-keygen
    pub native: Option<bool>,
    pub keygen_binary: Option<PathBuf>,
}

impl FileConfig {
    /// Returns the default config file path
    ///
    /// Uses `XDG_CONFIG_HOME` if set, otherwise falls back to `~/.config`.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|p| p.join("hostkeys").join("config.toml"))
    }

    /// Loads a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Loads `explicit` if given, else the default file if it exists
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// How keys get generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Run this `ssh-keygen` compatible binary once per host.
    SshKeygen(PathBuf),
    /// Generate in-process with the ssh-key crate.
    Native,
}

impl Backend {
    pub fn generator(&self) -> Box<dyn KeyGenerator> {
        match self {
            Backend::SshKeygen(binary) => Box::new(SshKeygen::new(binary.clone())),
            Backend::Native => Box::new(NativeKeygen),
        }
    }
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Page to scrape for hostnames; `None` means no fetch.
    pub url: Option<String>,
    /// Extraction pattern applied to the fetched page.
    pub pattern: String,
    /// Hosts given on the command line, appended after fetched ones.
    pub hosts: Vec<String>,
    pub dir: PathBuf,
    pub clobber: bool,
    pub comment: Option<String>,
    /// Ask for a passphrase shared by every generated key.
    pub prompt_password: bool,
    pub backend: Backend,
    pub log: LogOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            pattern: DEFAULT_REGEX.to_string(),
            hosts: Vec::new(),
            dir: PathBuf::from(DEFAULT_KEY_DIR),
            clobber: false,
            comment: None,
            prompt_password: false,
            backend: Backend::SshKeygen(PathBuf::from(hostkeys_ssh::DEFAULT_KEYGEN_BINARY)),
            log: LogOptions::default(),
        }
    }
}

/// Replace a leading `~` with the home directory.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().context("Could not determine home directory")?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}
