// ABOUTME: Hostname parsing and per-host key specifications.
// ABOUTME: Derives deterministic key file paths from <host>.<domain>.<tld> names.

use crate::error::{KeygenError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix used for the short SSH client alias of every host.
pub const ALIAS_PREFIX: &str = "tor-";

/// A hostname of the form `<host>.<domain>.<tld>`.
///
/// The trailing part may itself contain dots, so both
/// `alberti.torproject.org` and `alpha.example.torproject.org` parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostName {
    full: String,
    host: String,
    domain: String,
}

impl HostName {
    /// Parse a hostname, rejecting anything without at least three labels.
    ///
    /// # Errors
    /// Returns `KeygenError::MalformedHost` if the name does not match.
    pub fn parse(name: &str) -> Result<Self> {
        let malformed = || KeygenError::MalformedHost(name.to_string());

        let mut parts = name.splitn(3, '.');
        let host = parts.next().filter(|l| is_label(l)).ok_or_else(malformed)?;
        let domain = parts.next().filter(|l| is_label(l)).ok_or_else(malformed)?;
        let rest = parts.next().ok_or_else(malformed)?;

        if !rest.split('.').all(is_label) {
            return Err(malformed());
        }

        Ok(Self {
            full: name.to_string(),
            host: host.to_string(),
            domain: domain.to_string(),
        })
    }

    /// The full hostname as given.
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// First label (`alpha` in `alpha.example.torproject.org`).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Second label (`example` in `alpha.example.torproject.org`).
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Short alias used in the SSH client config, e.g. `tor-alpha`.
    pub fn alias(&self) -> String {
        format!("{ALIAS_PREFIX}{}", self.host)
    }

    /// Key file name for this host: `id_<type>_<domain>_<host>`.
    pub fn key_file_name(&self, key_type: KeyType) -> String {
        format!("id_{}_{}_{}", key_type.as_str(), self.domain, self.host)
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Key algorithm used for every generated key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyType {
    #[default]
    Ed25519,
}

impl KeyType {
    /// Name as understood by `ssh-keygen -t`.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ed25519",
        }
    }
}

/// Everything needed to generate one host's keypair.
#[derive(Clone)]
pub struct KeySpec {
    pub key_type: KeyType,
    /// Private key path; the public key is this path plus `.pub`.
    pub path: PathBuf,
    /// Shared passphrase; empty means the key is not encrypted.
    pub passphrase: String,
    pub comment: Option<String>,
}

impl KeySpec {
    /// Build the spec for `host` inside `dir`.
    pub fn for_host(
        host: &HostName,
        dir: &Path,
        passphrase: &str,
        comment: Option<&str>,
    ) -> Self {
        let key_type = KeyType::default();
        Self {
            key_type,
            path: dir.join(host.key_file_name(key_type)),
            passphrase: passphrase.to_string(),
            comment: comment.map(str::to_string),
        }
    }

    /// Path of the public half of the keypair.
    pub fn public_key_path(&self) -> PathBuf {
        public_key_path(&self.path)
    }
}

impl fmt::Debug for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySpec")
            .field("key_type", &self.key_type)
            .field("path", &self.path)
            .field("passphrase", &"[REDACTED]")
            .field("comment", &self.comment)
            .finish()
    }
}

/// Append `.pub` to a private key path.
///
/// `Path::with_extension` would replace anything after the last dot, so the
/// suffix is appended to the raw file name instead.
pub fn public_key_path(private_key: &Path) -> PathBuf {
    let mut name = private_key.as_os_str().to_owned();
    name.push(".pub");
    PathBuf::from(name)
}
