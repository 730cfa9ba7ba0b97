// ABOUTME: Error types for per-host key generation using thiserror.
// ABOUTME: Provides typed errors for hostname parsing, key files, and ssh-keygen runs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating a keypair for one host.
///
/// None of these abort a run; the caller logs them and moves on to the
/// next host.
#[derive(Error, Debug)]
pub enum KeygenError {
    /// Hostname does not have the `<host>.<domain>.<tld>` shape.
    #[error("malformed hostname {0:?}: expected <host>.<domain>.<tld>")]
    MalformedHost(String),

    /// A key file is already present and overwriting was not requested.
    #[error("key file {path} already exists (use --clobber to replace it)")]
    AlreadyExists { path: PathBuf },

    /// Failed to remove an existing key file before regenerating it.
    #[error("failed to remove existing key {path}: {source}")]
    RemoveExisting {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key generation executable could not be started.
    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key generation executable exited unsuccessfully.
    #[error("{binary} exited with {}: {stderr}", exit_code_label(.code))]
    Failed {
        binary: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// Failed to generate an SSH key in-process.
    #[error("failed to generate SSH key: {0}")]
    GenerateKey(#[source] ssh_key::Error),

    /// Failed to encrypt a private key with the passphrase.
    #[error("failed to encrypt SSH key: {0}")]
    EncryptKey(#[source] ssh_key::Error),

    /// Failed to serialize a key.
    #[error("failed to serialize key: {0}")]
    SerializeKey(#[source] ssh_key::Error),

    /// Failed to read a key file from disk.
    #[error("failed to read SSH key from {path}: {source}")]
    ReadKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse an SSH key.
    #[error("failed to parse SSH key from {path}: {source}")]
    ParseKey {
        path: PathBuf,
        #[source]
        source: ssh_key::Error,
    },

    /// Failed to write a key file to disk.
    #[error("failed to write key to {path}: {source}")]
    WriteKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set file permissions.
    #[error("failed to set permissions on {path}: {source}")]
    SetPermissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (killed by signal)".to_string(),
    }
}

/// Result type alias using KeygenError.
pub type Result<T> = std::result::Result<T, KeygenError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_malformed_host_display() {
        let err = KeygenError::MalformedHost("localhost".to_string());
        let display = err.to_string();
        assert!(display.contains("malformed hostname"));
        assert!(display.contains("\"localhost\""));
    }

    #[test]
    fn test_already_exists_mentions_clobber() {
        let err = KeygenError::AlreadyExists {
            path: PathBuf::from("/keys/id_ed25519_example_alpha"),
        };
        let display = err.to_string();
        assert!(display.contains("/keys/id_ed25519_example_alpha"));
        assert!(display.contains("--clobber"));
    }

    #[test]
    fn test_failed_display_with_code() {
        let err = KeygenError::Failed {
            binary: PathBuf::from("ssh-keygen"),
            code: Some(1),
            stderr: "Saving key failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ssh-keygen exited with status 1: Saving key failed"
        );
    }

    #[test]
    fn test_failed_display_without_code() {
        let err = KeygenError::Failed {
            binary: PathBuf::from("ssh-keygen"),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("killed by signal"));
    }

    #[test]
    fn test_spawn_error_source() {
        use std::error::Error;

        let err = KeygenError::Spawn {
            binary: PathBuf::from("/nonexistent/ssh-keygen"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/nonexistent/ssh-keygen"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_parse_key() {
        use std::error::Error;

        let err = KeygenError::ParseKey {
            path: PathBuf::from("/path"),
            source: ssh_key::Error::AlgorithmUnknown,
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_no_source_failed() {
        use std::error::Error;

        let err = KeygenError::Failed {
            binary: PathBuf::from("ssh-keygen"),
            code: Some(255),
            stderr: "boom".to_string(),
        };
        assert!(err.source().is_none());
    }
}
