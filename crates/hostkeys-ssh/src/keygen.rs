// ABOUTME: KeyGenerator capability and the ssh-keygen subprocess implementation.
// ABOUTME: Runs one ssh-keygen process per host, capturing its output streams.

use crate::error::{KeygenError, Result};
use crate::host::KeySpec;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Default key generation executable.
pub const DEFAULT_KEYGEN_BINARY: &str = "ssh-keygen";

/// Something that can turn a `KeySpec` into a keypair on disk.
#[async_trait]
pub trait KeyGenerator: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Generate the keypair described by `spec`.
    ///
    /// Returns the path of the written public key.
    async fn generate_keypair(&self, spec: &KeySpec) -> Result<PathBuf>;
}

/// Runs an external `ssh-keygen` compatible binary.
#[derive(Debug, Clone)]
pub struct SshKeygen {
    binary: PathBuf,
}

impl Default for SshKeygen {
    fn default() -> Self {
        Self::new(DEFAULT_KEYGEN_BINARY)
    }
}

impl SshKeygen {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    fn command(&self, spec: &KeySpec) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-t")
            .arg(spec.key_type.as_str())
            .arg("-f")
            .arg(&spec.path)
            .arg("-N")
            .arg(&spec.passphrase);
        if let Some(comment) = &spec.comment {
            cmd.arg("-C").arg(comment);
        }
        // Closed stdin makes any interactive question fail instead of hanging.
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl KeyGenerator for SshKeygen {
    fn name(&self) -> &'static str {
        "ssh-keygen"
    }

    async fn generate_keypair(&self, spec: &KeySpec) -> Result<PathBuf> {
        let output = self
            .command(spec)
            .output()
            .await
            .map_err(|e| KeygenError::Spawn {
                binary: self.binary.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(KeygenError::Failed {
                binary: self.binary.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        tracing::debug!(
            binary = %self.binary.display(),
            path = %spec.path.display(),
            stdout = %stdout.trim(),
            "Key generation finished"
        );

        Ok(spec.public_key_path())
    }
}
