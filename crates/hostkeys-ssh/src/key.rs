// ABOUTME: Key file handling: overwrite guard, in-process generation, fingerprints.
// ABOUTME: Writes ed25519 key pairs with ssh-key and reads public keys back.

use crate::error::{KeygenError, Result};
use crate::host::{public_key_path, KeySpec, KeyType};
use crate::keygen::KeyGenerator;
use async_trait::async_trait;
use ssh_key::{Algorithm, HashAlg, LineEnding, PrivateKey, PublicKey};
use std::path::{Path, PathBuf};

/// Make sure the key files for `spec` can be written.
///
/// Without `clobber`, an existing private or public key file is an error.
/// With `clobber`, both are removed so the generator never has to decide.
///
/// # Errors
/// Returns `AlreadyExists` or `RemoveExisting`.
pub fn prepare_target(spec: &KeySpec, clobber: bool) -> Result<()> {
    for path in [spec.path.clone(), spec.public_key_path()] {
        if !path.exists() {
            continue;
        }
        if !clobber {
            return Err(KeygenError::AlreadyExists { path });
        }
        tracing::debug!(path = %path.display(), "Removing existing key file");
        std::fs::remove_file(&path)
            .map_err(|e| KeygenError::RemoveExisting { path, source: e })?;
    }
    Ok(())
}

/// Load an OpenSSH public key from disk.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_public_key(path: &Path) -> Result<PublicKey> {
    let data = std::fs::read_to_string(path).map_err(|e| KeygenError::ReadKey {
        path: path.to_path_buf(),
        source: e,
    })?;

    PublicKey::from_openssh(data.trim()).map_err(|e| KeygenError::ParseKey {
        path: path.to_path_buf(),
        source: e,
    })
}

/// SHA256 fingerprint in the `SHA256:<base64>` form printed by `ssh-keygen -l`.
pub fn fingerprint(public_key: &PublicKey) -> String {
    public_key.fingerprint(HashAlg::Sha256).to_string()
}

/// Generates keys in-process with the `ssh-key` crate.
///
/// Produces the same files `ssh-keygen` would: an OpenSSH private key with
/// 0600 permissions and a one-line public key next to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeKeygen;

#[async_trait]
impl KeyGenerator for NativeKeygen {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn generate_keypair(&self, spec: &KeySpec) -> Result<PathBuf> {
        generate_key(spec)
    }
}

/// Generate a key pair for `spec` and save both halves to disk.
///
/// # Errors
/// Returns an error if key generation, encryption, or file writing fails.
pub fn generate_key(spec: &KeySpec) -> Result<PathBuf> {
    let algorithm = match spec.key_type {
        KeyType::Ed25519 => Algorithm::Ed25519,
    };

    let mut rng = rand::thread_rng();
    let mut private_key =
        PrivateKey::random(&mut rng, algorithm).map_err(KeygenError::GenerateKey)?;
    if let Some(comment) = &spec.comment {
        private_key.set_comment(comment.as_str());
    }

    // The public half must be taken before encryption.
    let public_key_str = private_key
        .public_key()
        .to_openssh()
        .map_err(KeygenError::SerializeKey)?;

    if !spec.passphrase.is_empty() {
        private_key = private_key
            .encrypt(&mut rng, spec.passphrase.as_bytes())
            .map_err(KeygenError::EncryptKey)?;
    }

    let private_key_str = private_key
        .to_openssh(LineEnding::LF)
        .map_err(KeygenError::SerializeKey)?;

    write_file(&spec.path, private_key_str.as_bytes())?;

    // Set restrictive permissions on Unix (0600 = rw-------)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&spec.path, std::fs::Permissions::from_mode(0o600)).map_err(
            |e| KeygenError::SetPermissions {
                path: spec.path.clone(),
                source: e,
            },
        )?;
    }

    let pub_key_path = public_key_path(&spec.path);
    write_file(&pub_key_path, format!("{public_key_str}\n").as_bytes())?;

    Ok(pub_key_path)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| KeygenError::WriteKey {
        path: path.to_path_buf(),
        source: e,
    })
}
