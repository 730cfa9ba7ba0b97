// ABOUTME: Key generation stage: one keypair per host, failures skipped
// ABOUTME: Parses hostnames, applies the overwrite guard, and calls the generator

use crate::config::Config;
use crate::error::{Result, RunError};
use hostkeys_ssh::{
    fingerprint, load_public_key, prepare_target, HostName, KeyGenerator, KeySpec,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// A successfully generated keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub host: HostName,
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

/// Generate a keypair for every host, in order.
///
/// A host that fails for any reason is logged and left out of the result;
/// the remaining hosts are still processed.
///
/// # Errors
/// Only a key directory that cannot be created ends the run.
pub async fn generate_all(
    hosts: &[String],
    config: &Config,
    passphrase: &str,
    generator: &dyn KeyGenerator,
) -> Result<Vec<KeyPair>> {
    if hosts.is_empty() {
        info!("No hosts to generate keys for");
        return Ok(Vec::new());
    }

    ensure_key_dir(&config.dir)?;

    let mut pairs = Vec::with_capacity(hosts.len());
    for name in hosts {
        match generate_one(name, config, passphrase, generator).await {
            Ok(pair) => pairs.push(pair),
            Err(e) => error!(host = %name, error = %e, "Skipping host"),
        }
    }

    info!(
        generated = pairs.len(),
        requested = hosts.len(),
        generator = generator.name(),
        "Key generation finished"
    );
    Ok(pairs)
}

async fn generate_one(
    name: &str,
    config: &Config,
    passphrase: &str,
    generator: &dyn KeyGenerator,
) -> hostkeys_ssh::Result<KeyPair> {
    let host = HostName::parse(name)?;
    let spec = KeySpec::for_host(&host, &config.dir, passphrase, config.comment.as_deref());
    prepare_target(&spec, config.clobber)?;

    debug!(host = %host, path = %spec.path.display(), "Generating key");
    let public_key = generator.generate_keypair(&spec).await?;

    // The formatter reads the public key again and treats a bad file as fatal.
    match load_public_key(&public_key) {
        Ok(key) => info!(
            host = %host,
            fingerprint = %fingerprint(&key),
            path = %public_key.display(),
            "Generated key"
        ),
        Err(e) => warn!(host = %host, error = %e, "Could not fingerprint public key"),
    }

    Ok(KeyPair {
        host,
        private_key: spec.path,
        public_key,
    })
}

/// Create the key directory (0700 on Unix) if it does not exist yet.
fn ensure_key_dir(dir: &Path) -> Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|e| RunError::KeyDirectory {
        path: dir.to_path_buf(),
        source: e,
    })
}
