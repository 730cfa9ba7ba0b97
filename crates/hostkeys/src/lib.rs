// ABOUTME: Library for the hostkeys tool.
// ABOUTME: Wires host source, key generation, and formatting into a single run.

//! # hostkeys
//!
//! Generates one SSH keypair per host and prints the lines needed to use
//! them:
//!
//! ```text
//! allowed_hosts=alpha.example.torproject.org ssh-ed25519 AAAA... comment
//! allowed_hosts=beta.example.torproject.org ssh-ed25519 AAAA... comment
//! Host tor-alpha
//!     Hostname alpha.example.torproject.org
//!     IdentityFile /home/me/.ssh/torproject/id_ed25519_example_alpha
//!
//! Host tor-beta
//!     ...
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Keys for every host on the machine list
//! hostkeys --url
//!
//! # Keys for two hosts, passphrase protected
//! hostkeys --hosts alpha.example.torproject.org,beta.example.torproject.org --password
//! ```
//!
//! A failed fetch exits with status 2. Hosts whose key generation fails are
//! logged and left out of the output; the run still exits with status 0.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod generate;
pub mod source;

pub use config::{Backend, Config};
pub use error::{FetchError, Result, RunError, EXIT_FAILURE, EXIT_FETCH_FAILED};
pub use generate::KeyPair;
pub use source::{HostFetcher, HttpFetcher};

use hostkeys_ssh::KeyGenerator;

/// Resolve hosts, generate their keys, and render the output text.
///
/// # Errors
/// Returns `RunError::Fetch` if the host list cannot be fetched (no key is
/// generated in that case), or another `RunError` for unrecoverable
/// problems. Per-host failures are logged, not returned.
pub async fn run(
    config: &Config,
    passphrase: &str,
    fetcher: &dyn HostFetcher,
    generator: &dyn KeyGenerator,
) -> Result<String> {
    let hosts = source::resolve_hosts(config, fetcher).await?;
    let pairs = generate::generate_all(&hosts, config, passphrase, generator).await?;
    format::render(&pairs)
}

/// Ask for the passphrase shared by all keys of this run. Empty is allowed
/// and means no passphrase.
pub fn prompt_passphrase() -> Result<String> {
    let passphrase = dialoguer::Password::new()
        .with_prompt("Passphrase for generated keys (empty for none)")
        .with_confirmation("Repeat passphrase", "Passphrases do not match")
        .allow_empty_password(true)
        .interact()?;
    Ok(passphrase)
}
