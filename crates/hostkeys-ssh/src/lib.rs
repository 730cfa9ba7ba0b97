// ABOUTME: Per-host SSH keypair generation for hostkeys.
// ABOUTME: Provides hostname parsing, key specs, and ssh-keygen/in-process generators.

//! # hostkeys-ssh
//!
//! Everything needed to go from a hostname to a keypair on disk.
//!
//! ## Features
//!
//! - **Hostnames**: parse `<host>.<domain>.<tld>` names and derive
//!   deterministic key file names (`id_ed25519_<domain>_<host>`)
//! - **Generators**: the [`KeyGenerator`] capability, backed either by an
//!   `ssh-keygen` subprocess or by the `ssh-key` crate
//! - **Overwrite guard**: refuse or clobber existing key files before generation
//!
//! ## Example
//!
//! ```no_run
//! use hostkeys_ssh::{prepare_target, HostName, KeyGenerator, KeySpec, SshKeygen};
//! use std::path::Path;
//!
//! # async fn demo() -> hostkeys_ssh::Result<()> {
//! let host = HostName::parse("alberti.torproject.org")?;
//! let spec = KeySpec::for_host(&host, Path::new("/tmp/keys"), "", Some("ops"));
//! prepare_target(&spec, false)?;
//! let public_key = SshKeygen::default().generate_keypair(&spec).await?;
//! println!("{}", public_key.display());
//! # Ok(())
//! # }
//! ```

mod error;
mod host;
mod key;
mod keygen;

pub use error::{KeygenError, Result};
pub use host::{public_key_path, HostName, KeySpec, KeyType, ALIAS_PREFIX};
pub use key::{fingerprint, generate_key, load_public_key, prepare_target, NativeKeygen};
pub use keygen::{KeyGenerator, SshKeygen, DEFAULT_KEYGEN_BINARY};
