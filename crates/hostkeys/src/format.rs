// ABOUTME: Renders generated keypairs as allowed_hosts lines and ssh_config stanzas
// ABOUTME: Public key file contents are copied verbatim

use crate::error::{Result, RunError};
use crate::generate::KeyPair;
use std::fs;

/// `allowed_hosts=<host> <public key file contents>`
pub fn allowed_hosts_line(pair: &KeyPair) -> Result<String> {
    let public_key = fs::read_to_string(&pair.public_key).map_err(|e| RunError::ReadPublicKey {
        path: pair.public_key.clone(),
        source: e,
    })?;
    Ok(format!("allowed_hosts={} {}", pair.host, public_key))
}

/// SSH client config block for one host, ending with a blank line.
pub fn config_stanza(pair: &KeyPair) -> String {
    format!(
        "Host {}\n    Hostname {}\n    IdentityFile {}\n\n",
        pair.host.alias(),
        pair.host,
        pair.private_key.display()
    )
}

/// All `allowed_hosts` lines followed by all config stanzas.
///
/// # Errors
/// A public key file that cannot be read.
pub fn render(pairs: &[KeyPair]) -> Result<String> {
    let mut out = String::new();
    for pair in pairs {
        out.push_str(&allowed_hosts_line(pair)?);
    }
    for pair in pairs {
        out.push_str(&config_stanza(pair));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostkeys_ssh::{public_key_path, HostName};
    use std::path::Path;
    use tempfile::TempDir;

    fn pair_in(dir: &Path, name: &str, public_key: &str) -> KeyPair {
        let host = HostName::parse(name).unwrap();
        let private_key = dir.join(host.key_file_name(Default::default()));
        let public = public_key_path(&private_key);
        std::fs::write(&public, public_key).unwrap();
        KeyPair {
            host,
            private_key,
            public_key: public,
        }
    }

    #[test]
    fn test_allowed_hosts_line_is_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let pair = pair_in(
            temp_dir.path(),
            "alpha.example.torproject.org",
            "ssh-ed25519 AAAAC3Nz alpha@ops  \n",
        );

        assert_eq!(
            allowed_hosts_line(&pair).unwrap(),
            "allowed_hosts=alpha.example.torproject.org ssh-ed25519 AAAAC3Nz alpha@ops  \n"
        );
    }

    #[test]
    fn test_config_stanza() {
        let temp_dir = TempDir::new().unwrap();
        let pair = pair_in(temp_dir.path(), "alpha.example.torproject.org", "k\n");

        assert_eq!(
            config_stanza(&pair),
            format!(
                "Host tor-alpha\n    Hostname alpha.example.torproject.org\n    IdentityFile {}\n\n",
                temp_dir.path().join("id_ed25519_example_alpha").display()
            )
        );
    }

    #[test]
    fn test_render_orders_blocks() {
        let temp_dir = TempDir::new().unwrap();
        let pairs = vec![
            pair_in(temp_dir.path(), "alpha.example.torproject.org", "A\n"),
            pair_in(temp_dir.path(), "beta.example.torproject.org", "B\n"),
        ];

        let out = render(&pairs).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "allowed_hosts=alpha.example.torproject.org A");
        assert_eq!(lines[1], "allowed_hosts=beta.example.torproject.org B");
        assert_eq!(lines[2], "Host tor-alpha");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Host tor-beta");
        assert_eq!(out.matches("allowed_hosts=").count(), 2);
        assert!(out.ends_with("\n\n"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]).unwrap(), "");
    }

    #[test]
    fn test_missing_public_key_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let pair = pair_in(temp_dir.path(), "alpha.example.torproject.org", "A\n");
        std::fs::remove_file(&pair.public_key).unwrap();

        let err = render(&[pair]).unwrap_err();
        assert!(matches!(err, RunError::ReadPublicKey { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
