// ABOUTME: Host source: fetches a machine list page and extracts hostnames
// ABOUTME: Merges scraped hosts with hosts given on the command line

use crate::config::Config;
use crate::error::{FetchError, Result, RunError};
use async_trait::async_trait;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

/// Fetches the body of a page listing hostnames.
#[async_trait]
pub trait HostFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

/// HTTP(S) fetcher backed by reqwest.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> std::result::Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hostkeys/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxy settings, TLS roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HostFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Connect {
                url: url.to_string(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            source: e,
        })
    }
}

/// Compile the extraction pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| RunError::Pattern {
        pattern: pattern.to_string(),
        source: e,
    })
}

/// Every distinct hostname `pattern` finds in `body`, sorted.
///
/// If the pattern has a capture group, group 1 is the hostname, otherwise
/// the whole match is.
pub fn extract_hosts(body: &str, pattern: &Regex) -> Vec<String> {
    let hosts: BTreeSet<&str> = pattern
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
        .map(|m| m.as_str())
        .filter(|host| !host.is_empty())
        .collect();

    hosts.into_iter().map(str::to_string).collect()
}

/// Split a `--hosts` value on commas, dropping blanks.
pub fn split_hosts(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect()
}

/// Work out which hosts to generate keys for: fetched hosts first, then
/// the ones given on the command line. Each host appears once.
///
/// # Errors
/// A failed fetch or an invalid pattern ends the run.
pub async fn resolve_hosts(config: &Config, fetcher: &dyn HostFetcher) -> Result<Vec<String>> {
    let mut hosts = Vec::new();

    if let Some(url) = &config.url {
        let pattern = compile_pattern(&config.pattern)?;
        debug!(url = %url, pattern = %config.pattern, "Fetching host list");
        let body = fetcher.fetch(url).await?;
        hosts = extract_hosts(&body, &pattern);
        info!(url = %url, count = hosts.len(), "Fetched host list");
    }

    let mut seen: HashSet<String> = hosts.iter().cloned().collect();
    for host in &config.hosts {
        if seen.insert(host.clone()) {
            hosts.push(host.clone());
        } else {
            debug!(host = %host, "Ignoring duplicate host");
        }
    }
    Ok(hosts)
}
