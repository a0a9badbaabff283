//! Server configuration: authorized clients and their shared secrets

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::net::IpAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One authorized RADIUS client (NAS) and its shared secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientEntry {
    /// Source address the client sends from.
    pub address: IpAddr,
    /// Shared secret for this client.
    pub secret: String,
    /// Optional client name for logging.
    #[serde(default)]
    pub name: Option<String>,
}

/// Immutable secret lookup by source address.
///
/// Built once at startup; lookups need no synchronization.
#[derive(Debug, Default)]
pub struct SecretStore {
    clients: HashMap<IpAddr, ClientEntry>,
}

impl SecretStore {
    pub fn new(entries: Vec<ClientEntry>) -> Self {
        SecretStore {
            clients: entries
                .into_iter()
                .map(|entry| (entry.address, entry))
                .collect(),
        }
    }

    /// Parse a client list from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries: Vec<ClientEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    /// Load a client list from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Shared secret for a source address, if the client is known.
    pub fn secret_for(&self, source: IpAddr) -> Option<&[u8]> {
        self.clients
            .get(&source)
            .map(|entry| entry.secret.as_bytes())
    }

    pub fn client_for(&self, source: IpAddr) -> Option<&ClientEntry> {
        self.clients.get(&source)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
