//! Endpoint blacklist (circuit breaker)
//!
//! Tracks consecutive failures per endpoint and suppresses sends for a
//! fixed window once a threshold is reached. Only transport and response
//! failures feed the counter; local errors say nothing about the remote
//! peer's health.

use crate::error::ClientError;
use dashmap::DashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub(crate) struct Blacklist {
    ttl: Duration,
    threshold: u32,
    fail_counts: DashMap<SocketAddr, u32>,
    blacklist: DashMap<SocketAddr, Instant>,
}

impl Blacklist {
    pub fn new(ttl: Duration, threshold: u32) -> Self {
        Blacklist {
            ttl,
            threshold,
            fail_counts: DashMap::new(),
            blacklist: DashMap::new(),
        }
    }

    /// Gate a send: fails fast while the endpoint is suppressed, clears
    /// the state once the window has expired.
    pub fn check(&self, address: SocketAddr) -> Result<(), ClientError> {
        let Some(until) = self.blacklist.get(&address).map(|entry| *entry) else {
            return Ok(());
        };

        if Instant::now() < until {
            debug!(endpoint = %address, "endpoint blacklisted, failing fast");
            return Err(ClientError::EndpointBlacklisted(address));
        }

        self.reset(address);
        info!(endpoint = %address, "endpoint removed from blacklist (expired)");
        Ok(())
    }

    pub fn record_success(&self, address: SocketAddr) {
        self.reset(address);
    }

    pub fn record_failure(&self, address: SocketAddr) {
        let count = {
            let mut entry = self.fail_counts.entry(address).or_insert(0);
            *entry += 1;
            *entry
        };

        if count >= self.threshold {
            // put-if-absent: a delayed failure must not extend an active window
            let mut added = false;
            self.blacklist.entry(address).or_insert_with(|| {
                added = true;
                Instant::now() + self.ttl
            });
            if added {
                debug!(endpoint = %address, failures = count, "endpoint added to blacklist");
            }
        }
    }

    fn reset(&self, address: SocketAddr) {
        self.blacklist.remove(&address);
        self.fail_counts.remove(&address);
    }
}
