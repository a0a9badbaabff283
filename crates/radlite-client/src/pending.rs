//! Pending-request table
//!
//! Correlates inbound responses with in-flight requests and drives the
//! retransmission budget. Entry removal is the single point of resolution:
//! whichever path removes the entry (response, timeout, cancellation) owns
//! the completion, so a request resolves exactly once even when a response
//! races a timer.

use crate::error::ClientError;
use crate::identifier::IdentifierAllocator;
use dashmap::DashMap;
use radlite_proto::Packet;
use std::net::SocketAddr;
use std::sync::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Responses are matched on source endpoint and packet identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RequestKey {
    pub address: SocketAddr,
    pub identifier: u8,
}

pub(crate) struct PendingEntry {
    /// Encoded request; retransmissions resend exactly these bytes.
    pub wire: Vec<u8>,
    /// Authenticator of the outgoing request, for response verification.
    pub request_authenticator: [u8; 16],
    pub secret: Vec<u8>,
    /// Transmissions still allowed beyond those already sent.
    pub attempts_left: u32,
    pub completion: oneshot::Sender<Result<Packet, ClientError>>,
    pub retry: Option<JoinHandle<()>>,
}

pub(crate) enum RetransmitDecision {
    /// Resend these bytes unchanged.
    Send(Vec<u8>),
    /// The retry budget is spent; resolve with a timeout.
    Exhausted,
    /// The request resolved in the meantime; stop.
    Resolved,
}

pub(crate) struct PendingTable {
    entries: DashMap<RequestKey, PendingEntry>,
    allocators: DashMap<SocketAddr, Mutex<IdentifierAllocator>>,
}

impl PendingTable {
    pub fn new() -> Self {
        PendingTable {
            entries: DashMap::new(),
            allocators: DashMap::new(),
        }
    }

    /// Lease an identifier for the endpoint.
    pub fn acquire_identifier(&self, address: SocketAddr) -> Result<u8, ClientError> {
        let allocator = self
            .allocators
            .entry(address)
            .or_insert_with(|| Mutex::new(IdentifierAllocator::new()));
        let leased = allocator.lock().unwrap().acquire();
        leased.ok_or(ClientError::NoFreeIdentifier(address))
    }

    pub fn release_identifier(&self, address: SocketAddr, identifier: u8) {
        if let Some(allocator) = self.allocators.get(&address) {
            allocator.lock().unwrap().release(identifier);
        }
    }

    pub fn insert(&self, key: RequestKey, entry: PendingEntry) {
        self.entries.insert(key, entry);
    }

    /// Attach the retry task handle after spawning it. If the request
    /// already resolved, stop the task instead.
    pub fn attach_retry(&self, key: &RequestKey, handle: JoinHandle<()>) {
        match self.entries.get_mut(key) {
            Some(mut entry) => entry.retry = Some(handle),
            None => handle.abort(),
        }
    }

    /// Claim the next retransmission, decrementing the budget.
    pub fn take_retransmit(&self, key: &RequestKey) -> RetransmitDecision {
        match self.entries.get_mut(key) {
            None => RetransmitDecision::Resolved,
            Some(mut entry) => {
                if entry.attempts_left == 0 {
                    RetransmitDecision::Exhausted
                } else {
                    entry.attempts_left -= 1;
                    RetransmitDecision::Send(entry.wire.clone())
                }
            }
        }
    }

    /// Verification material for an inbound response, if one is expected.
    pub fn verification_material(&self, key: &RequestKey) -> Option<([u8; 16], Vec<u8>)> {
        self.entries
            .get(key)
            .map(|entry| (entry.request_authenticator, entry.secret.clone()))
    }

    /// Resolve a pending request. Returns `false` when it was already
    /// resolved or cancelled; the outcome is then dropped.
    pub fn complete(&self, key: RequestKey, outcome: Result<Packet, ClientError>) -> bool {
        let Some((_, entry)) = self.entries.remove(&key) else {
            return false;
        };
        if let Some(handle) = entry.retry {
            handle.abort();
        }
        self.release_identifier(key.address, key.identifier);
        let _ = entry.completion.send(outcome);
        true
    }

    /// Drop a pending request without resolving the completion.
    pub fn cancel(&self, key: RequestKey) -> bool {
        let Some((_, entry)) = self.entries.remove(&key) else {
            return false;
        };
        if let Some(handle) = entry.retry {
            handle.abort();
        }
        self.release_identifier(key.address, key.identifier);
        true
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
