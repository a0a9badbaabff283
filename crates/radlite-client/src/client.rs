//! RADIUS client front-end
//!
//! [`RadiusClient`] owns one UDP socket and multiplexes any number of
//! outstanding requests over it. `send` never blocks on the network beyond
//! the initial datagram: it returns a [`PendingResponse`] future resolved
//! by the receive loop, a retry timer, or cancellation.

use crate::blacklist::Blacklist;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::pending::{PendingEntry, PendingTable, RequestKey, RetransmitDecision};
use radlite_proto::attributes::{standard, Value};
use radlite_proto::auth::{generate_request_authenticator, hide_user_password};
use radlite_proto::message_auth::{find_message_authenticator, verify_message_authenticator};
use radlite_proto::{Code, Dictionary, Packet};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::net::UdpSocket;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A remote RADIUS peer and the secret shared with it.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub address: SocketAddr,
    secret: Vec<u8>,
}

impl Endpoint {
    pub fn new(address: SocketAddr, secret: impl Into<Vec<u8>>) -> Self {
        Endpoint {
            address,
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

struct ClientInner {
    socket: UdpSocket,
    dictionary: Arc<Dictionary>,
    config: ClientConfig,
    pending: PendingTable,
    blacklist: Blacklist,
}

impl ClientInner {
    /// Resolve a request and feed the circuit breaker. Only the caller
    /// that wins the table removal records an outcome, so a response
    /// racing a timeout is counted once.
    fn finish(&self, key: RequestKey, outcome: Result<Packet, ClientError>) {
        let success = outcome.is_ok();
        let remote_failure = matches!(
            &outcome,
            Err(ClientError::Timeout(_))
                | Err(ClientError::BadAuthenticator(_))
                | Err(ClientError::Io(_))
        );

        if self.pending.complete(key, outcome) {
            if success {
                self.blacklist.record_success(key.address);
            } else if remote_failure {
                self.blacklist.record_failure(key.address);
            }
        }
    }

    fn handle_datagram(&self, data: &[u8], source: SocketAddr) {
        let packet = match Packet::decode(data, &self.dictionary) {
            Ok(packet) => packet,
            Err(error) => {
                debug!(%source, %error, "dropping undecodable datagram");
                return;
            }
        };

        if !packet.code.is_response() {
            debug!(%source, code = ?packet.code, "dropping non-response packet");
            return;
        }

        let key = RequestKey {
            address: source,
            identifier: packet.identifier,
        };
        let Some((request_authenticator, secret)) = self.pending.verification_material(&key)
        else {
            debug!(%source, identifier = packet.identifier, "dropping unmatched response");
            return;
        };

        if !packet.verify_response(&secret, &request_authenticator) {
            warn!(%source, identifier = packet.identifier, "response authenticator mismatch");
            self.finish(key, Err(ClientError::BadAuthenticator(source)));
            return;
        }

        if find_message_authenticator(data).is_some()
            && !verify_message_authenticator(data, &secret, Some(&request_authenticator))
        {
            warn!(%source, identifier = packet.identifier, "message authenticator mismatch");
            self.finish(key, Err(ClientError::BadAuthenticator(source)));
            return;
        }

        debug!(%source, identifier = packet.identifier, code = ?packet.code, "response matched");
        self.finish(key, Ok(packet));
    }
}

/// Asynchronous RADIUS client.
pub struct RadiusClient {
    inner: Arc<ClientInner>,
    receiver: JoinHandle<()>,
}

impl RadiusClient {
    /// Bind to an OS-assigned local port.
    pub async fn bind(
        config: ClientConfig,
        dictionary: Arc<Dictionary>,
    ) -> Result<Self, ClientError> {
        Self::bind_to(SocketAddr::from(([0, 0, 0, 0], 0)), config, dictionary).await
    }

    /// Bind to a specific local address.
    pub async fn bind_to(
        local: SocketAddr,
        config: ClientConfig,
        dictionary: Arc<Dictionary>,
    ) -> Result<Self, ClientError> {
        let socket = UdpSocket::bind(local).await?;
        let blacklist = Blacklist::new(config.blacklist_ttl(), config.fail_count_threshold);
        let inner = Arc::new(ClientInner {
            socket,
            dictionary,
            config,
            pending: PendingTable::new(),
            blacklist,
        });
        let receiver = tokio::spawn(recv_loop(Arc::clone(&inner)));
        Ok(RadiusClient { inner, receiver })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ClientError> {
        self.inner.socket.local_addr().map_err(ClientError::from)
    }

    /// Send a request to an endpoint.
    ///
    /// Allocates an identifier, finalises the packet (fresh Request
    /// Authenticator and User-Password hiding for Access-Requests,
    /// Message-Authenticator fill-in when the attribute is present),
    /// transmits, and arms the retry timer. The returned future resolves
    /// with the verified response or the terminal error; dropping it
    /// cancels the request.
    pub async fn send(
        &self,
        mut request: Packet,
        endpoint: &Endpoint,
    ) -> Result<PendingResponse, ClientError> {
        self.inner.blacklist.check(endpoint.address)?;

        let identifier = self.inner.pending.acquire_identifier(endpoint.address)?;
        request.identifier = identifier;
        let key = RequestKey {
            address: endpoint.address,
            identifier,
        };

        match self.transmit_new(request, endpoint, key).await {
            Ok(response) => Ok(response),
            Err(error) => {
                if !self.inner.pending.cancel(key) {
                    // failed before the entry was inserted
                    self.inner.pending.release_identifier(key.address, key.identifier);
                }
                if matches!(error, ClientError::Io(_)) {
                    self.inner.blacklist.record_failure(key.address);
                }
                Err(error)
            }
        }
    }

    async fn transmit_new(
        &self,
        mut request: Packet,
        endpoint: &Endpoint,
        key: RequestKey,
    ) -> Result<PendingResponse, ClientError> {
        // requests that carry a random authenticator get a fresh one unless
        // the caller already set it
        if matches!(
            request.code,
            Code::AccessRequest | Code::StatusServer | Code::StatusClient
        ) && request.authenticator == [0u8; 16]
        {
            request.authenticator = generate_request_authenticator();
        }

        if request.code == Code::AccessRequest {
            let authenticator = request.authenticator;
            for attribute in &mut request.attributes {
                if attribute.type_code == standard::USER_PASSWORD {
                    // typed string values are plaintext; octets pass through
                    // untouched, assumed already hidden by the caller
                    if let Value::String(password) = &attribute.value {
                        let hidden = hide_user_password(
                            password.as_bytes(),
                            endpoint.secret(),
                            &authenticator,
                        )?;
                        attribute.value = Value::Octets(hidden);
                    }
                }
            }
        }

        let wire = request.encode(endpoint.secret(), None)?;
        // for Accounting-Request the authenticator was computed during
        // encoding; take whatever is on the wire as the correlation value
        let mut request_authenticator = [0u8; 16];
        request_authenticator.copy_from_slice(&wire[4..20]);

        let (completion, receiver) = oneshot::channel();
        self.inner.pending.insert(
            key,
            PendingEntry {
                wire: wire.clone(),
                request_authenticator,
                secret: endpoint.secret().to_vec(),
                attempts_left: self.inner.config.retries.max(1) - 1,
                completion,
                retry: None,
            },
        );

        self.inner.socket.send_to(&wire, endpoint.address).await?;
        debug!(
            endpoint = %endpoint.address,
            identifier = key.identifier,
            bytes = wire.len(),
            "request transmitted"
        );

        let handle = tokio::spawn(retry_loop(Arc::clone(&self.inner), key));
        self.inner.pending.attach_retry(&key, handle);

        Ok(PendingResponse {
            key,
            inner: Arc::clone(&self.inner),
            receiver,
            done: false,
        })
    }
}

impl Drop for RadiusClient {
    fn drop(&mut self) {
        self.receiver.abort();
    }
}

async fn recv_loop(inner: Arc<ClientInner>) {
    let mut buf = [0u8; Packet::MAX_PACKET_SIZE];
    loop {
        match inner.socket.recv_from(&mut buf).await {
            Ok((len, source)) => inner.handle_datagram(&buf[..len], source),
            Err(error) => warn!(%error, "client socket receive failed"),
        }
    }
}

async fn retry_loop(inner: Arc<ClientInner>, key: RequestKey) {
    let retries = inner.config.retries.max(1);
    for attempt in 0..retries {
        tokio::time::sleep(inner.config.interval_for(attempt)).await;

        match inner.pending.take_retransmit(&key) {
            RetransmitDecision::Resolved => return,
            RetransmitDecision::Exhausted => {
                debug!(endpoint = %key.address, identifier = key.identifier, "request timed out");
                inner.finish(key, Err(ClientError::Timeout(retries)));
                return;
            }
            RetransmitDecision::Send(wire) => {
                debug!(
                    endpoint = %key.address,
                    identifier = key.identifier,
                    attempt = attempt + 2,
                    "retransmitting"
                );
                if let Err(error) = inner.socket.send_to(&wire, key.address).await {
                    warn!(endpoint = %key.address, %error, "retransmission failed");
                    inner.finish(key, Err(ClientError::Io(error)));
                    return;
                }
            }
        }
    }
    inner.finish(key, Err(ClientError::Timeout(retries)));
}

/// Completion future for an in-flight request.
///
/// Resolves with the verified response packet or a terminal error.
/// Dropping it unresolved cancels the request: the identifier is released,
/// the retry timer stopped, and a late response is dropped silently.
pub struct PendingResponse {
    key: RequestKey,
    inner: Arc<ClientInner>,
    receiver: oneshot::Receiver<Result<Packet, ClientError>>,
    done: bool,
}

impl PendingResponse {
    /// Identifier assigned to the request.
    pub fn identifier(&self) -> u8 {
        self.key.identifier
    }

    /// Abandon the request.
    pub fn cancel(mut self) {
        self.done = true;
        if self.inner.pending.cancel(self.key) {
            debug!(
                endpoint = %self.key.address,
                identifier = self.key.identifier,
                "request cancelled"
            );
        }
    }
}

impl Future for PendingResponse {
    type Output = Result<Packet, ClientError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => {
                this.done = true;
                Poll::Ready(outcome)
            }
            Poll::Ready(Err(_)) => {
                this.done = true;
                Poll::Ready(Err(ClientError::Cancelled))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for PendingResponse {
    fn drop(&mut self) {
        if !self.done {
            self.inner.pending.cancel(self.key);
        }
    }
}
