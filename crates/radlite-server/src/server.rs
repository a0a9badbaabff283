use crate::config::{ClientEntry, SecretStore};
use radlite_proto::attributes::standard;
use radlite_proto::auth::{recover_user_password, verify_accounting_request_authenticator};
use radlite_proto::message_auth::{find_message_authenticator, verify_message_authenticator};
use radlite_proto::{Attribute, Code, Dictionary, Packet, PacketError};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

const ZERO_AUTHENTICATOR: [u8; 16] = [0u8; 16];

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("packet error: {0}")]
    Packet(#[from] PacketError),
    #[error("no shared secret for {0}")]
    UnknownSecret(IpAddr),
}

/// Request handler trait
///
/// Implement this to provide the server's policy. The handler receives a
/// decoded, authenticator-verified request and returns the response packet,
/// or `None` to stay silent. The server copies the request identifier into
/// the response and computes its Response Authenticator; the handler only
/// chooses the code and attributes.
pub trait RequestHandler: Send + Sync {
    fn handle_request(
        &self,
        request: &Packet,
        source: SocketAddr,
        secret: &[u8],
    ) -> Option<Packet>;
}

/// In-memory PAP handler, mainly for tests and examples.
///
/// Answers Access-Requests by recovering the hidden User-Password and
/// checking it against a user table, acknowledges Accounting-Requests, and
/// answers Status-Server probes with Access-Accept.
pub struct PapAuthHandler {
    users: HashMap<String, String>,
}

impl PapAuthHandler {
    pub fn new() -> Self {
        PapAuthHandler {
            users: HashMap::new(),
        }
    }

    pub fn add_user(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.users.insert(username.into(), password.into());
    }

    fn check(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .map(|stored| stored == password)
            .unwrap_or(false)
    }

    fn verify_access_request(&self, request: &Packet, secret: &[u8]) -> bool {
        let Some(username) = request
            .find_attribute(standard::USER_NAME)
            .and_then(|attr| attr.value.as_str())
        else {
            return false;
        };
        let Some(hidden) = request
            .find_attribute(standard::USER_PASSWORD)
            .and_then(|attr| attr.value.as_octets())
        else {
            return false;
        };

        let recovered = match recover_user_password(hidden, secret, &request.authenticator) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        match String::from_utf8(recovered) {
            Ok(password) => self.check(username, &password),
            Err(_) => false,
        }
    }
}

impl Default for PapAuthHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestHandler for PapAuthHandler {
    fn handle_request(
        &self,
        request: &Packet,
        source: SocketAddr,
        secret: &[u8],
    ) -> Option<Packet> {
        match request.code {
            Code::AccessRequest => {
                let username = request
                    .find_attribute(standard::USER_NAME)
                    .and_then(|attr| attr.value.as_str())
                    .unwrap_or("<missing>");

                let granted = self.verify_access_request(request, secret);
                if granted {
                    info!(username, client = %source, "authentication successful");
                } else {
                    warn!(username, client = %source, "authentication failed");
                }

                let code = if granted {
                    Code::AccessAccept
                } else {
                    Code::AccessReject
                };
                let mut response = Packet::new(code, request.identifier, ZERO_AUTHENTICATOR);
                if !granted {
                    response.add_attribute(Attribute::string(
                        standard::REPLY_MESSAGE,
                        "Authentication failed",
                    ));
                }
                copy_proxy_state(request, &mut response);
                Some(response)
            }
            Code::AccountingRequest => {
                let mut response = Packet::new(
                    Code::AccountingResponse,
                    request.identifier,
                    ZERO_AUTHENTICATOR,
                );
                copy_proxy_state(request, &mut response);
                Some(response)
            }
            Code::StatusServer => Some(Packet::new(
                Code::AccessAccept,
                request.identifier,
                ZERO_AUTHENTICATOR,
            )),
            _ => None,
        }
    }
}

/// Proxy-State attributes are echoed back unmodified (RFC 2865 Section 5.33).
fn copy_proxy_state(request: &Packet, response: &mut Packet) {
    for attribute in request.find_all_attributes(standard::PROXY_STATE) {
        response.add_attribute(attribute.clone());
    }
}

/// RADIUS server configuration
pub struct ServerConfig {
    /// Bind address for the server.
    pub bind_addr: SocketAddr,
    /// Authorized clients and their secrets.
    pub clients: Vec<ClientEntry>,
    /// Attribute dictionary used for decoding.
    pub dictionary: Arc<Dictionary>,
    /// Request handler.
    pub handler: Arc<dyn RequestHandler>,
}

/// RADIUS server
pub struct RadiusServer {
    secrets: SecretStore,
    dictionary: Arc<Dictionary>,
    handler: Arc<dyn RequestHandler>,
    socket: Arc<UdpSocket>,
}

impl RadiusServer {
    /// Bind the server socket.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let socket = UdpSocket::bind(config.bind_addr).await?;
        info!("RADIUS server listening on {}", config.bind_addr);

        Ok(RadiusServer {
            secrets: SecretStore::new(config.clients),
            dictionary: config.dictionary,
            handler: config.handler,
            socket: Arc::new(socket),
        })
    }

    /// The bound local address; useful with an OS-assigned port.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.socket.local_addr().map_err(ServerError::from)
    }

    /// Receive and answer requests until the socket fails.
    pub async fn run(&self) -> Result<(), ServerError> {
        let mut buf = vec![0u8; Packet::MAX_PACKET_SIZE];

        loop {
            let (len, addr) = self.socket.recv_from(&mut buf).await?;
            if let Some(reply) = self.handle(&buf[..len], addr) {
                if let Err(error) = self.socket.send_to(&reply, addr).await {
                    warn!(client = %addr, %error, "failed to send response");
                }
            }
        }
    }

    /// Process one inbound datagram and produce the encoded response, if any.
    ///
    /// Every rejection path drops the datagram silently, per RFC 2865: an
    /// unknown source, a malformed packet, an unsupported code, or an
    /// authenticator mismatch must not generate an error reply.
    pub fn handle(&self, data: &[u8], source: SocketAddr) -> Option<Vec<u8>> {
        let secret = match self.require_secret(source.ip()) {
            Ok(secret) => secret,
            Err(error) => {
                warn!(client = %source, %error, "dropping datagram");
                return None;
            }
        };

        let request = match Packet::decode(data, &self.dictionary) {
            Ok(packet) => packet,
            Err(error) => {
                debug!(client = %source, %error, "dropping malformed packet");
                return None;
            }
        };

        if !matches!(
            request.code,
            Code::AccessRequest | Code::AccountingRequest | Code::StatusServer
        ) {
            debug!(client = %source, code = ?request.code, "unsupported packet type");
            return None;
        }

        // Access-Request authenticators are random and cannot be checked;
        // Accounting-Request authenticators are a keyed digest and must be.
        if request.code == Code::AccountingRequest
            && !verify_accounting_request_authenticator(&request, secret)
        {
            warn!(
                client = %source,
                identifier = request.identifier,
                "accounting request authenticator mismatch"
            );
            return None;
        }

        if find_message_authenticator(data).is_some() {
            let substituted = match request.code {
                Code::AccountingRequest => Some(&ZERO_AUTHENTICATOR),
                _ => None,
            };
            if !verify_message_authenticator(data, secret, substituted) {
                warn!(
                    client = %source,
                    identifier = request.identifier,
                    "message authenticator mismatch"
                );
                return None;
            }
        }

        debug!(
            client = %source,
            code = ?request.code,
            identifier = request.identifier,
            "received request"
        );

        let mut response = self.handler.handle_request(&request, source, secret)?;
        response.identifier = request.identifier;

        match response.encode(secret, Some(&request.authenticator)) {
            Ok(bytes) => {
                debug!(client = %source, code = ?response.code, "sending response");
                Some(bytes)
            }
            Err(error) => {
                warn!(client = %source, %error, "failed to encode response");
                None
            }
        }
    }

    fn require_secret(&self, source: IpAddr) -> Result<&[u8], ServerError> {
        self.secrets
            .secret_for(source)
            .ok_or(ServerError::UnknownSecret(source))
    }
}
