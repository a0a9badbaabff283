use radlite_proto::PacketError;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("packet error: {0}")]
    Packet(#[from] PacketError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no free identifier for {0}")]
    NoFreeIdentifier(SocketAddr),
    #[error("request timed out after {0} attempts")]
    Timeout(u32),
    #[error("endpoint blacklisted: {0}")]
    EndpointBlacklisted(SocketAddr),
    #[error("bad response authenticator from {0}")]
    BadAuthenticator(SocketAddr),
    #[error("request cancelled")]
    Cancelled,
}
