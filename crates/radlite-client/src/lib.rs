//! Asynchronous RADIUS client
//!
//! Built on top of the `radlite-proto` codec, this crate provides the
//! request lifecycle of a RADIUS client:
//!
//! - Per-endpoint 8-bit identifier leasing
//! - Response correlation on `(endpoint, identifier)` with authenticator
//!   verification
//! - Byte-identical retransmission with a configurable budget
//! - A per-endpoint failure blacklist (circuit breaker)
//!
//! A single [`RadiusClient`] multiplexes any number of concurrent requests
//! over one UDP socket and may be shared across tasks.
//!
//! # Example
//!
//! ```rust,no_run
//! use radlite_client::{ClientConfig, Endpoint, RadiusClient};
//! use radlite_proto::attributes::standard;
//! use radlite_proto::{Attribute, Code, Dictionary, Packet};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dictionary = Arc::new(Dictionary::standard());
//!     let client = RadiusClient::bind(ClientConfig::default(), dictionary).await?;
//!
//!     let endpoint = Endpoint::new("127.0.0.1:1812".parse()?, b"sharedsecret".to_vec());
//!
//!     let mut request = Packet::new(Code::AccessRequest, 0, [0u8; 16]);
//!     request.add_attribute(Attribute::string(standard::USER_NAME, "alice"));
//!     request.add_attribute(Attribute::string(standard::USER_PASSWORD, "password"));
//!
//!     let response = client.send(request, &endpoint).await?.await?;
//!     println!("server answered with {:?}", response.code);
//!     Ok(())
//! }
//! ```

mod blacklist;
pub mod client;
pub mod config;
pub mod error;
mod identifier;
mod pending;

pub use client::{Endpoint, PendingResponse, RadiusClient};
pub use config::{Backoff, ClientConfig};
pub use error::ClientError;
