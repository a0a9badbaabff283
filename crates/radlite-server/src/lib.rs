//! RADIUS server front-end
//!
//! Built on top of the `radlite-proto` codec, this crate classifies
//! inbound datagrams, resolves the shared secret for the source address,
//! verifies request authenticators, and dispatches to a pluggable
//! [`RequestHandler`]. Responses get the request's identifier and a
//! computed Response Authenticator.
//!
//! # Example
//!
//! ```rust,no_run
//! use radlite_server::{ClientEntry, PapAuthHandler, RadiusServer, ServerConfig};
//! use radlite_proto::Dictionary;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut handler = PapAuthHandler::new();
//!     handler.add_user("alice", "password");
//!
//!     let server = RadiusServer::new(ServerConfig {
//!         bind_addr: "0.0.0.0:1812".parse()?,
//!         clients: vec![ClientEntry {
//!             address: "127.0.0.1".parse()?,
//!             secret: "sharedsecret".to_string(),
//!             name: None,
//!         }],
//!         dictionary: Arc::new(Dictionary::standard()),
//!         handler: Arc::new(handler),
//!     })
//!     .await?;
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod server;

pub use config::{ClientEntry, ConfigError, SecretStore};
pub use server::{PapAuthHandler, RadiusServer, RequestHandler, ServerConfig, ServerError};
