//! RADIUS Protocol Implementation
//!
//! This crate implements the RADIUS wire protocol as defined in RFC 2865,
//! 2866, 3162, and 3579:
//!
//! - Packet encoding and decoding with preserved attribute order
//! - A typed attribute dictionary with vendor-specific sub-attributes and
//!   integer enumerations
//! - Request/Response/Accounting authenticator calculation and verification
//! - User-Password hiding and Message-Authenticator (HMAC-MD5) support
//!
//! # Example
//!
//! ```rust
//! use radlite_proto::attributes::standard;
//! use radlite_proto::auth::{generate_request_authenticator, hide_user_password};
//! use radlite_proto::{Attribute, Code, Dictionary, Packet};
//!
//! let dictionary = Dictionary::standard();
//! let secret = b"sharedsecret";
//!
//! // Create an Access-Request packet
//! let authenticator = generate_request_authenticator();
//! let mut request = Packet::new(Code::AccessRequest, 1, authenticator);
//! request.add_attribute(Attribute::string(standard::USER_NAME, "alice"));
//!
//! // Hide the password against the request authenticator
//! let hidden = hide_user_password(b"password", secret, &authenticator).unwrap();
//! request.add_attribute(Attribute::octets(standard::USER_PASSWORD, hidden));
//!
//! // Encode to bytes and back
//! let bytes = request.encode(secret, None).unwrap();
//! let decoded = Packet::decode(&bytes, &dictionary).unwrap();
//! assert_eq!(decoded, request);
//! ```

pub mod attributes;
pub mod auth;
pub mod bytes;
pub mod dictionary;
pub mod message_auth;
pub mod packet;

pub use attributes::{Attribute, Value};
pub use auth::{
    calculate_accounting_request_authenticator, calculate_response_authenticator,
    generate_request_authenticator, hide_user_password, recover_user_password,
    verify_accounting_request_authenticator, verify_response_authenticator,
};
pub use dictionary::{
    AttributeDescriptor, DataType, Dictionary, DictionaryBuilder, STANDARD_VENDOR,
};
pub use message_auth::{
    calculate_message_authenticator, find_message_authenticator, verify_message_authenticator,
};
pub use packet::{Code, Packet, PacketError};
