//! Message-Authenticator support (RFC 3579 Section 3.2)
//!
//! The Message-Authenticator attribute is an HMAC-MD5 over the entire
//! packet, computed with the attribute's own value slot zeroed. Requests
//! carry their Request Authenticator in the header while the HMAC is
//! computed; for responses the verifier must substitute the original
//! request's authenticator first. Accounting-Requests use sixteen zero
//! bytes, matching the order in which the outer authenticator is filled in.

use crate::attributes::standard;
use crate::bytes::constant_time_eq;
use crate::packet::Packet;
use hmac::{Hmac, Mac};
use md5_digest::Md5;

type HmacMd5 = Hmac<Md5>;

/// HMAC-MD5 over `packet_bytes` with the shared secret as key.
///
/// The caller must have zeroed the Message-Authenticator value slot first.
pub fn calculate_message_authenticator(packet_bytes: &[u8], secret: &[u8]) -> [u8; 16] {
    let mut mac = HmacMd5::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(packet_bytes);
    let digest = mac.finalize().into_bytes();

    let mut output = [0u8; 16];
    output.copy_from_slice(&digest);
    output
}

/// Byte offset of the first Message-Authenticator value slot in an encoded
/// packet, or `None` if absent or structurally unusable.
pub fn find_message_authenticator(packet_bytes: &[u8]) -> Option<usize> {
    if packet_bytes.len() < Packet::MIN_PACKET_SIZE {
        return None;
    }
    let length = (u16::from_be_bytes([packet_bytes[2], packet_bytes[3]]) as usize)
        .min(packet_bytes.len());

    let mut offset = Packet::MIN_PACKET_SIZE;
    while offset + 2 <= length {
        let type_code = packet_bytes[offset];
        let attr_len = packet_bytes[offset + 1] as usize;
        if attr_len < 2 || offset + attr_len > length {
            return None;
        }
        if type_code == standard::MESSAGE_AUTHENTICATOR && attr_len == 18 {
            return Some(offset + 2);
        }
        offset += attr_len;
    }
    None
}

/// Verify the Message-Authenticator in an encoded packet.
///
/// Pass `request_authenticator` when verifying a response (or an
/// Accounting-Request, where it is sixteen zero bytes); pass `None` for
/// Access-Request and Status-Server, whose header already holds the value
/// the sender used. Returns `false` when the attribute is absent.
pub fn verify_message_authenticator(
    packet_bytes: &[u8],
    secret: &[u8],
    request_authenticator: Option<&[u8; 16]>,
) -> bool {
    let Some(value_at) = find_message_authenticator(packet_bytes) else {
        return false;
    };

    let mut copy = packet_bytes.to_vec();
    if let Some(authenticator) = request_authenticator {
        copy[4..20].copy_from_slice(authenticator);
    }
    copy[value_at..value_at + 16].fill(0);

    let expected = calculate_message_authenticator(&copy, secret);
    constant_time_eq(&packet_bytes[value_at..value_at + 16], &expected)
}
