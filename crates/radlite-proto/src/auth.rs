//! Authenticator calculation and User-Password hiding (RFC 2865/2866)

use crate::bytes;
use crate::packet::{Packet, PacketError};
use rand::Rng;

/// Longest User-Password RFC 2865 Section 5.2 allows, pre-padding.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Generate a random Request Authenticator (16 bytes) per RFC 2865 Section 3.
pub fn generate_request_authenticator() -> [u8; 16] {
    let mut rng = rand::rng();
    let mut authenticator = [0u8; 16];
    rng.fill(&mut authenticator);
    authenticator
}

/// Calculate a Response Authenticator per RFC 2865 Section 3:
/// `MD5(Code + ID + Length + Request Authenticator + Attributes + Secret)`.
///
/// Used for Access-Accept, Access-Reject, Access-Challenge, and
/// Accounting-Response packets.
pub fn calculate_response_authenticator(
    packet: &Packet,
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> Result<[u8; 16], PacketError> {
    let buf = packet.bytes_with_authenticator(request_authenticator)?;
    Ok(bytes::md5_parts(&[&buf, secret]))
}

/// Verify a Response Authenticator against the originating request's
/// authenticator and the shared secret.
pub fn verify_response_authenticator(
    response: &Packet,
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> bool {
    match calculate_response_authenticator(response, request_authenticator, secret) {
        Ok(expected) => bytes::constant_time_eq(&expected, &response.authenticator),
        Err(_) => false,
    }
}

/// Calculate an Accounting-Request authenticator per RFC 2866 Section 3:
/// the Response Authenticator formula with sixteen zero bytes in place of
/// the Request Authenticator.
pub fn calculate_accounting_request_authenticator(
    packet: &Packet,
    secret: &[u8],
) -> Result<[u8; 16], PacketError> {
    calculate_response_authenticator(packet, &[0u8; 16], secret)
}

/// Verify the authenticator of a received Accounting-Request.
pub fn verify_accounting_request_authenticator(packet: &Packet, secret: &[u8]) -> bool {
    match calculate_accounting_request_authenticator(packet, secret) {
        Ok(expected) => bytes::constant_time_eq(&expected, &packet.authenticator),
        Err(_) => false,
    }
}

/// Hide a User-Password per RFC 2865 Section 5.2.
///
/// The password is zero-padded to a multiple of 16 bytes, then each block
/// is XORed with `MD5(secret + previous_block)` where the chain starts at
/// the Request Authenticator and continues with the previous ciphertext
/// block.
pub fn hide_user_password(
    password: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<Vec<u8>, PacketError> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PacketError::InvalidValue {
            attribute: "User-Password",
            reason: format!(
                "password of {} bytes exceeds the {MAX_PASSWORD_LENGTH}-byte limit",
                password.len()
            ),
        });
    }

    let blocks = password.len().div_ceil(16).max(1);
    let mut hidden = password.to_vec();
    hidden.resize(blocks * 16, 0);

    let mut chain: [u8; 16] = *authenticator;
    for block in hidden.chunks_mut(16) {
        let mask = bytes::md5_parts(&[secret, &chain]);
        bytes::xor_in_place(block, &mask);
        chain.copy_from_slice(block);
    }

    Ok(hidden)
}

/// Recover a hidden User-Password, reversing the chain and stripping the
/// trailing zero padding.
pub fn recover_user_password(
    hidden: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<Vec<u8>, PacketError> {
    if hidden.is_empty() || hidden.len() % 16 != 0 || hidden.len() > MAX_PASSWORD_LENGTH {
        return Err(PacketError::InvalidValue {
            attribute: "User-Password",
            reason: format!("hidden password of {} bytes is not valid", hidden.len()),
        });
    }

    let mut password = hidden.to_vec();
    let mut chain: [u8; 16] = *authenticator;
    for (index, block) in password.chunks_mut(16).enumerate() {
        let mask = bytes::md5_parts(&[secret, &chain]);
        chain.copy_from_slice(&hidden[index * 16..index * 16 + 16]);
        bytes::xor_in_place(block, &mask);
    }

    while password.last() == Some(&0) {
        password.pop();
    }

    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;
    use crate::packet::Code;

    #[test]
    fn test_generate_authenticator_is_random() {
        let first = generate_request_authenticator();
        let second = generate_request_authenticator();
        assert_ne!(first, second);
    }

    #[test]
    fn test_password_hiding_vector() {
        // RFC 2865 Section 5.2 style vector
        let secret = b"xyzzy5461";
        let authenticator: [u8; 16] = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
            0x0f, 0x10,
        ];

        let hidden = hide_user_password(b"arctangent", secret, &authenticator).unwrap();
        assert_eq!(hidden.len(), 16);

        // single block: ciphertext XOR MD5(secret + RA) is the padded plaintext
        let mask = md5::compute([&secret[..], &authenticator[..]].concat()).0;
        let mut plain = hidden.clone();
        for (byte, m) in plain.iter_mut().zip(mask) {
            *byte ^= m;
        }
        assert_eq!(&plain, b"arctangent\0\0\0\0\0\0");

        let recovered = recover_user_password(&hidden, secret, &authenticator).unwrap();
        assert_eq!(recovered, b"arctangent");
    }

    #[test]
    fn test_password_round_trip_multi_block() {
        let secret = b"sharedsecret";
        let authenticator = [7u8; 16];
        let password = b"a password comfortably longer than sixteen bytes";

        let hidden = hide_user_password(password, secret, &authenticator).unwrap();
        assert_eq!(hidden.len(), 64);
        assert_eq!(
            recover_user_password(&hidden, secret, &authenticator).unwrap(),
            password
        );
    }

    #[test]
    fn test_empty_password_pads_to_one_block() {
        let hidden = hide_user_password(b"", b"secret", &[1u8; 16]).unwrap();
        assert_eq!(hidden.len(), 16);
        assert_eq!(
            recover_user_password(&hidden, b"secret", &[1u8; 16]).unwrap(),
            b""
        );
    }

    #[test]
    fn test_password_length_limit() {
        let authenticator = [0u8; 16];
        assert!(hide_user_password(&[b'x'; 128], b"s", &authenticator).is_ok());
        assert!(hide_user_password(&[b'x'; 129], b"s", &authenticator).is_err());
    }

    #[test]
    fn test_recover_rejects_bad_lengths() {
        let authenticator = [0u8; 16];
        assert!(recover_user_password(&[], b"s", &authenticator).is_err());
        assert!(recover_user_password(&[0u8; 15], b"s", &authenticator).is_err());
        assert!(recover_user_password(&[0u8; 144], b"s", &authenticator).is_err());
    }

    #[test]
    fn test_response_authenticator_round_trip() {
        let secret = b"sharedsecret";
        let request_auth = [1u8; 16];
        let mut packet = Packet::new(Code::AccessAccept, 42, [0u8; 16]);
        packet.add_attribute(Attribute::string(18, "ok"));

        packet.authenticator =
            calculate_response_authenticator(&packet, &request_auth, secret).unwrap();

        assert!(verify_response_authenticator(&packet, &request_auth, secret));
        assert!(!verify_response_authenticator(&packet, &[2u8; 16], secret));
        assert!(!verify_response_authenticator(&packet, &request_auth, b"nope"));
    }
}
