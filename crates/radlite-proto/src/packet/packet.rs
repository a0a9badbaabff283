use super::Code;
use crate::attributes::{standard, Attribute};
use crate::bytes;
use crate::dictionary::Dictionary;
use crate::message_auth::calculate_message_authenticator;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PacketError {
    #[error("malformed packet: {0}")]
    MalformedPacket(String),
    #[error("malformed attribute: {0}")]
    MalformedAttribute(String),
    #[error("unknown packet type: {0}")]
    UnknownPacketType(u8),
    #[error("invalid {attribute} value: {reason}")]
    InvalidValue {
        attribute: &'static str,
        reason: String,
    },
    #[error("packet too long: {0} bytes")]
    PacketTooLong(usize),
}

/// RADIUS Packet structure as defined in RFC 2865 Section 3
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Code      |  Identifier   |            Length             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// |                         Authenticator                         |
/// |                                                               |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Attributes ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-
/// ```
///
/// Attribute order is preserved end-to-end; it is semantically significant
/// for fragmented EAP-Message sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub code: Code,
    /// Identifier for matching requests and responses.
    pub identifier: u8,
    /// Request or Response Authenticator, depending on the code.
    pub authenticator: [u8; 16],
    pub attributes: Vec<Attribute>,
}

impl Packet {
    /// Minimum RADIUS packet size (1 code + 1 id + 2 length + 16 authenticator).
    pub const MIN_PACKET_SIZE: usize = 20;
    /// Maximum RADIUS packet size per RFC 2865.
    pub const MAX_PACKET_SIZE: usize = 4096;

    pub fn new(code: Code, identifier: u8, authenticator: [u8; 16]) -> Self {
        Packet {
            code,
            identifier,
            authenticator,
            attributes: Vec::new(),
        }
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Find the first attribute with the given type code.
    pub fn find_attribute(&self, type_code: u8) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.type_code == type_code)
    }

    /// Find all attributes with the given type code, in packet order.
    pub fn find_all_attributes(&self, type_code: u8) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.type_code == type_code)
            .collect()
    }

    /// Length of the encoded packet, header included.
    pub fn length(&self) -> usize {
        Self::MIN_PACKET_SIZE
            + self
                .attributes
                .iter()
                .map(Attribute::encoded_length)
                .sum::<usize>()
    }

    /// Encode the packet, computing the authenticator for its kind.
    ///
    /// - Access-Request, Status-Server, Status-Client: the stored (random)
    ///   Request Authenticator is emitted unchanged.
    /// - Accounting-Request: the authenticator is MD5 over the packet with a
    ///   zeroed authenticator field, then the shared secret.
    /// - Responses: the authenticator is MD5 over the packet with the
    ///   original Request Authenticator in place, then the shared secret;
    ///   `request_authenticator` is required.
    ///
    /// A Message-Authenticator attribute, when present, is filled in first:
    /// its value slot is zeroed, the HMAC-MD5 over the whole packet is
    /// computed, and the result replaces the slot before the outer
    /// authenticator is calculated.
    pub fn encode(
        &self,
        secret: &[u8],
        request_authenticator: Option<&[u8; 16]>,
    ) -> Result<Vec<u8>, PacketError> {
        let header_auth: [u8; 16] = match self.code {
            Code::AccessRequest | Code::StatusServer | Code::StatusClient => self.authenticator,
            Code::AccountingRequest => [0u8; 16],
            Code::AccessAccept
            | Code::AccessReject
            | Code::AccessChallenge
            | Code::AccountingResponse => *request_authenticator.ok_or_else(|| {
                PacketError::MalformedPacket(
                    "response encoding requires the request authenticator".to_string(),
                )
            })?,
        };

        let (mut buf, message_auth_at) = self.serialize(&header_auth)?;

        if let Some(at) = message_auth_at {
            buf[at..at + 16].fill(0);
            let mac = calculate_message_authenticator(&buf, secret);
            buf[at..at + 16].copy_from_slice(&mac);
        }

        if matches!(
            self.code,
            Code::AccountingRequest
                | Code::AccessAccept
                | Code::AccessReject
                | Code::AccessChallenge
                | Code::AccountingResponse
        ) {
            let digest = bytes::md5_parts(&[&buf, secret]);
            buf[4..20].copy_from_slice(&digest);
        }

        Ok(buf)
    }

    /// Decode a packet from bytes.
    pub fn decode(data: &[u8], dictionary: &Dictionary) -> Result<Self, PacketError> {
        if data.len() < Self::MIN_PACKET_SIZE {
            return Err(PacketError::MalformedPacket(format!(
                "truncated header: {} bytes",
                data.len()
            )));
        }

        let code = Code::from_u8(data[0]).ok_or(PacketError::UnknownPacketType(data[0]))?;
        let identifier = data[1];
        let length = u16::from_be_bytes([data[2], data[3]]) as usize;

        if length < Self::MIN_PACKET_SIZE || length > Self::MAX_PACKET_SIZE {
            return Err(PacketError::MalformedPacket(format!(
                "length field {length} out of range"
            )));
        }
        if length > data.len() {
            return Err(PacketError::MalformedPacket(format!(
                "length field {length} exceeds datagram of {} bytes",
                data.len()
            )));
        }

        let mut authenticator = [0u8; 16];
        authenticator.copy_from_slice(&data[4..20]);

        let mut attributes = Vec::new();
        let mut rest = &data[Self::MIN_PACKET_SIZE..length];
        while !rest.is_empty() {
            let (attribute, consumed) = Attribute::decode(rest, dictionary)?;
            attributes.push(attribute);
            rest = &rest[consumed..];
        }

        Ok(Packet {
            code,
            identifier,
            authenticator,
            attributes,
        })
    }

    /// Verify this packet's Response Authenticator against the originating
    /// request's authenticator and shared secret. Constant-time compare.
    pub fn verify_response(&self, secret: &[u8], request_authenticator: &[u8; 16]) -> bool {
        crate::auth::verify_response_authenticator(self, request_authenticator, secret)
    }

    /// Serialize header and attributes with `authenticator` in the header
    /// slot and the length field filled in. No authenticator computation.
    pub(crate) fn bytes_with_authenticator(
        &self,
        authenticator: &[u8; 16],
    ) -> Result<Vec<u8>, PacketError> {
        self.serialize(authenticator).map(|(buf, _)| buf)
    }

    /// Returns the serialized packet and the byte offset of the first
    /// Message-Authenticator value slot, if any.
    fn serialize(
        &self,
        authenticator: &[u8; 16],
    ) -> Result<(Vec<u8>, Option<usize>), PacketError> {
        let mut buf = Vec::with_capacity(self.length());
        buf.push(self.code.as_u8());
        buf.push(self.identifier);
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(authenticator);

        let mut message_auth_at = None;
        for attribute in &self.attributes {
            if attribute.type_code == standard::MESSAGE_AUTHENTICATOR {
                if attribute.value.encoded_len() != 16 {
                    return Err(PacketError::InvalidValue {
                        attribute: "Message-Authenticator",
                        reason: format!(
                            "value must be 16 bytes, got {}",
                            attribute.value.encoded_len()
                        ),
                    });
                }
                if message_auth_at.is_none() {
                    message_auth_at = Some(buf.len() + 2);
                }
            }
            attribute.write(&mut buf)?;
        }

        let total = buf.len();
        if total > Self::MAX_PACKET_SIZE {
            return Err(PacketError::PacketTooLong(total));
        }
        buf[2..4].copy_from_slice(&(total as u16).to_be_bytes());

        Ok((buf, message_auth_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Value;
    use crate::auth::{generate_request_authenticator, hide_user_password, recover_user_password};
    use crate::message_auth::verify_message_authenticator;

    const SECRET: &[u8] = b"s3cret";

    #[test]
    fn test_access_request_round_trip_preserves_order() {
        let dict = Dictionary::standard();
        let ra = generate_request_authenticator();
        let mut packet = Packet::new(Code::AccessRequest, 0x2a, ra);
        packet.add_attribute(Attribute::string(standard::USER_NAME, "nemo"));
        let hidden = hide_user_password(b"arctangent", SECRET, &ra).unwrap();
        packet.add_attribute(Attribute::octets(standard::USER_PASSWORD, hidden));
        packet.add_attribute(Attribute::integer(5, 3)); // NAS-Port

        let encoded = packet.encode(SECRET, None).unwrap();
        assert_eq!(encoded.len(), packet.length());
        assert_eq!(
            u16::from_be_bytes([encoded[2], encoded[3]]) as usize,
            encoded.len()
        );

        let decoded = Packet::decode(&encoded, &dict).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(decoded.identifier, 0x2a);
        assert_eq!(
            decoded.find_attribute(standard::USER_NAME).unwrap().value,
            Value::String("nemo".into())
        );

        let hidden = decoded
            .find_attribute(standard::USER_PASSWORD)
            .and_then(|a| a.value.as_octets())
            .unwrap();
        let recovered = recover_user_password(hidden, SECRET, &decoded.authenticator).unwrap();
        assert_eq!(recovered, b"arctangent");
    }

    #[test]
    fn test_accounting_request_authenticator() {
        // code=4, id=5, two attributes totalling 20 bytes, length 0x28
        let mut packet = Packet::new(Code::AccountingRequest, 5, [0u8; 16]);
        packet.add_attribute(Attribute::string(standard::USER_NAME, "nemo"));
        packet.add_attribute(Attribute::octets(standard::CLASS, vec![0xaa; 12]));
        assert_eq!(packet.length(), 40);

        let encoded = packet.encode(SECRET, None).unwrap();

        let mut expected = md5::Context::new();
        expected.consume([4u8, 5, 0x00, 0x28]);
        expected.consume([0u8; 16]);
        expected.consume(&encoded[20..]);
        expected.consume(SECRET);
        assert_eq!(&encoded[4..20], &expected.compute().0);

        let dict = Dictionary::standard();
        let decoded = Packet::decode(&encoded, &dict).unwrap();
        assert!(crate::auth::verify_accounting_request_authenticator(
            &decoded, SECRET
        ));

        // altering one attribute byte invalidates the authenticator
        let mut tampered = decoded.clone();
        tampered.attributes[1] = Attribute::octets(standard::CLASS, vec![0xab; 12]);
        assert!(!crate::auth::verify_accounting_request_authenticator(
            &tampered, SECRET
        ));
    }

    #[test]
    fn test_response_authenticator_round_trip() {
        let dict = Dictionary::standard();
        let request_auth = generate_request_authenticator();

        let mut response = Packet::new(Code::AccessAccept, 7, [0u8; 16]);
        response.add_attribute(Attribute::string(standard::REPLY_MESSAGE, "welcome"));

        let encoded = response.encode(SECRET, Some(&request_auth)).unwrap();
        let decoded = Packet::decode(&encoded, &dict).unwrap();

        assert!(decoded.verify_response(SECRET, &request_auth));
        assert!(!decoded.verify_response(b"wrong", &request_auth));
        assert!(!decoded.verify_response(SECRET, &[9u8; 16]));
    }

    #[test]
    fn test_response_encoding_requires_request_authenticator() {
        let response = Packet::new(Code::AccessReject, 1, [0u8; 16]);
        assert!(matches!(
            response.encode(SECRET, None),
            Err(PacketError::MalformedPacket(_))
        ));
    }

    #[test]
    fn test_message_authenticator_two_phase() {
        let dict = Dictionary::standard();
        let ra = generate_request_authenticator();

        let mut request = Packet::new(Code::AccessRequest, 9, ra);
        request.add_attribute(Attribute::string(standard::USER_NAME, "eve"));
        request.add_attribute(Attribute::octets(
            standard::MESSAGE_AUTHENTICATOR,
            vec![0u8; 16],
        ));

        let encoded = request.encode(SECRET, None).unwrap();
        assert!(verify_message_authenticator(&encoded, SECRET, None));
        assert!(!verify_message_authenticator(&encoded, b"wrong", None));

        let mut tampered = encoded.clone();
        tampered[21] ^= 0x01;
        assert!(!verify_message_authenticator(&tampered, SECRET, None));

        // responses compute the HMAC with the request authenticator in the
        // header, then overwrite it with the Response Authenticator
        let mut reply = Packet::new(Code::AccessChallenge, 9, [0u8; 16]);
        reply.add_attribute(Attribute::octets(standard::STATE, vec![1, 2, 3]));
        reply.add_attribute(Attribute::octets(
            standard::MESSAGE_AUTHENTICATOR,
            vec![0u8; 16],
        ));
        let reply_bytes = reply.encode(SECRET, Some(&ra)).unwrap();
        assert!(verify_message_authenticator(&reply_bytes, SECRET, Some(&ra)));

        let decoded = Packet::decode(&reply_bytes, &dict).unwrap();
        assert!(decoded.verify_response(SECRET, &ra));
    }

    #[test]
    fn test_message_authenticator_wrong_size_rejected() {
        let mut request = Packet::new(Code::AccessRequest, 1, [1u8; 16]);
        request.add_attribute(Attribute::octets(standard::MESSAGE_AUTHENTICATOR, vec![0u8; 4]));
        assert!(matches!(
            request.encode(SECRET, None),
            Err(PacketError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_headers() {
        let dict = Dictionary::standard();

        assert!(Packet::decode(&[0u8; 19], &dict).is_err());

        // unknown code
        let mut data = vec![0u8; 20];
        data[0] = 99;
        data[3] = 20;
        assert!(matches!(
            Packet::decode(&data, &dict),
            Err(PacketError::UnknownPacketType(99))
        ));

        // length field below minimum
        let mut data = vec![0u8; 20];
        data[0] = 1;
        data[3] = 19;
        assert!(Packet::decode(&data, &dict).is_err());

        // length field beyond the datagram
        let mut data = vec![0u8; 20];
        data[0] = 1;
        data[3] = 30;
        assert!(Packet::decode(&data, &dict).is_err());
    }

    #[test]
    fn test_decode_rejects_attribute_overrun() {
        let dict = Dictionary::standard();
        let mut data = vec![0u8; 24];
        data[0] = 1;
        data[3] = 24;
        data[20] = 1; // User-Name
        data[21] = 10; // claims 10 bytes but only 4 remain
        assert!(matches!(
            Packet::decode(&data, &dict),
            Err(PacketError::MalformedAttribute(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_beyond_length_are_ignored() {
        let dict = Dictionary::standard();
        let mut packet = Packet::new(Code::AccessRequest, 3, [7u8; 16]);
        packet.add_attribute(Attribute::string(standard::USER_NAME, "pad"));

        let mut encoded = packet.encode(SECRET, None).unwrap();
        encoded.extend_from_slice(&[0xff; 8]); // UDP padding
        let decoded = Packet::decode(&encoded, &dict).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_packet_too_long() {
        let mut packet = Packet::new(Code::AccessRequest, 1, [0u8; 16]);
        for _ in 0..17 {
            packet.add_attribute(Attribute::octets(standard::CLASS, vec![0u8; 251]));
        }
        assert!(matches!(
            packet.encode(SECRET, None),
            Err(PacketError::PacketTooLong(_))
        ));
    }

    #[test]
    fn test_status_server_keeps_random_authenticator() {
        let ra = generate_request_authenticator();
        let packet = Packet::new(Code::StatusServer, 11, ra);
        let encoded = packet.encode(SECRET, None).unwrap();
        assert_eq!(&encoded[4..20], &ra);
    }
}
