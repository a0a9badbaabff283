use crate::attributes::standard;
use crate::dictionary::{DataType, Dictionary, STANDARD_VENDOR};
use crate::packet::PacketError;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Typed attribute value.
///
/// One variant per dictionary data type; the encode/decode dispatch happens
/// here rather than through per-type constructor callbacks. `Date` shares
/// the `Integer` wire form and prints as seconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Octets(Vec<u8>),
    Integer(u32),
    Date(u32),
    IpV4(Ipv4Addr),
    IpV6(Ipv6Addr),
    /// RFC 3162 prefix: the address part may be truncated on the wire.
    IpV6Prefix { prefix_len: u8, address: Vec<u8> },
    /// RFC 2865 Section 5.26 container; sub-attributes use the vendor's
    /// own number space.
    VendorSpecific {
        vendor_id: u32,
        sub_attributes: Vec<Attribute>,
    },
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::String(_) => DataType::String,
            Value::Octets(_) => DataType::Octets,
            Value::Integer(_) => DataType::Integer,
            Value::Date(_) => DataType::Date,
            Value::IpV4(_) => DataType::IpV4,
            Value::IpV6(_) => DataType::IpV6,
            Value::IpV6Prefix { .. } => DataType::IpV6Prefix,
            Value::VendorSpecific { .. } => DataType::VendorSpecific,
        }
    }

    /// Wire length of the value part, excluding the type/length header.
    pub fn encoded_len(&self) -> usize {
        match self {
            Value::String(s) => s.len(),
            Value::Octets(o) => o.len(),
            Value::Integer(_) | Value::Date(_) => 4,
            Value::IpV4(_) => 4,
            Value::IpV6(_) => 16,
            Value::IpV6Prefix { address, .. } => 2 + address.len(),
            Value::VendorSpecific { sub_attributes, .. } => {
                4 + sub_attributes
                    .iter()
                    .map(Attribute::encoded_length)
                    .sum::<usize>()
            }
        }
    }

    fn write(&self, out: &mut Vec<u8>) -> Result<(), PacketError> {
        match self {
            Value::String(s) => out.extend_from_slice(s.as_bytes()),
            Value::Octets(o) => out.extend_from_slice(o),
            Value::Integer(n) | Value::Date(n) => out.extend_from_slice(&n.to_be_bytes()),
            Value::IpV4(addr) => out.extend_from_slice(&addr.octets()),
            Value::IpV6(addr) => out.extend_from_slice(&addr.octets()),
            Value::IpV6Prefix {
                prefix_len,
                address,
            } => {
                out.push(0); // reserved
                out.push(*prefix_len);
                out.extend_from_slice(address);
            }
            Value::VendorSpecific {
                vendor_id,
                sub_attributes,
            } => {
                out.extend_from_slice(&vendor_id.to_be_bytes());
                for sub in sub_attributes {
                    sub.write(out)?;
                }
            }
        }
        Ok(())
    }

    /// Borrow the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload of `Integer` and `Date` values.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Integer(n) | Value::Date(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the raw payload, if this is an octets value.
    pub fn as_octets(&self) -> Option<&[u8]> {
        match self {
            Value::Octets(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Octets(o) => {
                f.write_str("0x")?;
                for byte in o {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Value::Integer(n) | Value::Date(n) => write!(f, "{n}"),
            Value::IpV4(addr) => write!(f, "{addr}"),
            Value::IpV6(addr) => write!(f, "{addr}"),
            Value::IpV6Prefix {
                prefix_len,
                address,
            } => {
                let mut full = [0u8; 16];
                let n = address.len().min(16);
                full[..n].copy_from_slice(&address[..n]);
                write!(f, "{}/{}", Ipv6Addr::from(full), prefix_len)
            }
            Value::VendorSpecific {
                vendor_id,
                sub_attributes,
            } => write!(
                f,
                "vendor {} ({} sub-attributes)",
                vendor_id,
                sub_attributes.len()
            ),
        }
    }
}

/// RADIUS Attribute as defined in RFC 2865 Section 5
///
/// ```text
///  0                   1                   2
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Type      |    Length     |  Value ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// For Vendor-Specific attributes the value embeds a 4-byte vendor id
/// followed by sub-attributes in the same type/length/value layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub type_code: u8,
    pub value: Value,
}

impl Attribute {
    /// Minimum wire length (type + length fields).
    pub const MIN_LENGTH: usize = 2;
    /// Maximum wire length, including the two header bytes.
    pub const MAX_LENGTH: usize = 255;

    pub fn new(type_code: u8, value: Value) -> Self {
        Attribute { type_code, value }
    }

    /// Create a string attribute.
    pub fn string(type_code: u8, value: impl Into<String>) -> Self {
        Attribute::new(type_code, Value::String(value.into()))
    }

    /// Create an integer attribute (32-bit big-endian).
    pub fn integer(type_code: u8, value: u32) -> Self {
        Attribute::new(type_code, Value::Integer(value))
    }

    /// Create a raw octets attribute.
    pub fn octets(type_code: u8, value: impl Into<Vec<u8>>) -> Self {
        Attribute::new(type_code, Value::Octets(value.into()))
    }

    /// Create an IPv4 address attribute.
    pub fn ipv4(type_code: u8, value: Ipv4Addr) -> Self {
        Attribute::new(type_code, Value::IpV4(value))
    }

    /// Create a Vendor-Specific attribute from nested sub-attributes.
    ///
    /// This is the only way to build a VSA; the Vendor-Specific descriptor
    /// rejects byte-array and string construction.
    pub fn vendor_specific(vendor_id: u32, sub_attributes: Vec<Attribute>) -> Self {
        Attribute::new(
            standard::VENDOR_SPECIFIC,
            Value::VendorSpecific {
                vendor_id,
                sub_attributes,
            },
        )
    }

    /// Wire length of this attribute, header included.
    pub fn encoded_length(&self) -> usize {
        Self::MIN_LENGTH + self.value.encoded_len()
    }

    /// Encode to `[type][len][value…]`.
    pub fn encode(&self) -> Result<Vec<u8>, PacketError> {
        let mut out = Vec::with_capacity(self.encoded_length());
        self.write(&mut out)?;
        Ok(out)
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) -> Result<(), PacketError> {
        let length = self.encoded_length();
        if length > Self::MAX_LENGTH {
            return Err(PacketError::InvalidValue {
                attribute: "attribute",
                reason: format!("encoded length {length} exceeds {}", Self::MAX_LENGTH),
            });
        }
        out.push(self.type_code);
        out.push(length as u8);
        self.value.write(out)
    }

    /// Decode one standard-space attribute from the front of `data`.
    ///
    /// Returns the attribute and the number of bytes consumed. Unknown
    /// type codes decode as opaque octets so they round-trip unchanged.
    pub fn decode(data: &[u8], dictionary: &Dictionary) -> Result<(Self, usize), PacketError> {
        Self::decode_in_vendor(data, dictionary, STANDARD_VENDOR)
    }

    pub(crate) fn decode_in_vendor(
        data: &[u8],
        dictionary: &Dictionary,
        vendor_id: i32,
    ) -> Result<(Self, usize), PacketError> {
        if data.len() < Self::MIN_LENGTH {
            return Err(PacketError::MalformedAttribute(format!(
                "truncated attribute header: {} bytes",
                data.len()
            )));
        }

        let type_code = data[0];
        let length = data[1] as usize;
        if length < Self::MIN_LENGTH {
            return Err(PacketError::MalformedAttribute(format!(
                "attribute length {length} below minimum"
            )));
        }
        if length > data.len() {
            return Err(PacketError::MalformedAttribute(format!(
                "attribute length {length} overruns buffer of {}",
                data.len()
            )));
        }

        let value_bytes = &data[2..length];
        let value = match dictionary.get_by_code(vendor_id, type_code) {
            Some(descriptor) => descriptor.value_from_wire(value_bytes, dictionary)?,
            None => Value::Octets(value_bytes.to_vec()),
        };

        Ok((Attribute { type_code, value }, length))
    }
}
