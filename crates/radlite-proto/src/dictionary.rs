//! Attribute dictionary (RFC 2865 Section 5)
//!
//! The dictionary maps `(vendor_id, type_code)` pairs to attribute
//! descriptors carrying a name, a data type, and optional integer
//! enumerations. It is built once at startup and shared read-only; decode
//! paths look descriptors up by code, user-facing paths by name.
//!
//! Vendor-Specific sub-attributes use the vendor's private number space and
//! are registered under their vendor id; standard attributes use
//! [`STANDARD_VENDOR`] (-1).

use crate::attributes::{standard, Attribute, Value};
use crate::packet::PacketError;
use std::collections::HashMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Vendor id used for standard (non-vendor) attributes.
pub const STANDARD_VENDOR: i32 = -1;

/// RADIUS attribute data types (RFC 2865 Section 5, RFC 3162)
///
/// `Date` shares the 4-byte big-endian wire form with `Integer` and prints
/// as seconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    String,
    Octets,
    Integer,
    Date,
    IpV4,
    IpV6,
    IpV6Prefix,
    VendorSpecific,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::String => "string",
            DataType::Octets => "octets",
            DataType::Integer => "integer",
            DataType::Date => "date",
            DataType::IpV4 => "ipaddr",
            DataType::IpV6 => "ipv6addr",
            DataType::IpV6Prefix => "ipv6prefix",
            DataType::VendorSpecific => "vsa",
        };
        f.write_str(name)
    }
}

/// Descriptor for one attribute type.
///
/// Two descriptors are equal iff their `(vendor_id, type_code)` match;
/// name, data type, and enumerations carry no identity.
#[derive(Debug, Clone)]
pub struct AttributeDescriptor {
    vendor_id: i32,
    type_code: u8,
    name: String,
    data_type: DataType,
    enumeration: HashMap<u32, String>,
}

impl PartialEq for AttributeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.vendor_id == other.vendor_id && self.type_code == other.type_code
    }
}

impl Eq for AttributeDescriptor {}

impl AttributeDescriptor {
    /// Create a standard attribute descriptor.
    pub fn new(
        type_code: u8,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Result<Self, PacketError> {
        Self::vendor(STANDARD_VENDOR, type_code, name, data_type)
    }

    /// Create a vendor sub-attribute descriptor.
    pub fn vendor(
        vendor_id: i32,
        type_code: u8,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Result<Self, PacketError> {
        let name = name.into();
        if type_code == 0 {
            return Err(PacketError::InvalidValue {
                attribute: "descriptor",
                reason: "type code out of bounds".to_string(),
            });
        }
        if name.is_empty() {
            return Err(PacketError::InvalidValue {
                attribute: "descriptor",
                reason: "name is empty".to_string(),
            });
        }

        // Type 26 in the standard space is always the VSA container,
        // whatever the caller declared.
        let data_type = if vendor_id == STANDARD_VENDOR && type_code == standard::VENDOR_SPECIFIC {
            DataType::VendorSpecific
        } else {
            data_type
        };

        Ok(AttributeDescriptor {
            vendor_id,
            type_code,
            name,
            data_type,
            enumeration: HashMap::new(),
        })
    }

    /// Register a name for an integer value of this attribute (builder style).
    pub fn with_value(mut self, value: u32, name: impl Into<String>) -> Self {
        self.enumeration.insert(value, name.into());
        self
    }

    pub fn vendor_id(&self) -> i32 {
        self.vendor_id
    }

    pub fn type_code(&self) -> u8 {
        self.type_code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Name of an enumerated integer value, if registered.
    pub fn enum_name(&self, value: u32) -> Option<&str> {
        self.enumeration.get(&value).map(String::as_str)
    }

    /// Integer value of an enumeration name. Linear scan; the sets are small.
    pub fn enum_value(&self, name: &str) -> Option<u32> {
        self.enumeration
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(v, _)| *v)
    }

    /// Build a typed value from wire bytes.
    ///
    /// Dispatches on the descriptor's data type and validates value length.
    /// The dictionary is needed to resolve nested vendor sub-attributes.
    pub fn value_from_wire(
        &self,
        data: &[u8],
        dictionary: &Dictionary,
    ) -> Result<Value, PacketError> {
        match self.data_type {
            DataType::VendorSpecific => decode_vendor_specific(data, dictionary),
            _ => self.value_from_bytes(data),
        }
    }

    /// Build a typed value from caller-supplied bytes.
    ///
    /// The Vendor-Specific container cannot be built this way; VSAs are
    /// assembled by nesting sub-attributes.
    pub fn value_from_bytes(&self, data: &[u8]) -> Result<Value, PacketError> {
        match self.data_type {
            DataType::String => Ok(match String::from_utf8(data.to_vec()) {
                Ok(text) => Value::String(text),
                // Preserve the bytes rather than fail the whole packet.
                Err(err) => Value::Octets(err.into_bytes()),
            }),
            DataType::Octets => Ok(Value::Octets(data.to_vec())),
            DataType::Integer => Ok(Value::Integer(self.exact4(data)?)),
            DataType::Date => Ok(Value::Date(self.exact4(data)?)),
            DataType::IpV4 => {
                if data.len() != 4 {
                    return Err(self.invalid(format!("expected 4 bytes, got {}", data.len())));
                }
                let mut octets = [0u8; 4];
                octets.copy_from_slice(data);
                Ok(Value::IpV4(Ipv4Addr::from(octets)))
            }
            DataType::IpV6 => {
                if data.len() != 16 {
                    return Err(self.invalid(format!("expected 16 bytes, got {}", data.len())));
                }
                let mut octets = [0u8; 16];
                octets.copy_from_slice(data);
                Ok(Value::IpV6(Ipv6Addr::from(octets)))
            }
            DataType::IpV6Prefix => {
                // RFC 3162: [reserved][prefix-len][address, possibly truncated]
                if data.len() < 2 || data.len() > 18 {
                    return Err(self.invalid(format!(
                        "expected 2..=18 bytes for ipv6 prefix, got {}",
                        data.len()
                    )));
                }
                if data[0] != 0 {
                    return Err(self.invalid("reserved byte must be zero".to_string()));
                }
                let prefix_len = data[1];
                let address = data[2..].to_vec();
                if prefix_len > 128 {
                    return Err(self.invalid(format!("prefix length {prefix_len} out of range")));
                }
                if (address.len() as u32) * 8 < u32::from(prefix_len) {
                    return Err(self.invalid("address shorter than prefix length".to_string()));
                }
                Ok(Value::IpV6Prefix {
                    prefix_len,
                    address,
                })
            }
            DataType::VendorSpecific => Err(self.invalid(
                "Vendor-Specific cannot be built from raw bytes; nest sub-attributes".to_string(),
            )),
        }
    }

    /// Parse a typed value from its text form.
    ///
    /// `Integer` accepts either a decimal number or an enumeration name.
    /// `Octets` and `VendorSpecific` have no text form.
    pub fn value_from_string(&self, text: &str) -> Result<Value, PacketError> {
        match self.data_type {
            DataType::String => Ok(Value::String(text.to_string())),
            DataType::Integer => {
                if let Ok(value) = text.parse::<u32>() {
                    return Ok(Value::Integer(value));
                }
                self.enum_value(text)
                    .map(Value::Integer)
                    .ok_or_else(|| self.invalid(format!("unknown value name '{text}'")))
            }
            DataType::Date => text
                .parse::<u32>()
                .map(Value::Date)
                .map_err(|_| self.invalid(format!("'{text}' is not an epoch timestamp"))),
            DataType::IpV4 => text
                .parse::<Ipv4Addr>()
                .map(Value::IpV4)
                .map_err(|_| self.invalid(format!("'{text}' is not a dotted quad"))),
            DataType::IpV6 => text
                .parse::<Ipv6Addr>()
                .map(Value::IpV6)
                .map_err(|_| self.invalid(format!("'{text}' is not an IPv6 address"))),
            DataType::IpV6Prefix => {
                let (addr, len) = text
                    .split_once('/')
                    .ok_or_else(|| self.invalid(format!("'{text}' is not addr/len")))?;
                let address = addr
                    .parse::<Ipv6Addr>()
                    .map_err(|_| self.invalid(format!("'{addr}' is not an IPv6 address")))?;
                let prefix_len = len
                    .parse::<u8>()
                    .ok()
                    .filter(|l| *l <= 128)
                    .ok_or_else(|| self.invalid(format!("prefix length '{len}' out of range")))?;
                Ok(Value::IpV6Prefix {
                    prefix_len,
                    address: address.octets().to_vec(),
                })
            }
            DataType::Octets => {
                Err(self.invalid("octets attributes have no string form".to_string()))
            }
            DataType::VendorSpecific => Err(self.invalid(
                "Vendor-Specific cannot be built from a string; nest sub-attributes".to_string(),
            )),
        }
    }

    /// Human-readable form of a value, using enumeration names where known.
    pub fn format_value(&self, value: &Value) -> String {
        if let Value::Integer(n) = value {
            if let Some(name) = self.enum_name(*n) {
                return name.to_string();
            }
        }
        value.to_string()
    }

    fn exact4(&self, data: &[u8]) -> Result<u32, PacketError> {
        if data.len() != 4 {
            return Err(self.invalid(format!("expected 4 bytes, got {}", data.len())));
        }
        let mut buf = [0u8; 4];
        buf.copy_from_slice(data);
        Ok(u32::from_be_bytes(buf))
    }

    fn invalid(&self, reason: String) -> PacketError {
        PacketError::InvalidValue {
            attribute: "attribute",
            reason: format!("{}: {}", self.name, reason),
        }
    }
}

fn decode_vendor_specific(data: &[u8], dictionary: &Dictionary) -> Result<Value, PacketError> {
    if data.len() < 4 {
        return Err(PacketError::MalformedAttribute(format!(
            "Vendor-Specific value too short: {} bytes",
            data.len()
        )));
    }
    let mut vendor = [0u8; 4];
    vendor.copy_from_slice(&data[..4]);
    let vendor_id = u32::from_be_bytes(vendor);

    let mut sub_attributes = Vec::new();
    let mut rest = &data[4..];
    while !rest.is_empty() {
        let (attr, consumed) = Attribute::decode_in_vendor(rest, dictionary, vendor_id as i32)?;
        sub_attributes.push(attr);
        rest = &rest[consumed..];
    }

    Ok(Value::VendorSpecific {
        vendor_id,
        sub_attributes,
    })
}

/// Immutable attribute registry.
///
/// Built once via [`DictionaryBuilder`], then shared read-only across
/// workers; lookups need no synchronization.
#[derive(Debug, Clone)]
pub struct Dictionary {
    by_code: HashMap<(i32, u8), AttributeDescriptor>,
    by_name: HashMap<String, (i32, u8)>,
}

impl Dictionary {
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder {
            dictionary: Dictionary {
                by_code: HashMap::new(),
                by_name: HashMap::new(),
            },
        }
    }

    /// Look up a descriptor by `(vendor_id, type_code)`.
    /// Use [`STANDARD_VENDOR`] for non-vendor attributes.
    pub fn get_by_code(&self, vendor_id: i32, type_code: u8) -> Option<&AttributeDescriptor> {
        self.by_code.get(&(vendor_id, type_code))
    }

    /// Look up a descriptor by its (case-sensitive, unique) name.
    pub fn get_by_name(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.by_name.get(name).and_then(|key| self.by_code.get(key))
    }

    /// Render an attribute as `Name = value`, resolving enumeration names
    /// and nested vendor sub-attributes.
    pub fn format_attribute(&self, attribute: &Attribute) -> String {
        self.format_in_vendor(STANDARD_VENDOR, attribute)
    }

    fn format_in_vendor(&self, vendor_id: i32, attribute: &Attribute) -> String {
        if let Value::VendorSpecific {
            vendor_id: vendor,
            sub_attributes,
        } = &attribute.value
        {
            let rendered: Vec<String> = sub_attributes
                .iter()
                .map(|sub| self.format_in_vendor(*vendor as i32, sub))
                .collect();
            return format!("Vendor-Specific (vendor {}): [{}]", vendor, rendered.join(", "));
        }

        match self.get_by_code(vendor_id, attribute.type_code) {
            Some(descriptor) => format!(
                "{} = {}",
                descriptor.name(),
                descriptor.format_value(&attribute.value)
            ),
            None => format!("Attr-{} = {}", attribute.type_code, attribute.value),
        }
    }

    /// The standard RFC 2865/2866/2869/3162 attribute set.
    pub fn standard() -> Dictionary {
        standard_dictionary()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Dictionary::standard()
    }
}

/// Builder for [`Dictionary`]. Re-registering a `(vendor, code)` pair
/// replaces the earlier descriptor and its name binding.
pub struct DictionaryBuilder {
    dictionary: Dictionary,
}

impl DictionaryBuilder {
    pub fn attribute(mut self, descriptor: AttributeDescriptor) -> Self {
        let key = (descriptor.vendor_id, descriptor.type_code);
        if let Some(old) = self.dictionary.by_code.get(&key) {
            self.dictionary.by_name.remove(&old.name);
        }
        self.dictionary.by_name.insert(descriptor.name.clone(), key);
        self.dictionary.by_code.insert(key, descriptor);
        self
    }

    pub fn build(self) -> Dictionary {
        self.dictionary
    }
}

fn standard_dictionary() -> Dictionary {
    use DataType::*;

    let plain: &[(u8, &str, DataType)] = &[
        (1, "User-Name", String),
        (2, "User-Password", Octets),
        (3, "CHAP-Password", Octets),
        (4, "NAS-IP-Address", IpV4),
        (5, "NAS-Port", Integer),
        (8, "Framed-IP-Address", IpV4),
        (9, "Framed-IP-Netmask", IpV4),
        (11, "Filter-Id", String),
        (12, "Framed-MTU", Integer),
        (14, "Login-IP-Host", IpV4),
        (16, "Login-TCP-Port", Integer),
        (18, "Reply-Message", String),
        (19, "Callback-Number", String),
        (20, "Callback-Id", String),
        (22, "Framed-Route", String),
        (23, "Framed-IPX-Network", Integer),
        (24, "State", Octets),
        (25, "Class", Octets),
        (26, "Vendor-Specific", VendorSpecific),
        (27, "Session-Timeout", Integer),
        (28, "Idle-Timeout", Integer),
        (30, "Called-Station-Id", String),
        (31, "Calling-Station-Id", String),
        (32, "NAS-Identifier", String),
        (33, "Proxy-State", Octets),
        (34, "Login-LAT-Service", String),
        (35, "Login-LAT-Node", String),
        (36, "Login-LAT-Group", Octets),
        (37, "Framed-AppleTalk-Link", Integer),
        (38, "Framed-AppleTalk-Network", Integer),
        (39, "Framed-AppleTalk-Zone", String),
        (41, "Acct-Delay-Time", Integer),
        (42, "Acct-Input-Octets", Integer),
        (43, "Acct-Output-Octets", Integer),
        (44, "Acct-Session-Id", String),
        (46, "Acct-Session-Time", Integer),
        (47, "Acct-Input-Packets", Integer),
        (48, "Acct-Output-Packets", Integer),
        (50, "Acct-Multi-Session-Id", String),
        (51, "Acct-Link-Count", Integer),
        (52, "Acct-Input-Gigawords", Integer),
        (53, "Acct-Output-Gigawords", Integer),
        (55, "Event-Timestamp", Date),
        (60, "CHAP-Challenge", Octets),
        (62, "Port-Limit", Integer),
        (63, "Login-LAT-Port", String),
        (79, "EAP-Message", Octets),
        (80, "Message-Authenticator", Octets),
        (95, "NAS-IPv6-Address", IpV6),
        (96, "Framed-Interface-Id", Octets),
        (97, "Framed-IPv6-Prefix", IpV6Prefix),
        (98, "Login-IPv6-Host", IpV6),
        (99, "Framed-IPv6-Route", String),
        (100, "Framed-IPv6-Pool", String),
    ];

    let mut builder = Dictionary::builder();
    for (code, name, data_type) in plain {
        // The table above is static and validated; construction cannot fail.
        if let Ok(descriptor) = AttributeDescriptor::new(*code, *name, *data_type) {
            builder = builder.attribute(descriptor);
        }
    }

    let enumerated: &[(u8, &str, &[(u32, &str)])] = &[
        (
            6,
            "Service-Type",
            &[
                (1, "Login-User"),
                (2, "Framed-User"),
                (3, "Callback-Login-User"),
                (4, "Callback-Framed-User"),
                (5, "Outbound-User"),
                (6, "Administrative-User"),
                (7, "NAS-Prompt-User"),
                (8, "Authenticate-Only"),
                (9, "Callback-NAS-Prompt"),
                (10, "Call-Check"),
                (11, "Callback-Administrative"),
            ],
        ),
        (
            7,
            "Framed-Protocol",
            &[
                (1, "PPP"),
                (2, "SLIP"),
                (3, "ARAP"),
                (4, "Gandalf-SLML"),
                (5, "Xylogics-IPX-SLIP"),
                (6, "X.75-Synchronous"),
            ],
        ),
        (
            10,
            "Framed-Routing",
            &[
                (0, "None"),
                (1, "Broadcast"),
                (2, "Listen"),
                (3, "Broadcast-Listen"),
            ],
        ),
        (
            13,
            "Framed-Compression",
            &[
                (0, "None"),
                (1, "Van-Jacobson-TCP-IP"),
                (2, "IPX-Header-Compression"),
                (3, "Stac-LZS"),
            ],
        ),
        (
            15,
            "Login-Service",
            &[
                (0, "Telnet"),
                (1, "Rlogin"),
                (2, "TCP-Clear"),
                (3, "PortMaster"),
                (4, "LAT"),
                (5, "X25-PAD"),
                (6, "X25-T3POS"),
                (8, "TCP-Clear-Quiet"),
            ],
        ),
        (
            29,
            "Termination-Action",
            &[(0, "Default"), (1, "RADIUS-Request")],
        ),
        (
            40,
            "Acct-Status-Type",
            &[
                (1, "Start"),
                (2, "Stop"),
                (3, "Interim-Update"),
                (7, "Accounting-On"),
                (8, "Accounting-Off"),
            ],
        ),
        (
            45,
            "Acct-Authentic",
            &[(1, "RADIUS"), (2, "Local"), (3, "Remote")],
        ),
        (
            49,
            "Acct-Terminate-Cause",
            &[
                (1, "User-Request"),
                (2, "Lost-Carrier"),
                (3, "Lost-Service"),
                (4, "Idle-Timeout"),
                (5, "Session-Timeout"),
                (6, "Admin-Reset"),
                (7, "Admin-Reboot"),
                (8, "Port-Error"),
                (9, "NAS-Error"),
                (10, "NAS-Request"),
                (11, "NAS-Reboot"),
                (12, "Port-Unneeded"),
                (13, "Port-Preempted"),
                (14, "Port-Suspended"),
                (15, "Service-Unavailable"),
                (16, "Callback"),
                (17, "User-Error"),
                (18, "Host-Request"),
            ],
        ),
        (
            61,
            "NAS-Port-Type",
            &[
                (0, "Async"),
                (1, "Sync"),
                (2, "ISDN"),
                (3, "ISDN-V120"),
                (4, "ISDN-V110"),
                (5, "Virtual"),
                (15, "Ethernet"),
                (17, "Cable"),
                (18, "Wireless-Other"),
                (19, "Wireless-802.11"),
            ],
        ),
    ];

    for (code, name, values) in enumerated {
        if let Ok(mut descriptor) = AttributeDescriptor::new(*code, *name, DataType::Integer) {
            for (value, value_name) in *values {
                descriptor = descriptor.with_value(*value, *value_name);
            }
            builder = builder.attribute(descriptor);
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lookup_by_code_and_name() {
        let dict = Dictionary::standard();

        let user_name = dict.get_by_code(STANDARD_VENDOR, 1).unwrap();
        assert_eq!(user_name.name(), "User-Name");
        assert_eq!(user_name.data_type(), DataType::String);

        let by_name = dict.get_by_name("User-Name").unwrap();
        assert_eq!(by_name, user_name);

        assert!(dict.get_by_code(STANDARD_VENDOR, 200).is_none());
        assert!(dict.get_by_name("No-Such-Attribute").is_none());
        // case sensitive
        assert!(dict.get_by_name("user-name").is_none());
    }

    #[test]
    fn test_descriptor_equality_on_key_only() {
        let a = AttributeDescriptor::new(1, "User-Name", DataType::String).unwrap();
        let b = AttributeDescriptor::new(1, "Renamed", DataType::Octets).unwrap();
        let c = AttributeDescriptor::new(2, "User-Name", DataType::String).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(
            AttributeDescriptor::vendor(9, 1, "X", DataType::String).unwrap(),
            a
        );
    }

    #[test]
    fn test_descriptor_validation() {
        assert!(AttributeDescriptor::new(0, "Zero", DataType::String).is_err());
        assert!(AttributeDescriptor::new(1, "", DataType::String).is_err());
    }

    #[test]
    fn test_type_26_is_always_the_vsa_container() {
        let descriptor = AttributeDescriptor::new(26, "Vendor-Specific", DataType::String).unwrap();
        assert_eq!(descriptor.data_type(), DataType::VendorSpecific);
        assert!(descriptor.value_from_bytes(b"abcd").is_err());
        assert!(descriptor.value_from_string("abcd").is_err());
    }

    #[test]
    fn test_enumerations() {
        let dict = Dictionary::standard();
        let service_type = dict.get_by_name("Service-Type").unwrap();

        assert_eq!(service_type.enum_name(1), Some("Login-User"));
        assert_eq!(service_type.enum_value("Framed-User"), Some(2));
        assert_eq!(service_type.enum_name(99), None);
        assert_eq!(service_type.enum_value("Bogus"), None);

        // from_string accepts both decimal and names
        assert_eq!(
            service_type.value_from_string("2").unwrap(),
            Value::Integer(2)
        );
        assert_eq!(
            service_type.value_from_string("Framed-User").unwrap(),
            Value::Integer(2)
        );
        assert!(service_type.value_from_string("Bogus").is_err());

        assert_eq!(service_type.format_value(&Value::Integer(1)), "Login-User");
        assert_eq!(service_type.format_value(&Value::Integer(77)), "77");
    }

    #[test]
    fn test_octets_rejects_string_form() {
        let dict = Dictionary::standard();
        let state = dict.get_by_name("State").unwrap();
        assert!(matches!(
            state.value_from_string("opaque"),
            Err(PacketError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_fixed_width_validation() {
        let dict = Dictionary::standard();
        let nas_port = dict.get_by_name("NAS-Port").unwrap();
        assert!(nas_port.value_from_bytes(&[0, 0, 1]).is_err());
        assert_eq!(
            nas_port.value_from_bytes(&[0, 0, 0, 5]).unwrap(),
            Value::Integer(5)
        );

        let nas_ip = dict.get_by_name("NAS-IP-Address").unwrap();
        assert!(nas_ip.value_from_bytes(&[10, 0, 0]).is_err());
        assert_eq!(
            nas_ip.value_from_bytes(&[10, 0, 0, 1]).unwrap(),
            Value::IpV4("10.0.0.1".parse().unwrap())
        );
    }

    #[test]
    fn test_ipv6_prefix_forms() {
        let dict = Dictionary::standard();
        let prefix = dict.get_by_name("Framed-IPv6-Prefix").unwrap();

        // wire form with truncated address
        let value = prefix.value_from_bytes(&[0, 16, 0x20, 0x01]).unwrap();
        assert_eq!(
            value,
            Value::IpV6Prefix {
                prefix_len: 16,
                address: vec![0x20, 0x01],
            }
        );

        // too short for the declared prefix
        assert!(prefix.value_from_bytes(&[0, 64, 0x20]).is_err());
        // nonzero reserved byte
        assert!(prefix.value_from_bytes(&[1, 16, 0x20, 0x01]).is_err());
        // prefix length out of range
        assert!(prefix
            .value_from_bytes(&[0, 129, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])
            .is_err());

        let parsed = prefix.value_from_string("2001:db8::/32").unwrap();
        match parsed {
            Value::IpV6Prefix {
                prefix_len,
                ref address,
            } => {
                assert_eq!(prefix_len, 32);
                assert_eq!(address.len(), 16);
                assert_eq!(&address[..4], &[0x20, 0x01, 0x0d, 0xb8]);
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_string_falls_back_to_octets() {
        let dict = Dictionary::standard();
        let user_name = dict.get_by_name("User-Name").unwrap();
        let value = user_name.value_from_bytes(&[0xff, 0xfe]).unwrap();
        assert_eq!(value, Value::Octets(vec![0xff, 0xfe]));
    }

    #[test]
    fn test_builder_replaces_earlier_registration() {
        let dict = Dictionary::builder()
            .attribute(AttributeDescriptor::new(1, "First", DataType::String).unwrap())
            .attribute(AttributeDescriptor::new(1, "Second", DataType::Octets).unwrap())
            .build();

        assert_eq!(dict.get_by_code(STANDARD_VENDOR, 1).unwrap().name(), "Second");
        assert!(dict.get_by_name("First").is_none());
        assert!(dict.get_by_name("Second").is_some());
    }

    #[test]
    fn test_vendor_descriptor_lookup() {
        let dict = Dictionary::builder()
            .attribute(AttributeDescriptor::vendor(9, 1, "Cisco-AVPair", DataType::String).unwrap())
            .build();

        let descriptor = dict.get_by_code(9, 1).unwrap();
        assert_eq!(descriptor.name(), "Cisco-AVPair");
        assert!(dict.get_by_code(STANDARD_VENDOR, 1).is_none());
    }
}
