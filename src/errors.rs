//! Error and violation types.
//!
//! Only malformed *hex* is fatal. Everything the field walker finds wrong with the PDU structure
//! itself is recorded as a `Violation` on the parse result instead; real-world SMSCs emit enough
//! slightly broken PDUs that refusing to decode them isn't useful.
use failure::Fail;

/// A fatal error, returned before any structural decoding takes place.
#[derive(Fail, Debug)]
pub enum PduError {
    #[fail(display = "Invalid PDU string: {}", _0)]
    InvalidFormat(&'static str),
    #[fail(display = "[this should never be shown]")]
    #[doc(hidden)]
    __Nonexhaustive
}
impl From<::nom::ErrorKind> for PduError {
    fn from(_: ::nom::ErrorKind) -> PduError {
        PduError::InvalidFormat("non-hex characters in PDU")
    }
}
pub type PduResult<T> = Result<T, PduError>;

/// Something about the PDU's length doesn't add up.
#[derive(Fail, Debug, Clone, PartialEq, Eq, is_enum_variant)]
pub enum LengthViolation {
    #[fail(display = "PDU shorter than expected! ({} octets, expected {})", actual, expected)]
    PduShorter { expected: usize, actual: usize },
    #[fail(display = "PDU longer than expected! ({} octets, expected {})", actual, expected)]
    PduLonger { expected: usize, actual: usize },
    #[fail(display = "PDU ends before the {} field", field)]
    Truncated { field: &'static str },
    #[fail(display = "Information Element {} should have exactly {} bytes but says it has {} instead!", id, expected, declared)]
    InformationElementDeclared { id: u8, expected: usize, declared: usize },
    #[fail(display = "Information Element {} should have exactly {} bytes but actually has {} instead!", id, expected, actual)]
    InformationElementActual { id: u8, expected: usize, actual: usize }
}

/// A bit that the standard says must have a fixed value didn't.
#[derive(Fail, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedBit {
    #[fail(display = "Highest bit of the Type-of-Address should always be set!")]
    AddressTypeHighBit,
    #[fail(display = "reserved bit set in the data coding/message class group, but should not!")]
    DataCodingClass,
    #[fail(display = "reserved bit set in the message waiting indication group, but should not!")]
    MessageWaiting
}

/// A non-fatal anomaly found while walking a PDU.
#[derive(Fail, Debug, Clone, PartialEq, Eq, is_enum_variant)]
pub enum Violation {
    #[fail(display = "{}", _0)]
    Length(#[cause] LengthViolation),
    #[fail(display = "number not padded with \"F\" but with \"{}\"!", nibble)]
    Padding { nibble: char },
    #[fail(display = "{}", _0)]
    ReservedBit(#[cause] ReservedBit),
    #[fail(display = "unrecognized alphabet, user data decoded as ASCII")]
    UnrecognizedAlphabet,
    #[fail(display = "unknown protocol identifier bitmask: {:b}", bitmask)]
    UnsupportedBitmask { bitmask: u8 },
    #[fail(display = "timestamp does not describe a valid date and time")]
    InvalidTimestamp
}
impl From<LengthViolation> for Violation {
    fn from(v: LengthViolation) -> Violation {
        Violation::Length(v)
    }
}
impl From<ReservedBit> for Violation {
    fn from(v: ReservedBit) -> Violation {
        Violation::ReservedBit(v)
    }
}

/// Push a violation onto the list, logging it as we go.
pub fn record<V: Into<Violation>>(violations: &mut Vec<Violation>, v: V) {
    let v = v.into();
    warn!("PDU violation: {}", v);
    violations.push(v);
}
