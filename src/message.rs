//! Walking a whole PDU, field by field.
use std::fmt;
use crate::errors::*;
use crate::parse::HexData;
use crate::pdu::*;
use crate::time::{Timestamp, RelativeValidity, ValidityPeriod};
use crate::gsm_encoding::decode_user_data;
use crate::gsm_encoding::udh::UserDataHeader;

/// An address (SMSC, originator or destination), decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// The number, or the text for alphanumeric addresses.
    pub number: String,
    /// Only filled in when parsing verbosely.
    pub type_of_address: Option<TypeOfAddress>
}
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}
/// The user data of a message.
#[derive(Debug, Clone, PartialEq, Eq, is_enum_variant)]
pub enum UserData {
    /// Text, with any EMS formatting applied.
    Text(String),
    /// Binary data for a WAP port; not decoded any further.
    Wap(Vec<u8>)
}
impl UserData {
    /// The text, if this isn't binary data.
    pub fn text(&self) -> Option<&str> {
        match *self {
            UserData::Text(ref t) => Some(t),
            UserData::Wap(_) => None
        }
    }
}
impl fmt::Display for UserData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            UserData::Text(ref t) => write!(f, "{}", t),
            UserData::Wap(ref b) => write!(f, "Wireless Session Protocol (WSP) / WBXML: {}", HexData(b))
        }
    }
}
/// A decoded SMS-DELIVER or SMS-SUBMIT PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPdu {
    /// `None` if the SMSC length octet was zero.
    pub sms_centre: Option<Address>,
    pub type_of_message: TypeOfMessage,
    /// Only present for SMS-SUBMIT.
    pub message_reference: Option<MessageReference>,
    /// Originator for SMS-DELIVER, destination for SMS-SUBMIT.
    pub address: Address,
    pub protocol_identifier: ProtocolIdentifier,
    pub data_coding: DataCodingScheme,
    /// Only present for SMS-DELIVER.
    pub service_centre_timestamp: Option<Timestamp>,
    /// Only present for SMS-SUBMIT, if TP-VPF says so.
    pub validity_period: Option<ValidityPeriod>,
    pub user_data_length: UserDataLength,
    /// A header with zero length if the message doesn't have one.
    pub user_data_header: UserDataHeader,
    pub user_data: UserData,
    /// Everything that didn't look right on the way through.
    pub violations: Vec<Violation>
}
impl ParsedPdu {
    pub fn is_submit(&self) -> bool {
        self.type_of_message.kind.is_submit()
    }
    pub fn is_deliver(&self) -> bool {
        self.type_of_message.kind.is_deliver()
    }
    /// Convenience accessor for the message text.
    pub fn text(&self) -> Option<&str> {
        self.user_data.text()
    }
}
/// Reads octets off the front of a PDU.
///
/// Reading past the end doesn't fail: missing octets read as zero, and a violation is recorded
/// naming the field that got cut off.
struct Cursor<'a> {
    octets: &'a [u8],
    pos: usize
}
impl<'a> Cursor<'a> {
    fn new(octets: &'a [u8]) -> Self {
        Cursor { octets, pos: 0 }
    }
    fn truncated(&self, field: &'static str, violations: &mut Vec<Violation>) {
        record(violations, LengthViolation::Truncated { field });
    }
    fn octet(&mut self, field: &'static str, violations: &mut Vec<Violation>) -> u8 {
        match self.octets.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                b
            },
            None => {
                self.truncated(field, violations);
                0
            }
        }
    }
    /// Up to `n` octets; fewer if the PDU ends first.
    fn take(&mut self, n: usize, field: &'static str, violations: &mut Vec<Violation>) -> &'a [u8] {
        let start = ::std::cmp::min(self.pos, self.octets.len());
        let end = ::std::cmp::min(start + n, self.octets.len());
        if end - start < n {
            self.truncated(field, violations);
        }
        self.pos = end;
        &self.octets[start..end]
    }
    /// Exactly `n` octets, zero-filled if the PDU ends first.
    fn fixed(&mut self, n: usize, field: &'static str, violations: &mut Vec<Violation>) -> Vec<u8> {
        let mut ret = self.take(n, field, violations).to_vec();
        ret.resize(n, 0);
        ret
    }
    fn position(&self) -> usize {
        self.pos
    }
}
fn address(c: &mut Cursor, len: usize, digits: Option<usize>, field: &'static str, verbose: bool, violations: &mut Vec<Violation>) -> Address {
    let toa = TypeOfAddress::from(c.octet("type of address", violations));
    if !toa.high_bit_set() {
        record(violations, ReservedBit::AddressTypeHighBit);
    }
    let number = decode_number(c.take(len, field, violations), digits, &toa, violations);
    Address {
        number,
        type_of_address: if verbose { Some(toa) } else { None }
    }
}
fn timestamp(c: &mut Cursor, field: &'static str, violations: &mut Vec<Violation>) -> Timestamp {
    let ts = Timestamp::from_octets(&c.fixed(7, field, violations));
    if ts.to_datetime().is_none() {
        record(violations, Violation::InvalidTimestamp);
    }
    ts
}
/// Walk the octets of a PDU.
///
/// Nothing in here fails; see `Cursor`.
pub fn parse_octets(octets: &[u8], verbose: bool) -> ParsedPdu {
    let mut v = vec![];
    let mut c = Cursor::new(octets);

    let smsc_len = c.octet("SMSC length", &mut v) as usize;
    let sms_centre = if smsc_len > 0 {
        Some(address(&mut c, smsc_len - 1, None, "SMSC number", verbose, &mut v))
    }
    else {
        None
    };
    let type_of_message = TypeOfMessage::from(c.octet("type of message", &mut v));
    trace!("type of message: {:?}", type_of_message);
    let message_reference = if type_of_message.kind.is_submit() {
        Some(MessageReference(c.octet("message reference", &mut v)))
    }
    else {
        None
    };
    let digits = c.octet("address length", &mut v) as usize;
    let address = address(&mut c, (digits + 1) / 2, Some(digits), "address", verbose, &mut v);
    let protocol_identifier = ProtocolIdentifier::from(c.octet("protocol identifier", &mut v));
    if let Some(bitmask) = protocol_identifier.unsupported_bitmask() {
        record(&mut v, Violation::UnsupportedBitmask { bitmask });
    }
    let data_coding = DataCodingScheme::from(c.octet("data coding scheme", &mut v));
    if let Some(bit) = data_coding.reserved_bit() {
        record(&mut v, bit);
    }
    let alphabet = data_coding.alphabet();
    let mut service_centre_timestamp = None;
    let mut validity_period = None;
    if type_of_message.kind.is_deliver() {
        service_centre_timestamp = Some(timestamp(&mut c, "service centre time stamp", &mut v));
    }
    else {
        validity_period = match type_of_message.validity_period_format() {
            Some(ValidityPeriodFormat::Relative) => {
                Some(ValidityPeriod::Relative(RelativeValidity(c.octet("validity period", &mut v))))
            },
            Some(ValidityPeriodFormat::Absolute) => {
                Some(ValidityPeriod::Absolute(timestamp(&mut c, "validity period", &mut v)))
            },
            Some(ValidityPeriodFormat::Enhanced) => {
                Some(ValidityPeriod::Enhanced(c.fixed(7, "validity period", &mut v)))
            },
            None => None
        };
    }
    let user_data_length = UserDataLength::new(c.octet("user data length", &mut v), alphabet);
    let mut header_consumed = 0;
    let mut user_data_header = UserDataHeader::default();
    if type_of_message.has_udh() {
        let udhl = UserDataHeaderLength::new(c.octet("user data header length", &mut v), alphabet);
        let header = c.take(udhl.length, "user data header", &mut v);
        user_data_header = UserDataHeader::parse(udhl, header, &mut v);
        if !verbose {
            user_data_header.components = None;
            user_data_header.info = None;
        }
        header_consumed = udhl.length + 1;
    }
    // Whatever follows the header is user data, even if TP-UDL disagrees.
    let expected_end = (c.position() + user_data_length.octets).saturating_sub(header_consumed);
    if expected_end < octets.len() {
        record(&mut v, LengthViolation::PduLonger { expected: expected_end, actual: octets.len() });
    }
    else if expected_end > octets.len() {
        record(&mut v, LengthViolation::PduShorter { expected: expected_end, actual: octets.len() });
    }
    let body = &octets[::std::cmp::min(c.position(), octets.len())..];
    // TP-UDL only pins down the septet count if the PDU is as long as it says.
    let septets = if expected_end == octets.len() {
        let header_septets = (header_consumed * 8 + user_data_header.padding_bits as usize) / 7;
        Some((user_data_length.septets as usize).saturating_sub(header_septets))
    }
    else {
        None
    };
    let user_data = if user_data_header.wap {
        UserData::Wap(body.to_vec())
    }
    else {
        let text = decode_user_data(body, alphabet, user_data_header.padding_bits, septets, &mut v);
        UserData::Text(user_data_header.apply_formatting(text))
    };
    debug!("parsed {} PDU with {} violation(s)", type_of_message.kind, v.len());
    ParsedPdu {
        sms_centre,
        type_of_message,
        message_reference,
        address,
        protocol_identifier,
        data_coding,
        service_centre_timestamp,
        validity_period,
        user_data_length,
        user_data_header,
        user_data,
        violations: v
    }
}
/// Parse a PDU hex string.
///
/// The only error is a string that isn't hex; everything else ends up in `violations`.
pub fn parse(pdu: &str, verbose: bool) -> PduResult<ParsedPdu> {
    let octets = HexData::decode(pdu)?;
    Ok(parse_octets(&octets, verbose))
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::gsm_encoding::udh::{ConcatenatedSmsData, PortAddressing};
    use crate::time::RelativeValidity;
    use chrono::{Datelike, Timelike};

    const UCS2_DELIVER: &str = "07919730071111F14007D0CD21720A0008718042814134218B0608040AE50301041D04300020043E0441043D043E04320430043D043804380020043F0440043E0433043D043E0437043000200424041304110423002000AB04260435043D044204400430043B044C043D043E0435002004230413041C042100BB00200032003400200430043204330443044104420430002004320020041C043E0441043A043204350020";
    const SUBMIT: &str = "0011000B916407281553F80000AA0AE8329BFD4697D9EC37";

    #[test]
    fn concatenated_ucs2_deliver() {
        let pdu = parse(UCS2_DELIVER, false).unwrap();
        assert_eq!(pdu.sms_centre.as_ref().unwrap().number, "79037011111");
        assert!(pdu.is_deliver());
        assert_eq!(pdu.type_of_message.flags, vec![MessageFlag::UserDataHeaderIndicator, MessageFlag::MoreMessagesToSend]);
        assert_eq!(pdu.message_reference, None);
        assert_eq!(pdu.address.number, "MCHS");
        assert_eq!(pdu.address.type_of_address, None);
        assert_eq!(pdu.data_coding.alphabet(), Alphabet::Ucs2);
        let ts = pdu.service_centre_timestamp.unwrap();
        assert_eq!(ts.to_string(), "2017-08-24 18:14:43 GMT +3");
        let utc = ts.to_utc().unwrap();
        assert_eq!((utc.year(), utc.month(), utc.day()), (2017, 8, 24));
        assert_eq!((utc.hour(), utc.minute(), utc.second()), (15, 14, 43));
        assert_eq!(pdu.user_data_header.concatenation, Some(ConcatenatedSmsData { reference: 2789, parts: 3, sequence: 1 }));
        assert_eq!(pdu.user_data_header.components, None);
        assert_eq!(pdu.text(), Some("На основании прогноза ФГБУ «Центральное УГМС» 24 августа в Москве "));
        assert_eq!(pdu.violations, vec![]);
    }
    #[test]
    fn verbose() {
        let pdu = parse(UCS2_DELIVER, true).unwrap();
        let toa = pdu.address.type_of_address.unwrap();
        assert_eq!(toa.type_of_number, TypeOfNumber::Alphanumeric);
        assert_eq!(pdu.user_data_header.components.unwrap().len(), 1);
        assert_eq!(pdu.user_data_header.info.unwrap(), "Concatenated message: 16bit reference number 2789, part 1 of 3 parts");
    }
    #[test]
    fn submit() {
        let pdu = parse(SUBMIT, false).unwrap();
        assert!(pdu.is_submit());
        assert_eq!(pdu.sms_centre, None);
        assert_eq!(pdu.type_of_message.flags, vec![
            MessageFlag::ValidityPeriod(ValidityPeriodFormat::Relative),
            MessageFlag::RejectDuplicates
        ]);
        assert_eq!(pdu.message_reference, Some(MessageReference(0)));
        assert_eq!(pdu.address.number, "46708251358");
        assert_eq!(pdu.data_coding.alphabet(), Alphabet::Default);
        assert_eq!(pdu.validity_period, Some(ValidityPeriod::Relative(RelativeValidity(0xAA))));
        assert_eq!(pdu.validity_period.as_ref().unwrap().to_string(), "4 days");
        assert_eq!(pdu.service_centre_timestamp, None);
        assert_eq!(pdu.text(), Some("hellohello"));
        assert_eq!(pdu.violations, vec![]);
    }
    #[test]
    fn lowercase_hex() {
        let pdu = parse(&SUBMIT.to_lowercase(), false).unwrap();
        assert_eq!(pdu.text(), Some("hellohello"));
    }
    #[test]
    fn deliver_7bit() {
        let pdu = parse("07911326040000F0040B911346610089F60000208062917314080CC8F71D14969741F977FD07", false).unwrap();
        assert_eq!(pdu.sms_centre.as_ref().unwrap().number, "31624000000");
        assert_eq!(pdu.address.number, "31641600986");
        assert!(pdu.type_of_message.flags.is_empty());
        assert_eq!(pdu.text(), Some("How are you?"));
        assert_eq!(pdu.violations, vec![]);
    }
    #[test]
    fn deliver_last_century() {
        let pdu = parse("07917283010010F5040BC87238880900F10000993092516195800AE8329BFD4697D9EC37", false).unwrap();
        assert_eq!(pdu.address.number, "27838890001");
        let ts = pdu.service_centre_timestamp.unwrap();
        assert_eq!(ts.year, 1999);
        assert_eq!(ts.zone(), "+02");
        assert_eq!(pdu.text(), Some("hellohello"));
    }
    #[test]
    fn flash() {
        let pdu = parse("0001010B915121551532F40010104190991D9EA341EDF27C1E3E9743", false).unwrap();
        assert_eq!(pdu.data_coding.class(), Some(MessageClass::Flash));
        assert_eq!(pdu.type_of_message.flags, vec![MessageFlag::RejectDuplicates]);
        assert_eq!(pdu.address.number, "15125551234");
        assert_eq!(pdu.data_coding.alphabet(), Alphabet::Default);
        assert_eq!(pdu.text(), Some("A flash message!"));
    }
    #[test]
    fn voicemail_indication() {
        let pdu = parse("0001AB0B915121551532F400C80F3190BB7C07D9DFE971B91D4EB301", false).unwrap();
        assert_eq!(pdu.data_coding.action(), Some(WaitingAction::Discard));
        assert_eq!(pdu.data_coding.active(), Some(true));
        assert_eq!(pdu.data_coding.unread(), Some(MessageWaitingType::Voicemail));
        assert_eq!(pdu.data_coding.alphabet(), Alphabet::Default);
        assert_eq!(pdu.type_of_message.flags, vec![MessageFlag::RejectDuplicates]);
        assert_eq!(pdu.message_reference.unwrap().to_string(), "0xAB");
        assert_eq!(pdu.text(), Some("1 new voicemail"));
    }
    #[test]
    fn wap_push() {
        let pdu = parse("00440B916407281553F800047180428141342109060504 0B8423F00102".replace(' ', "").as_str(), false).unwrap();
        assert!(pdu.user_data_header.wap);
        assert_eq!(pdu.user_data_header.ports, Some(PortAddressing { destination: 2948, source: 9200 }));
        assert_eq!(pdu.user_data, UserData::Wap(vec![0x01, 0x02]));
        assert_eq!(pdu.text(), None);
        assert_eq!(pdu.violations, vec![]);
    }
    #[test]
    fn longer_than_declared() {
        let pdu = parse(&format!("{}FF", SUBMIT), false).unwrap();
        assert_eq!(pdu.violations, vec![Violation::Length(LengthViolation::PduLonger { expected: 24, actual: 25 })]);
        assert!(pdu.text().unwrap().starts_with("hellohello"));
    }
    #[test]
    fn shorter_than_declared() {
        let pdu = parse(&SUBMIT[..SUBMIT.len() - 2], false).unwrap();
        assert_eq!(pdu.violations, vec![Violation::Length(LengthViolation::PduShorter { expected: 24, actual: 23 })]);
        assert_eq!(pdu.text(), Some("hellohell"));
    }
    #[test]
    fn truncated() {
        let pdu = parse("0011000B916407", false).unwrap();
        assert!(pdu.is_submit());
        assert_eq!(pdu.address.number, "4670");
        assert_eq!(pdu.violations[0], Violation::Length(LengthViolation::Truncated { field: "address" }));
        assert!(pdu.violations.iter().all(|v| v.is_length()));
        assert_eq!(pdu.text(), Some(""));
        let pdu = parse("", false).unwrap();
        assert_eq!(pdu.sms_centre, None);
    }
    #[test]
    fn bad_address_type_and_padding() {
        let pdu = parse("0011000B116407281553080000AA0AE8329BFD4697D9EC37", false).unwrap();
        assert_eq!(pdu.violations, vec![
            Violation::ReservedBit(ReservedBit::AddressTypeHighBit),
            Violation::Padding { nibble: '0' }
        ]);
        assert!(pdu.address.number.starts_with("46708251358 (VIOLATION"));
        assert_eq!(pdu.text(), Some("hellohello"));
    }
    #[test]
    fn empty_address_still_has_type() {
        let pdu = parse("0011000081000000AA0AE8329BFD4697D9EC37", true).unwrap();
        assert_eq!(pdu.address.number, "");
        let toa = pdu.address.type_of_address.unwrap();
        assert_eq!(toa.type_of_number, TypeOfNumber::Unknown);
        assert_eq!(pdu.protocol_identifier, ProtocolIdentifier::SmeToSme { bitmask: 0 });
        assert_eq!(pdu.validity_period, Some(ValidityPeriod::Relative(RelativeValidity(0xAA))));
        assert_eq!(pdu.text(), Some("hellohello"));
        assert_eq!(pdu.violations, vec![]);
    }
    #[test]
    fn septet_count_from_user_data_length() {
        // "abcdefg@" fills seven octets exactly; only TP-UDL says there's an '@' at the end
        let pdu = parse("0011000B916407281553F80000AA0861F1985C369F01", false).unwrap();
        assert_eq!(pdu.text(), Some("abcdefg@"));
        assert_eq!(pdu.violations, vec![]);
        let pdu = parse("0011000B916407281553F80000AA0761F1985C369F01", false).unwrap();
        assert_eq!(pdu.text(), Some("abcdefg"));
    }
    #[test]
    fn invalid_hex() {
        assert!(parse("0011000B91640728155 F80000", false).is_err());
        assert!(parse("001", false).is_err());
    }
}
