//! The individual fields of GSM 03.40 Protocol Data Units (PDUs).
//!
//! See [this Wikipedia article](https://en.wikipedia.org/wiki/GSM_03.40) for more general
//! information on the format of PDUs.
//!
//! Every type here is decoded from one or a few raw octets, without reference to the rest of the
//! PDU (apart from the odd bit of context, like the alphabet). Stitching them together in the
//! right order is the job of the `message` module.
use std::fmt;
use std::str::FromStr;
use std::convert::Infallible;
use num::FromPrimitive;
use crate::errors::*;
use crate::gsm_encoding::{gsm_decode_string, decode_sms_7bit};

/// Type of number value - used as part of phone numbers to indicate whether the number is
/// international, alphanumeric, etc.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive, Hash)]
pub enum TypeOfNumber {
    Unknown = 0b0_000_0000,
    International = 0b0_001_0000,
    National = 0b0_010_0000,
    NetworkSpecific = 0b0_011_0000,
    Subscriber = 0b0_100_0000,
    /// Not a phone number at all, but some text packed with the GSM 7-bit alphabet (e.g. when
    /// banks/other companies send you SMSes).
    Alphanumeric = 0b0_101_0000,
    Abbreviated = 0b0_110_0000,
    Reserved = 0b0_111_0000
}
impl fmt::Display for TypeOfNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::TypeOfNumber::*;
        let text = match *self {
            Unknown => "Unknown type of address",
            International => "International number",
            National => "National number",
            NetworkSpecific => "Network specific number",
            Subscriber => "Subscriber number",
            Alphanumeric => "Alphanumeric, (coded according to GSM TS 03.38 7-bit default alphabet)",
            Abbreviated => "Abbreviated number",
            Reserved => "Reserved for extension"
        };
        write!(f, "{}", text)
    }
}
/// Numbering plan identification value.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive, Hash)]
pub enum NumberingPlanIdentification {
    Unknown = 0b0_000_0000,
    IsdnTelephone = 0b0_000_0001,
    Data = 0b0_000_0011,
    Telex = 0b0_000_0100,
    National = 0b0_000_1000,
    Private = 0b0_000_1001,
    Ermes = 0b0_000_1010,
    ReservedForExtension = 0b0_000_1111
}
impl fmt::Display for NumberingPlanIdentification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::NumberingPlanIdentification::*;
        let text = match *self {
            Unknown => "Unknown numbering plan",
            IsdnTelephone => "ISDN/telephone numbering plan (E.164/E.163)",
            Data => "IData numbering plan (X.121)",
            Telex => "Telex numbering plan",
            National => "National numbering plan",
            Private => "Private numbering plan",
            Ermes => "ERMES numbering plan (ETSI DE/PS 3 01-3)",
            ReservedForExtension => "Reserved for extension"
        };
        write!(f, "{}", text)
    }
}
/// Type-of-Address octet, comprised of a `TypeOfNumber` and a `NumberingPlanIdentification`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TypeOfAddress {
    pub type_of_number: TypeOfNumber,
    /// `None` if the octet names one of the reserved numbering plans.
    pub numbering_plan: Option<NumberingPlanIdentification>,
    raw: u8
}
impl TypeOfAddress {
    pub fn new(type_of_number: TypeOfNumber, numbering_plan: NumberingPlanIdentification) -> Self {
        TypeOfAddress {
            type_of_number,
            numbering_plan: Some(numbering_plan),
            raw: 0b1_000_0000 | type_of_number as u8 | numbering_plan as u8
        }
    }
    /// The top bit of this octet must always be set.
    pub fn high_bit_set(&self) -> bool {
        (self.raw & 0b1_000_0000) > 0
    }
}
impl From<u8> for TypeOfAddress {
    fn from(b: u8) -> Self {
        let type_of_number = TypeOfNumber::from_u8(b & 0b0_111_0000)
            .unwrap_or(TypeOfNumber::Reserved);
        let numbering_plan = NumberingPlanIdentification::from_u8(b & 0b0_000_1111);
        TypeOfAddress { type_of_number, numbering_plan, raw: b }
    }
}
impl From<TypeOfAddress> for u8 {
    fn from(t: TypeOfAddress) -> u8 {
        t.raw
    }
}
impl fmt::Display for TypeOfAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, ", self.type_of_number)?;
        match self.numbering_plan {
            Some(npi) => write!(f, "{}", npi)?,
            None => write!(f, "Reserved numbering plan")?
        }
        if !self.high_bit_set() {
            write!(f, " (VIOLATION: Highest bit should always be set!)")?;
        }
        Ok(())
    }
}
/// Decode an address value (i.e. the part after the length and Type-of-Address octets).
///
/// Numbers are BCD semi-octets, least significant nibble first, padded at the end with an `F`
/// nibble. If the padding nibble is something else, the number gets a `(VIOLATION: ...)` note
/// tacked on and a `Violation::Padding` is recorded; it's not an error.
///
/// Alphanumeric addresses are decoded as packed 7-bit text instead.
pub fn decode_number(b: &[u8], digits: Option<usize>, toa: &TypeOfAddress, violations: &mut Vec<Violation>) -> String {
    if toa.type_of_number == TypeOfNumber::Alphanumeric {
        return gsm_decode_string(&decode_sms_7bit(b, 0));
    }
    let mut ret = String::with_capacity(b.len() * 2);
    for b in b.iter() {
        ret.push_str(&format!("{:X}{:X}", b & 0b0000_1111, b >> 4));
    }
    let too_long = digits.map(|d| ret.len() > d).unwrap_or(false);
    let ends_badly = ret.chars().last().map(|c| !c.is_ascii_digit()).unwrap_or(false);
    if too_long || ends_badly {
        if let Some(pad) = ret.pop() {
            if pad != 'F' {
                record(violations, Violation::Padding { nibble: pad });
                ret.push_str(&format!(" (VIOLATION: number not padded with \"F\" but with \"{}\"!)", pad));
            }
        }
    }
    ret
}
/// A phone number, as a list of semi-octet values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(pub Vec<u8>);
impl PhoneNumber {
    /// Pack into semi-octets, padding odd-length numbers with `F`.
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut ret = vec![];
        let mut cur = 0b0000_0000;
        for (i, b) in self.0.iter().enumerate() {
            let mut b = *b;
            if i % 2 == 0 {
                cur |= b;
            }
            else {
                b = b << 4;
                cur |= b;
                ret.push(cur);
                cur = 0b0000_0000;
            }
        }
        if self.0.len() % 2 != 0 {
            cur |= 0b1111_0000;
            ret.push(cur);
        }
        ret
    }
}
/// A destination address for outgoing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduAddress {
    pub type_addr: TypeOfAddress,
    pub number: PhoneNumber
}
/// A leading `+` makes the number international; anything apart from digits, `*` and `#` is
/// dropped.
impl FromStr for PduAddress {
    type Err = Infallible;
    fn from_str(st: &str) -> Result<Self, Infallible> {
        let international = st.starts_with('+');
        let buf = st.chars()
            .filter_map(|x| {
                match x {
                    '0'..='9' => Some(x as u8 - 48),
                    '*' => Some(0xA),
                    '#' => Some(0xB),
                    _ => None
                }
            }).collect::<Vec<_>>();
        let ton = if international {
            TypeOfNumber::International
        }
        else {
            TypeOfNumber::Unknown
        };
        Ok(PduAddress {
            type_addr: TypeOfAddress::new(ton, NumberingPlanIdentification::IsdnTelephone),
            number: PhoneNumber(buf)
        })
    }
}
impl PduAddress {
    /// Length (in digits), Type-of-Address, then the semi-octets.
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut ret = vec![];
        ret.push(self.number.0.len() as u8);
        ret.push(self.type_addr.into());
        ret.extend(self.number.as_bytes());
        ret
    }
}
/// Kind of message, from the TP-MTI bit of the first octet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, is_enum_variant)]
pub enum MessageKind {
    /// SMS-DELIVER (SMSC to phone).
    Deliver,
    /// SMS-SUBMIT (phone to SMSC).
    Submit
}
impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MessageKind::Deliver => write!(f, "deliver"),
            MessageKind::Submit => write!(f, "submit")
        }
    }
}
/// Validity Period Format (TP-VPF) of an SMS-SUBMIT.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum ValidityPeriodFormat {
    Enhanced = 0b000_01_000,
    Relative = 0b000_10_000,
    Absolute = 0b000_11_000
}
impl fmt::Display for ValidityPeriodFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValidityPeriodFormat::Enhanced => write!(f, "enhanced"),
            ValidityPeriodFormat::Relative => write!(f, "relative"),
            ValidityPeriodFormat::Absolute => write!(f, "absolute")
        }
    }
}
/// A flag from the first octet of a PDU.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MessageFlag {
    ReplyPath,
    UserDataHeaderIndicator,
    StatusReportRequest,
    ValidityPeriod(ValidityPeriodFormat),
    /// Set when the TP-RD bit is *clear*.
    RejectDuplicates,
    StatusReportIndication,
    /// Set when the TP-MMS bit is *clear*.
    MoreMessagesToSend
}
impl MessageFlag {
    pub fn name(&self) -> &'static str {
        use self::MessageFlag::*;
        match *self {
            ReplyPath => "TP-RP",
            UserDataHeaderIndicator => "TP-UDHI",
            StatusReportRequest => "TP-SRR",
            ValidityPeriod(_) => "TP-VPF",
            RejectDuplicates => "TP-RD",
            StatusReportIndication => "TP-SRI",
            MoreMessagesToSend => "TP-MMS"
        }
    }
    pub fn description(&self) -> &'static str {
        use self::MessageFlag::*;
        match *self {
            ReplyPath => "Reply path exists",
            UserDataHeaderIndicator => "User data header indicator",
            StatusReportRequest => "Status report request",
            ValidityPeriod(_) => "Validity Period Format",
            RejectDuplicates => "Reject duplicates",
            StatusReportIndication => "Status report indication",
            MoreMessagesToSend => "More messages to send"
        }
    }
}
impl fmt::Display for MessageFlag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.description())?;
        if let MessageFlag::ValidityPeriod(vpf) = *self {
            write!(f, ": {}", vpf)?;
        }
        Ok(())
    }
}
/// The first octet of a PDU: message type, plus a set of flags that depend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOfMessage {
    pub kind: MessageKind,
    pub flags: Vec<MessageFlag>
}
impl TypeOfMessage {
    pub fn has_flag(&self, flag: MessageFlag) -> bool {
        self.flags.contains(&flag)
    }
    /// Whether the user data starts with a User Data Header.
    pub fn has_udh(&self) -> bool {
        self.has_flag(MessageFlag::UserDataHeaderIndicator)
    }
    pub fn validity_period_format(&self) -> Option<ValidityPeriodFormat> {
        self.flags.iter()
            .filter_map(|f| match *f {
                MessageFlag::ValidityPeriod(vpf) => Some(vpf),
                _ => None
            })
            .next()
    }
    pub fn as_octet(&self) -> u8 {
        use self::MessageFlag::*;
        let mut ret = match self.kind {
            MessageKind::Deliver => 0b0000_0000,
            MessageKind::Submit => 0b0000_0001
        };
        if !self.has_flag(RejectDuplicates) && !self.has_flag(MoreMessagesToSend) {
            ret |= 0b0000_0100;
        }
        for flag in self.flags.iter() {
            match *flag {
                ReplyPath => ret |= 0b1000_0000,
                UserDataHeaderIndicator => ret |= 0b0100_0000,
                StatusReportRequest | StatusReportIndication => ret |= 0b0010_0000,
                ValidityPeriod(vpf) => ret |= vpf as u8,
                RejectDuplicates | MoreMessagesToSend => {}
            }
        }
        ret
    }
}
impl From<u8> for TypeOfMessage {
    fn from(b: u8) -> Self {
        use self::MessageFlag::*;
        let kind = if (b & 0b0000_0001) == 0 {
            MessageKind::Deliver
        }
        else {
            MessageKind::Submit
        };
        let mut flags = vec![];
        if (b & 0b1000_0000) > 0 {
            flags.push(ReplyPath);
        }
        if (b & 0b0100_0000) > 0 {
            flags.push(UserDataHeaderIndicator);
        }
        match kind {
            MessageKind::Submit => {
                if (b & 0b0010_0000) > 0 {
                    flags.push(StatusReportRequest);
                }
                if let Some(vpf) = ValidityPeriodFormat::from_u8(b & 0b0001_1000) {
                    flags.push(ValidityPeriod(vpf));
                }
                if (b & 0b0000_0100) == 0 {
                    flags.push(RejectDuplicates);
                }
            },
            MessageKind::Deliver => {
                if (b & 0b0010_0000) > 0 {
                    flags.push(StatusReportIndication);
                }
                if (b & 0b0000_0100) == 0 {
                    flags.push(MoreMessagesToSend);
                }
            }
        }
        TypeOfMessage { kind, flags }
    }
}
impl fmt::Display for TypeOfMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            MessageKind::Deliver => write!(f, "SMS-DELIVER")?,
            MessageKind::Submit => write!(f, "SMS-SUBMIT")?
        }
        if !self.flags.is_empty() {
            let flags = self.flags.iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>();
            write!(f, ", Flags: {}", flags.join(", "))?;
        }
        Ok(())
    }
}
/// Kind of telematic device a message is interworking with.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum TelematicDevice {
    Implicit = 0x00,
    Telex = 0x01,
    Group3Telefax = 0x02,
    Group4Telefax = 0x03,
    VoiceTelephone = 0x04,
    Ermes = 0x05,
    NationalPaging = 0x06,
    Videotex = 0x07,
    TeletexUnspecified = 0x08,
    TeletexPspdn = 0x09,
    TeletexCspdn = 0x0A,
    TeletexAnalogPstn = 0x0B,
    TeletexDigitalIsdn = 0x0C,
    Uci = 0x0D,
    MessageHandlingFacility = 0x10,
    X400 = 0x11,
    InternetEmail = 0x12,
    GsmMobileStation = 0x1F
}
impl fmt::Display for TelematicDevice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::TelematicDevice::*;
        let text = match *self {
            Implicit => "implicit",
            Telex => "telex",
            Group3Telefax => "group 3 telefax",
            Group4Telefax => "group 4 telefax",
            VoiceTelephone => "voice telephone - speech conversion",
            Ermes => "ERMES - European Radio Messaging System",
            NationalPaging => "National Paging System",
            Videotex => "Videotex - T.100/T.101",
            TeletexUnspecified => "teletex, carrier unspecified",
            TeletexPspdn => "teletex, in PSPDN",
            TeletexCspdn => "teletex, in CSPDN",
            TeletexAnalogPstn => "teletex, in analog PSTN",
            TeletexDigitalIsdn => "teletex, in digital ISDN",
            Uci => "UCI - Universal Computer Interface, ETSI DE/PS 3 01-3",
            MessageHandlingFacility => "message handling facility known to the SC",
            X400 => "public X.400-based message handling system",
            InternetEmail => "Internet E-Mail",
            GsmMobileStation => "GSM mobile station"
        };
        write!(f, "{}", text)
    }
}
/// Protocol Identifier (TP-PID).
#[derive(Debug, Copy, Clone, PartialEq, Eq, is_enum_variant)]
pub enum ProtocolIdentifier {
    /// Plain SME-to-SME; `bitmask` should be zero for anything sent from a phone.
    SmeToSme { bitmask: u8 },
    Telematic(TelematicDevice),
    TelematicScSpecific(u8),
    TelematicReserved(u8),
    ShortMessageType(u8),
    ReturnCall,
    MeDataDownload,
    MeDepersonalization,
    SimDataDownload,
    /// A reserved value inside the `0b01` coding group.
    ReservedType(u8),
    Reserved,
    ScSpecific
}
impl ProtocolIdentifier {
    /// The unexpected SME-to-SME bits, if there are any.
    pub fn unsupported_bitmask(&self) -> Option<u8> {
        match *self {
            ProtocolIdentifier::SmeToSme { bitmask } if bitmask > 0 => Some(bitmask),
            _ => None
        }
    }
}
impl From<u8> for ProtocolIdentifier {
    fn from(b: u8) -> Self {
        use self::ProtocolIdentifier::*;
        match b & 0b1100_0000 {
            0b0000_0000 => {
                let code = b & 0b0001_1111;
                if (b & 0b0010_0000) > 0 {
                    match TelematicDevice::from_u8(code) {
                        Some(dev) => Telematic(dev),
                        None if code >= 0x18 => TelematicScSpecific(code),
                        None => TelematicReserved(code)
                    }
                }
                else {
                    SmeToSme { bitmask: code }
                }
            },
            0b0100_0000 => {
                match b & 0b0011_1111 {
                    x @ 0..=7 => ShortMessageType(x),
                    0x1F => ReturnCall,
                    0x3D => MeDataDownload,
                    0x3E => MeDepersonalization,
                    0x3F => SimDataDownload,
                    x => ReservedType(x)
                }
            },
            0b1000_0000 => Reserved,
            _ => ScSpecific
        }
    }
}
impl fmt::Display for ProtocolIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ProtocolIdentifier::*;
        match *self {
            SmeToSme { bitmask: 0 } => write!(f, "SME-to-SME protocol"),
            SmeToSme { bitmask } => write!(f, "SME-to-SME protocol (Unknown bitmask: {:b}- in case of SMS-DELIVER these indicate the SM-AL protocol being used between the SME and the MS!)", bitmask),
            Telematic(dev) => write!(f, "Telematic interworking (Type: {})", dev),
            TelematicScSpecific(_) => write!(f, "Telematic interworking (Type: SC specific value)"),
            TelematicReserved(_) => write!(f, "Telematic interworking (Type: reserved)"),
            ShortMessageType(n) => write!(f, "Short Message Type {}", n),
            ReturnCall => write!(f, "Return Call Message"),
            MeDataDownload => write!(f, "ME Data download"),
            MeDepersonalization => write!(f, "ME De-personalization Short Message"),
            SimDataDownload => write!(f, "SIM Data download"),
            ReservedType(_) | Reserved => write!(f, "reserved"),
            ScSpecific => write!(f, "SC specific use")
        }
    }
}
/// Text alphabet of the user data.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive, is_enum_variant)]
pub enum Alphabet {
    /// The GSM 7-bit default alphabet.
    Default = 0b0000_00_00,
    EightBit = 0b0000_01_00,
    Ucs2 = 0b0000_10_00,
    Reserved = 0b0000_11_00
}
impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Alphabet::*;
        match *self {
            Default => write!(f, "default"),
            EightBit => write!(f, "8bit"),
            Ucs2 => write!(f, "ucs2"),
            Reserved => write!(f, "reserved")
        }
    }
}
/// Message class: where the phone should put the message.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum MessageClass {
    /// Class 0: display immediately, don't store.
    Flash = 0b000000_00,
    Me = 0b000000_01,
    Sim = 0b000000_10,
    Te = 0b000000_11
}
impl MessageClass {
    fn description(&self) -> &'static str {
        match *self {
            MessageClass::Flash => "immediate display",
            MessageClass::Me => "ME specific",
            MessageClass::Sim => "SIM specific",
            MessageClass::Te => "TE specific"
        }
    }
}
impl fmt::Display for MessageClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MessageClass::Flash => write!(f, "Flash"),
            MessageClass::Me => write!(f, "ME"),
            MessageClass::Sim => write!(f, "SIM"),
            MessageClass::Te => write!(f, "TE")
        }
    }
}
/// What's waiting, for message waiting indications.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum MessageWaitingType {
    Voicemail = 0b000000_00,
    Fax = 0b000000_01,
    Email = 0b000000_10,
    Other = 0b000000_11
}
impl fmt::Display for MessageWaitingType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MessageWaitingType::Voicemail => write!(f, "Voicemail"),
            MessageWaitingType::Fax => write!(f, "Fax"),
            MessageWaitingType::Email => write!(f, "E-mail"),
            MessageWaitingType::Other => write!(f, "Other")
        }
    }
}
/// What to do with the text of a message waiting indication.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaitingAction {
    Discard,
    Store
}
impl fmt::Display for WaitingAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            WaitingAction::Discard => write!(f, "discard"),
            WaitingAction::Store => write!(f, "store")
        }
    }
}
/// Data Coding Scheme (TP-DCS), one variant per coding group.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataCodingScheme {
    /// General data coding (`00xx`).
    General {
        compressed: bool,
        alphabet: Alphabet,
        /// Only present if the message class bit is set.
        class: Option<MessageClass>,
        /// What the class bits say, even if the message class bit isn't set.
        class_bits: MessageClass
    },
    /// Reserved coding groups (`0100` - `1011`).
    Reserved(u8),
    /// Message waiting indication (`1100` - `1110`).
    MessageWaiting {
        action: WaitingAction,
        alphabet: Alphabet,
        active: bool,
        indication: MessageWaitingType,
        reserved_bit: bool
    },
    /// Data coding / message class (`1111`).
    DataCodingClass {
        alphabet: Alphabet,
        class: MessageClass,
        reserved_bit: bool
    }
}
impl DataCodingScheme {
    pub fn alphabet(&self) -> Alphabet {
        use self::DataCodingScheme::*;
        match *self {
            General { alphabet, .. } => alphabet,
            Reserved(_) => Alphabet::Default,
            MessageWaiting { alphabet, .. } => alphabet,
            DataCodingClass { alphabet, .. } => alphabet
        }
    }
    pub fn class(&self) -> Option<MessageClass> {
        match *self {
            DataCodingScheme::General { class, .. } => class,
            DataCodingScheme::DataCodingClass { class, .. } => Some(class),
            _ => None
        }
    }
    pub fn action(&self) -> Option<WaitingAction> {
        match *self {
            DataCodingScheme::MessageWaiting { action, .. } => Some(action),
            _ => None
        }
    }
    pub fn active(&self) -> Option<bool> {
        match *self {
            DataCodingScheme::MessageWaiting { active, .. } => Some(active),
            _ => None
        }
    }
    pub fn unread(&self) -> Option<MessageWaitingType> {
        match *self {
            DataCodingScheme::MessageWaiting { indication, .. } => Some(indication),
            _ => None
        }
    }
    /// Which reserved bit is set, if any.
    pub fn reserved_bit(&self) -> Option<ReservedBit> {
        match *self {
            DataCodingScheme::MessageWaiting { reserved_bit: true, .. } => Some(ReservedBit::MessageWaiting),
            DataCodingScheme::DataCodingClass { reserved_bit: true, .. } => Some(ReservedBit::DataCodingClass),
            _ => None
        }
    }
}
impl From<u8> for DataCodingScheme {
    fn from(b: u8) -> Self {
        let class_bits = MessageClass::from_u8(b & 0b0000_0011)
            .unwrap_or(MessageClass::Me);
        let indication = MessageWaitingType::from_u8(b & 0b0000_0011)
            .unwrap_or(MessageWaitingType::Other);
        match b & 0b1111_0000 {
            0b0000_0000 ..= 0b0011_0000 => {
                let compressed = (b & 0b0010_0000) > 0;
                let alphabet = Alphabet::from_u8(b & 0b0000_1100)
                    .unwrap_or(Alphabet::Reserved);
                let class = if (b & 0b0001_0000) > 0 {
                    Some(class_bits)
                }
                else {
                    None
                };
                DataCodingScheme::General { compressed, alphabet, class, class_bits }
            },
            group @ 0b1100_0000 ..= 0b1110_0000 => {
                let (action, alphabet) = match group {
                    0b1100_0000 => (WaitingAction::Discard, Alphabet::Default),
                    0b1101_0000 => (WaitingAction::Store, Alphabet::Default),
                    _ => (WaitingAction::Store, Alphabet::Ucs2)
                };
                DataCodingScheme::MessageWaiting {
                    action,
                    alphabet,
                    active: (b & 0b0000_1000) > 0,
                    indication,
                    reserved_bit: (b & 0b0000_0100) > 0
                }
            },
            0b1111_0000 => {
                let alphabet = if (b & 0b0000_0100) > 0 {
                    Alphabet::EightBit
                }
                else {
                    Alphabet::Default
                };
                DataCodingScheme::DataCodingClass {
                    alphabet,
                    class: class_bits,
                    reserved_bit: (b & 0b0000_1000) > 0
                }
            },
            _ => DataCodingScheme::Reserved(b)
        }
    }
}
impl From<DataCodingScheme> for u8 {
    fn from(dcs: DataCodingScheme) -> u8 {
        use self::DataCodingScheme::*;
        match dcs {
            General { compressed, alphabet, class, .. } => {
                let mut ret = alphabet as u8;
                if compressed {
                    ret |= 0b0010_0000;
                }
                if let Some(class) = class {
                    ret |= 0b0001_0000 | class as u8;
                }
                ret
            },
            Reserved(b) => b,
            MessageWaiting { action, alphabet, active, indication, reserved_bit } => {
                let mut ret = match (action, alphabet) {
                    (WaitingAction::Discard, _) => 0b1100_0000,
                    (WaitingAction::Store, Alphabet::Ucs2) => 0b1110_0000,
                    (WaitingAction::Store, _) => 0b1101_0000
                };
                if active {
                    ret |= 0b0000_1000;
                }
                if reserved_bit {
                    ret |= 0b0000_0100;
                }
                ret | indication as u8
            },
            DataCodingClass { alphabet, class, reserved_bit } => {
                let mut ret = 0b1111_0000 | class as u8;
                if alphabet == Alphabet::EightBit {
                    ret |= 0b0000_0100;
                }
                if reserved_bit {
                    ret |= 0b0000_1000;
                }
                ret
            }
        }
    }
}
impl fmt::Display for DataCodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::DataCodingScheme::*;
        match *self {
            General { compressed, alphabet, class, class_bits } => {
                write!(f, "General Data Coding groups, {}, ",
                       if compressed { "compressed" } else { "uncompressed" })?;
                match alphabet {
                    Alphabet::Default => write!(f, "default alphabet")?,
                    Alphabet::EightBit => write!(f, "8 bit data")?,
                    Alphabet::Ucs2 => write!(f, "UCS2 (16 bit)")?,
                    Alphabet::Reserved => write!(f, "reserved alphabet")?
                }
                match class {
                    Some(class) => write!(f, ", Class {} - {}", class as u8, class.description()),
                    None => write!(f, ", no message class set (but given bits would be: Class {} - {})",
                                   class_bits as u8, class_bits.description())
                }
            },
            Reserved(_) => write!(f, "Reserved coding groups"),
            MessageWaiting { action, alphabet, active, indication, reserved_bit } => {
                write!(f, "Message Waiting Indication Group: ")?;
                match (action, alphabet) {
                    (WaitingAction::Discard, _) => write!(f, "Discard Message, ")?,
                    (WaitingAction::Store, Alphabet::Ucs2) => write!(f, "Store Message, UCS2 encoding, ")?,
                    (WaitingAction::Store, _) => write!(f, "Store Message, standard encoding, ")?
                }
                write!(f, "Set Indication {}, ", if active { "Active" } else { "Inactive" })?;
                if reserved_bit {
                    write!(f, "(reserved bit set, but should not!), ")?;
                }
                match indication {
                    MessageWaitingType::Voicemail => write!(f, "Voicemail Message Waiting"),
                    MessageWaitingType::Fax => write!(f, "Fax Message Waiting"),
                    MessageWaitingType::Email => write!(f, "E-Mail Message Waiting"),
                    MessageWaitingType::Other => write!(f, "Other Message Waiting (not yet standardized)")
                }
            },
            DataCodingClass { alphabet, class, reserved_bit } => {
                write!(f, "Data coding/message class, ")?;
                if reserved_bit {
                    write!(f, "(VIOLATION: reserved bit set, but should not!), ")?;
                }
                if alphabet == Alphabet::EightBit {
                    write!(f, "8 bit data")?;
                }
                else {
                    write!(f, "Default alphabet")?;
                }
                write!(f, ", Class {} - {}", class as u8, class.description())
            }
        }
    }
}
/// TP-MR, only found in SMS-SUBMIT PDUs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MessageReference(pub u8);
impl fmt::Display for MessageReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == 0 {
            write!(f, "Mobile equipment sets reference number")
        }
        else {
            write!(f, "0x{:02X}", self.0)
        }
    }
}
/// TP-UDL, converted from characters into an octet count.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserDataLength {
    /// The raw value. For the 7-bit alphabet, this counts septets.
    pub septets: u8,
    /// How many octets of user data (header included) there should be.
    pub octets: usize,
    pub characters: usize
}
impl UserDataLength {
    pub fn new(b: u8, alphabet: Alphabet) -> Self {
        let raw = b as usize;
        let (octets, characters) = match alphabet {
            Alphabet::Default => ((raw * 7 + 7) / 8, raw),
            Alphabet::Ucs2 => (raw, raw / 2),
            _ => (raw, raw)
        };
        UserDataLength { septets: b, octets, characters }
    }
}
impl fmt::Display for UserDataLength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} characters, {} bytes", self.characters, self.octets)
    }
}
/// Number of fill bits needed after a User Data Header of `len` octets (not counting the length
/// octet itself) to get back to a septet boundary.
pub fn septet_padding(len: usize) -> u8 {
    let bits = (len + 1) * 8;
    let next_septet_start = ((bits + 6) / 7) * 7;
    (next_septet_start - bits) as u8
}
/// TP-UDHL, and the padding that follows the header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct UserDataHeaderLength {
    pub length: usize,
    /// Fill bits before the first septet; always zero for alphabets other than the 7-bit one.
    pub padding: u8
}
impl UserDataHeaderLength {
    pub fn new(b: u8, alphabet: Alphabet) -> Self {
        let length = b as usize;
        let padding = if alphabet == Alphabet::Default {
            septet_padding(length)
        }
        else {
            0
        };
        UserDataHeaderLength { length, padding }
    }
}
impl fmt::Display for UserDataHeaderLength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} bytes", self.length)
    }
}
