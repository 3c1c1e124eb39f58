//! Utilities for dealing with User Data Headers (used for concatenated SMS, among other things)
//! inside messages.
//!
//! [This Wikipedia article](https://en.wikipedia.org/wiki/User_Data_Header) explains what this is
//! for pretty well. Most uses of the UDH are vestigial; nowadays it's mostly useful for sending
//! concatenated SMS. We also understand WDP port addressing (which is how WAP push & friends get
//! delivered) and EMS text formatting.
use std::fmt;
use crate::errors::*;
use crate::pdu::UserDataHeaderLength;

/// Component (Information Element) of a User Data Header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdhComponent {
    /// Component identifier.
    pub id: u8,
    /// What the length octet claimed; can disagree with `data.len()` if the header was truncated.
    pub declared_len: u8,
    /// Component data.
    pub data: Vec<u8>
}
impl UdhComponent {
    /// An 8-bit-reference concatenation component.
    pub fn concatenation(reference: u8, parts: u8, sequence: u8) -> Self {
        UdhComponent {
            id: 0,
            declared_len: 3,
            data: vec![reference, parts, sequence]
        }
    }
    fn byte(&self, i: usize) -> u8 {
        self.data.get(i).cloned().unwrap_or(0)
    }
    fn check_len(&self, expected: usize, violations: &mut Vec<Violation>) -> String {
        let mut ret = String::new();
        if self.declared_len as usize != expected {
            record(violations, LengthViolation::InformationElementDeclared {
                id: self.id,
                expected,
                declared: self.declared_len as usize
            });
            ret.push_str(&format!(" (VIOLATION: This Information Element should have exactly {} bytes but says it has {} instead!)", expected, self.declared_len));
        }
        if self.data.len() != expected {
            record(violations, LengthViolation::InformationElementActual {
                id: self.id,
                expected,
                actual: self.data.len()
            });
            ret.push_str(&format!(" (VIOLATION: This Information Element should have exactly {} bytes but actually has {} instead!)", expected, self.data.len()));
        }
        ret
    }
}
/// Data about a concatenated SMS.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConcatenatedSmsData {
    /// Reference that identifies which message this is a part of - this is like an ID for the
    /// whole message.
    pub reference: u16,
    /// How many parts to the message exist (e.g. 2).
    pub parts: u8,
    /// Which part this is (e.g. 1 of 2).
    pub sequence: u8
}
/// WDP port addressing (16-bit ports).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PortAddressing {
    pub destination: u16,
    pub source: u16
}
impl PortAddressing {
    /// Name of the destination port, if it's one of the well-known ones.
    pub fn destination_name(&self) -> Option<&'static str> {
        let ret = match self.destination {
            5505 => "Ring Tone",
            5506 => "Operator Logo",
            5507 => "Group Graphic - CLI Logo",
            9200 => "Connectionless WAP browser proxy server",
            9202 => "Secure connectionless WAP browser proxy server",
            9203 => "Secure WAP Browser proxy server",
            9204 => "vCard",
            9205 => "vCalendar",
            9206 => "Secure vCard",
            9207 => "Secure vCalendar",
            _ => return None
        };
        Some(ret)
    }
}
impl fmt::Display for PortAddressing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WDP (Wireless Datagram Protocol): Destination port is {}", self.destination)?;
        if let Some(name) = self.destination_name() {
            write!(f, " ({})", name)?;
        }
        write!(f, ", source port is {}", self.source)
    }
}
static PALETTE: [&str; 16] = [
    "black", "darkGray", "darkRed", "GoldenRod", "darkGreen", "darkCyan", "darkBlue",
    "darkMagenta", "gray", "white", "red", "yellow", "green", "cyan", "blue", "magenta"
];
/// An EMS text formatting instruction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextFormat {
    /// Character offset into the text.
    pub start: u8,
    /// Number of characters covered.
    pub length: u8,
    pub format: u8,
    /// Colour octet, if present and nonzero.
    pub color: Option<u8>
}
impl<'a> From<&'a [u8]> for TextFormat {
    fn from(b: &'a [u8]) -> Self {
        let byte = |i: usize| b.get(i).cloned().unwrap_or(0);
        TextFormat {
            start: byte(0),
            length: byte(1),
            format: byte(2),
            color: b.get(3).cloned().filter(|&c| c != 0)
        }
    }
}
impl TextFormat {
    /// CSS declarations described by this instruction.
    pub fn styles(&self) -> Vec<String> {
        let mut ret = vec![];
        match self.format & 0b0000_0011 {
            1 => ret.push("text-align: center".into()),
            2 => ret.push("text-align: right".into()),
            _ => {}
        }
        match self.format & 0b0000_1100 {
            0b0100 => ret.push("font-size: large".into()),
            0b1000 => ret.push("font-size: small".into()),
            _ => {}
        }
        if (self.format & 0b0010_0000) > 0 {
            ret.push("font-style: italic".into());
        }
        if (self.format & 0b0001_0000) > 0 {
            ret.push("font-weight: bold".into());
        }
        if (self.format & 0b0100_0000) > 0 {
            ret.push("text-decoration: underline".into());
        }
        if (self.format & 0b1000_0000) > 0 {
            ret.push("text-decoration: line-through".into());
        }
        if let Some(color) = self.color {
            // foreground colour 0 (black) is the default, so it isn't written out
            let fg = (color & 0x0F) as usize;
            if fg != 0 {
                ret.push(format!("color: {}", PALETTE[fg]));
            }
            ret.push(format!("background-color: {}", PALETTE[(color >> 4) as usize]));
        }
        ret
    }
    /// Opening and closing markup.
    pub fn markup(&self) -> (String, String) {
        let styles = self.styles();
        if styles.is_empty() {
            return (String::new(), String::new());
        }
        (format!("<span style=\"{}\">", styles.join("; ")), "</span>".into())
    }
    /// Wrap the part of `original` this instruction covers wherever it first shows up in `text`.
    ///
    /// `text` is `original` with any earlier formatting already applied.
    pub fn apply(&self, text: &str, original: &str) -> String {
        let target = original.chars()
            .skip(self.start as usize)
            .take(self.length as usize)
            .collect::<String>();
        let (open, close) = self.markup();
        text.replacen(&target, &format!("{}{}{}", open, target, close), 1)
    }
}
/// A User Data Header itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserDataHeader {
    /// Length of the header (not counting the length octet).
    pub length: usize,
    /// Fill bits between the header and the first septet of 7-bit text.
    pub padding_bits: u8,
    /// Raw components; only filled in when parsing verbosely.
    pub components: Option<Vec<UdhComponent>>,
    /// The first concatenation component found, if any.
    pub concatenation: Option<ConcatenatedSmsData>,
    /// The first port addressing component found, if any.
    pub ports: Option<PortAddressing>,
    /// Whether a destination port pointed somewhere that isn't one of the well-known ones; the
    /// user data is then binary WAP data rather than text.
    pub wap: bool,
    pub formatting: Vec<TextFormat>,
    /// Description of the header; only filled in when parsing verbosely.
    pub info: Option<String>
}
impl UserDataHeader {
    /// Parse a UDH *without* the UDH Length octet at the start.
    ///
    /// This never fails; missing bytes and length mismatches get recorded in `violations`.
    pub fn parse(udhl: UserDataHeaderLength, b: &[u8], violations: &mut Vec<Violation>) -> Self {
        let mut offset = 0;
        let mut components = vec![];
        while let Some(&id) = b.get(offset) {
            offset += 1;
            let declared_len = match b.get(offset) {
                Some(&l) => l,
                None => {
                    record(violations, LengthViolation::Truncated { field: "UDH component length" });
                    break;
                }
            };
            offset += 1;
            let end = ::std::cmp::min(offset + declared_len as usize, b.len());
            let data = b[offset..end].to_owned();
            offset = end;
            trace!("UDH component {}: {:?}", id, data);
            components.push(UdhComponent { id, declared_len, data });
        }
        let mut ret = UserDataHeader {
            length: udhl.length,
            padding_bits: udhl.padding,
            ..Default::default()
        };
        let mut info = vec![];
        for comp in components.iter() {
            match comp.id {
                0 => {
                    let data = ConcatenatedSmsData {
                        reference: comp.byte(0) as _,
                        parts: comp.byte(1),
                        sequence: comp.byte(2)
                    };
                    let violation = comp.check_len(3, violations);
                    info.push(format!("Concatenated message: reference number {}, part {} of {} parts{}",
                                      data.reference, data.sequence, data.parts, violation));
                    ret.concatenation = ret.concatenation.or(Some(data));
                },
                8 => {
                    let data = ConcatenatedSmsData {
                        reference: ((comp.byte(0) as u16) << 8) | (comp.byte(1) as u16),
                        parts: comp.byte(2),
                        sequence: comp.byte(3)
                    };
                    let violation = comp.check_len(4, violations);
                    info.push(format!("Concatenated message: 16bit reference number {}, part {} of {} parts{}",
                                      data.reference, data.sequence, data.parts, violation));
                    ret.concatenation = ret.concatenation.or(Some(data));
                },
                5 => {
                    let ports = PortAddressing {
                        destination: ((comp.byte(0) as u16) << 8) | (comp.byte(1) as u16),
                        source: ((comp.byte(2) as u16) << 8) | (comp.byte(3) as u16)
                    };
                    if ports.destination_name().is_none() {
                        ret.wap = true;
                    }
                    let violation = comp.check_len(4, violations);
                    info.push(format!("{}{}", ports, violation));
                    ret.ports = ret.ports.or(Some(ports));
                },
                10 => {
                    ret.formatting.push(TextFormat::from(&comp.data as &[u8]));
                },
                x => {
                    debug!("ignoring UDH component {}", x);
                }
            }
        }
        if !ret.formatting.is_empty() {
            info.push("has EMS formatting".into());
        }
        ret.info = Some(info.join("; "));
        ret.components = Some(components);
        ret
    }
    /// Serialize a list of components to wire format, UDH Length octet included.
    pub fn encode(components: &[UdhComponent]) -> Vec<u8> {
        let mut ret = vec![];
        for comp in components.iter() {
            ret.push(comp.id);
            ret.push(comp.data.len() as u8);
            ret.extend(comp.data.iter());
        }
        let len = ret.len() as u8;
        ret.insert(0, len);
        ret
    }
    /// Apply all the EMS formatting in this header to `text`.
    pub fn apply_formatting(&self, text: String) -> String {
        if self.formatting.is_empty() {
            return text;
        }
        self.formatting.iter()
            .fold(text.clone(), |acc, fmt| fmt.apply(&acc, &text))
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::pdu::Alphabet;

    fn parse(b: &[u8], v: &mut Vec<Violation>) -> UserDataHeader {
        UserDataHeader::parse(UserDataHeaderLength::new(b.len() as u8, Alphabet::Ucs2), b, v)
    }
    #[test]
    fn concatenation_8bit() {
        let mut v = vec![];
        let udh = parse(&[0x00, 0x03, 0x2A, 0x03, 0x02], &mut v);
        assert!(v.is_empty());
        assert_eq!(udh.concatenation, Some(ConcatenatedSmsData { reference: 42, parts: 3, sequence: 2 }));
        assert_eq!(udh.info.unwrap(), "Concatenated message: reference number 42, part 2 of 3 parts");
        assert!(!udh.wap);
    }
    #[test]
    fn concatenation_16bit() {
        let mut v = vec![];
        let udh = parse(&[0x08, 0x04, 0x0A, 0xE5, 0x03, 0x01], &mut v);
        assert!(v.is_empty());
        assert_eq!(udh.concatenation, Some(ConcatenatedSmsData { reference: 2789, parts: 3, sequence: 1 }));
        assert_eq!(udh.length, 6);
    }
    #[test]
    fn first_concatenation_wins() {
        let mut v = vec![];
        let udh = parse(&[0x00, 0x03, 0x01, 0x02, 0x01, 0x00, 0x03, 0x09, 0x02, 0x02], &mut v);
        assert_eq!(udh.concatenation.unwrap().reference, 1);
        assert_eq!(udh.components.unwrap().len(), 2);
    }
    #[test]
    fn ports() {
        let mut v = vec![];
        let udh = parse(&[0x05, 0x04, 0x23, 0xF4, 0x00, 0x00], &mut v);
        assert_eq!(udh.ports, Some(PortAddressing { destination: 9204, source: 0 }));
        assert!(!udh.wap);
        assert_eq!(udh.info.unwrap(), "WDP (Wireless Datagram Protocol): Destination port is 9204 (vCard), source port is 0");
        let udh = parse(&[0x05, 0x04, 0x0B, 0x84, 0x23, 0xF0], &mut v);
        assert!(udh.wap);
        assert!(v.is_empty());
    }
    #[test]
    fn truncated_component() {
        let mut v = vec![];
        let udh = parse(&[0x00, 0x03, 0x2A], &mut v);
        assert_eq!(udh.concatenation, Some(ConcatenatedSmsData { reference: 42, parts: 0, sequence: 0 }));
        assert_eq!(v, vec![Violation::Length(LengthViolation::InformationElementActual { id: 0, expected: 3, actual: 1 })]);
        assert!(udh.info.unwrap().ends_with("(VIOLATION: This Information Element should have exactly 3 bytes but actually has 1 instead!)"));
        let mut v = vec![];
        let udh = parse(&[0x00, 0x03, 0x2A, 0x02, 0x01, 0x08], &mut v);
        assert_eq!(v, vec![Violation::Length(LengthViolation::Truncated { field: "UDH component length" })]);
        assert_eq!(udh.components.unwrap().len(), 1);
    }
    #[test]
    fn wrong_declared_length() {
        let mut v = vec![];
        parse(&[0x08, 0x03, 0x01, 0x02, 0x03], &mut v);
        assert_eq!(v, vec![
            Violation::Length(LengthViolation::InformationElementDeclared { id: 8, expected: 4, declared: 3 }),
            Violation::Length(LengthViolation::InformationElementActual { id: 8, expected: 4, actual: 3 })
        ]);
    }
    #[test]
    fn ems_styles() {
        let fmt = TextFormat::from(&[0x00u8, 0x05, 0b0011_0001][..]);
        assert_eq!(fmt.styles(), vec!["text-align: center", "font-style: italic", "font-weight: bold"]);
        let fmt = TextFormat::from(&[0x00u8, 0x05, 0x00, 0x0A][..]);
        assert_eq!(fmt.styles(), vec!["color: red", "background-color: black"]);
        let fmt = TextFormat::from(&[0x00u8, 0x05, 0x00, 0x00][..]);
        assert_eq!(fmt.color, None);
        assert_eq!(fmt.markup(), (String::new(), String::new()));
    }
    #[test]
    fn ems_apply() {
        let mut v = vec![];
        let udh = parse(&[0x0A, 0x03, 0x06, 0x05, 0x10, 0x0A, 0x03, 0x00, 0x05, 0x40], &mut v);
        assert!(v.is_empty());
        assert_eq!(udh.formatting.len(), 2);
        assert_eq!(udh.info.as_ref().unwrap(), "has EMS formatting");
        assert_eq!(udh.apply_formatting("hello world".into()),
                   "<span style=\"text-decoration: underline\">hello</span> <span style=\"font-weight: bold\">world</span>");
    }
    #[test]
    fn encode() {
        let comps = vec![UdhComponent::concatenation(0xAB, 3, 1)];
        assert_eq!(UserDataHeader::encode(&comps), vec![0x05, 0x00, 0x03, 0xAB, 0x03, 0x01]);
    }
}
