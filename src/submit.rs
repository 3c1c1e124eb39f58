//! Building SMS-SUBMIT PDUs for sending.
use bytes::{BytesMut, BufMut};
use crate::parse::HexData;
use crate::pdu::*;
use crate::gsm_encoding::GsmMessageData;

/// A message to send: who to, and what to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Destination number; a leading `+` makes it international.
    pub address: String,
    pub user_data: String
}
impl OutgoingMessage {
    pub fn new<A: Into<String>, T: Into<String>>(address: A, user_data: T) -> Self {
        OutgoingMessage {
            address: address.into(),
            user_data: user_data.into()
        }
    }
}
/// An SMS-SUBMIT PDU.
///
/// The SMSC is always left for the modem to fill in, and there's no validity period.
#[derive(Debug, Clone)]
pub struct SubmitPdu {
    pub type_of_message: TypeOfMessage,
    pub message_reference: MessageReference,
    pub destination: PduAddress,
    pub protocol_identifier: u8,
    pub data_coding: DataCodingScheme,
    pub user_data: Vec<u8>,
    pub user_data_len: u8
}
impl SubmitPdu {
    /// Make a PDU carrying one segment of message data, with a status report requested.
    pub fn make_simple_message(recipient: PduAddress, msg: GsmMessageData) -> Self {
        let mut flags = vec![MessageFlag::StatusReportRequest, MessageFlag::RejectDuplicates];
        if msg.has_udh() {
            flags.insert(0, MessageFlag::UserDataHeaderIndicator);
        }
        SubmitPdu {
            type_of_message: TypeOfMessage {
                kind: MessageKind::Submit,
                flags
            },
            message_reference: MessageReference(0),
            destination: recipient,
            protocol_identifier: 0,
            data_coding: DataCodingScheme::General {
                compressed: false,
                alphabet: *msg.encoding(),
                class: None,
                class_bits: MessageClass::Flash
            },
            user_data_len: msg.user_data_len(),
            user_data: msg.bytes
        }
    }
    pub fn as_bytes(&self) -> Vec<u8> {
        let destination = self.destination.as_bytes();
        let mut ret = BytesMut::with_capacity(6 + destination.len() + self.user_data.len());
        // no SMSC: use whatever's configured
        ret.put_u8(0);
        ret.put_u8(self.type_of_message.as_octet());
        ret.put_u8(self.message_reference.0);
        ret.put_slice(&destination);
        ret.put_u8(self.protocol_identifier);
        ret.put_u8(self.data_coding.into());
        ret.put_u8(self.user_data_len);
        ret.put_slice(&self.user_data);
        ret.to_vec()
    }
}
/// Hex-encode an address for the TP-DA field: digit count, type of address, then the number.
pub fn encode_address(address: &str) -> String {
    match address.parse::<PduAddress>() {
        Ok(addr) => HexData(&addr.as_bytes()).to_string(),
        Err(e) => match e {}
    }
}
/// Turn a message into one or more PDU hex strings, ready for `AT+CMGS`.
pub fn stringify(message: &OutgoingMessage) -> Vec<String> {
    stringify_segments(message, GsmMessageData::encode_message(&message.user_data))
}
/// Like `stringify`, but with a fixed concatenation reference.
pub fn stringify_with_reference(message: &OutgoingMessage, csms_ref: u8) -> Vec<String> {
    stringify_segments(message, GsmMessageData::encode_message_with_reference(&message.user_data, csms_ref))
}
fn stringify_segments(message: &OutgoingMessage, segments: Vec<GsmMessageData>) -> Vec<String> {
    let destination: PduAddress = match message.address.parse() {
        Ok(d) => d,
        Err(e) => match e {}
    };
    debug!("encoding message to {} as {} PDU(s)", message.address, segments.len());
    segments.into_iter()
        .map(|seg| {
            let pdu = SubmitPdu::make_simple_message(destination.clone(), seg);
            HexData(&pdu.as_bytes()).to_string()
        })
        .collect()
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::message::parse;
    use crate::gsm_encoding::udh::ConcatenatedSmsData;

    #[test]
    fn addresses() {
        assert_eq!(encode_address("3289287791"), "0A812398827719");
        assert_eq!(encode_address("+393289287791"), "0C91932398827719");
        assert_eq!(encode_address("347101010"), "098143171010F0");
        assert_eq!(encode_address("+39347101010"), "0B919343171010F0");
    }
    #[test]
    fn simple_7bit() {
        let pdus = stringify(&OutgoingMessage::new("+46708251358", "hellohello"));
        assert_eq!(pdus, vec!["0021000B916407281553F800000AE8329BFD4697D9EC37".to_string()]);
        let pdu = parse(&pdus[0], false).unwrap();
        assert!(pdu.is_submit());
        assert!(pdu.type_of_message.has_flag(MessageFlag::StatusReportRequest));
        assert_eq!(pdu.address.number, "46708251358");
        assert_eq!(pdu.text(), Some("hellohello"));
        assert!(pdu.violations.is_empty());
    }
    #[test]
    fn simple_ucs2() {
        let pdus = stringify(&OutgoingMessage::new("79031111111", "Привет"));
        assert_eq!(pdus.len(), 1);
        assert!(pdus[0].starts_with("0021000B819730111111F100080C041F04400438"));
        let pdu = parse(&pdus[0], false).unwrap();
        assert_eq!(pdu.data_coding.alphabet(), Alphabet::Ucs2);
        assert_eq!(pdu.text(), Some("Привет"));
    }
    #[test]
    fn concatenated_ucs2() {
        let parts = [
            "Полипропиленовые конденсаторы радиальные, резисторы, конденсаторы,",
            " радиаторы, предохранители, пассивные компоненты.  Заказ и оплата ",
            "онлайн, доставка."
        ];
        let text = parts.concat();
        let pdus = stringify_with_reference(&OutgoingMessage::new("+79031111111", text), 0x5A);
        assert_eq!(pdus.len(), 3);
        for (i, hex) in pdus.iter().enumerate() {
            assert!(hex.starts_with("0061"));
            let pdu = parse(hex, false).unwrap();
            assert!(pdu.type_of_message.has_udh());
            assert_eq!(pdu.user_data_header.concatenation, Some(ConcatenatedSmsData {
                reference: 0x5A,
                parts: 3,
                sequence: i as u8 + 1
            }));
            assert_eq!(pdu.text(), Some(parts[i]));
            assert!(pdu.violations.is_empty());
        }
    }
    #[test]
    fn concatenated_7bit() {
        let text = "The quick fox jumps over the lazy dog. ".repeat(5);
        let pdus = stringify_with_reference(&OutgoingMessage::new("12345", text.as_str()), 1);
        assert_eq!(pdus.len(), 2);
        let texts = pdus.iter()
            .map(|p| parse(p, false).unwrap())
            .inspect(|p| assert!(p.violations.is_empty()))
            .map(|p| p.text().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(texts[0].chars().count(), 153);
        assert_eq!(texts.concat(), text);
    }
    #[test]
    fn trailing_at_sign() {
        for text in &["abcdefg@", "@@@@@@@@", "hello world, how are you doing@"] {
            let pdus = stringify(&OutgoingMessage::new("+46708251358", *text));
            assert_eq!(parse(&pdus[0], false).unwrap().text(), Some(*text));
        }
        let text = format!("{}@", "a".repeat(305));
        let pdus = stringify_with_reference(&OutgoingMessage::new("1", text.as_str()), 3);
        assert_eq!(pdus.len(), 2);
        let texts = pdus.iter()
            .map(|p| parse(p, false).unwrap().text().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(texts.concat(), text);
    }
    #[test]
    fn segment_counts() {
        let count = |s: &str| stringify(&OutgoingMessage::new("1", s)).len();
        assert_eq!(count(""), 1);
        assert_eq!(count(&"x".repeat(160)), 1);
        assert_eq!(count(&"x".repeat(306)), 2);
        assert_eq!(count(&"x".repeat(307)), 3);
        assert_eq!(count(&"Ж".repeat(70)), 1);
        assert_eq!(count(&"Ж".repeat(132)), 2);
        assert_eq!(count(&"Ж".repeat(133)), 3);
    }
}
