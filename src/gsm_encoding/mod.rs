//! Utilities for dealing with the (annoying) GSM 7-bit encoding (GSM 03.38), and decoding/encoding message
//! data.
//!
//! "The annoying GSM 7-bit encoding" is otherwise known as [GSM
//! 03.38](https://en.wikipedia.org/wiki/GSM_03.38), and that Wikipedia article is pretty
//! informative.
//!
//! **NB:** SMS messages that are longer than the per-message character limit are sent & received
//! as [concatenated SMS](https://en.wikipedia.org/wiki/Concatenated_SMS) messages.
//! `GsmMessageData::encode_message` splits things up for you.

use std::convert::TryFrom;
use crate::pdu::{Alphabet, septet_padding};
use crate::parse::HexData;
use crate::errors::*;

mod lookup_tables;
pub mod udh;

use self::udh::{UserDataHeader, UdhComponent};
pub use self::lookup_tables::{GsmCode, GSM_ESCAPE, default_char, extended_char, gsm_code};

/// Maximum number of septets in a single 7-bit message.
pub const MAX_SEPTETS: usize = 160;
/// Maximum number of septets in each part of a concatenated 7-bit message.
pub const MAX_SEPTETS_CONCATENATED: usize = 153;
/// Maximum number of UTF-16 code units in a single UCS2 message.
pub const MAX_UCS2_UNITS: usize = 70;
/// Maximum number of UTF-16 code units in each part of a concatenated UCS2 message.
pub const MAX_UCS2_UNITS_CONCATENATED: usize = 66;
/// Maximum number of parts in a concatenated message; the part count is a single octet.
pub const MAX_CONCATENATED_PARTS: usize = 255;

/// Decode a GSM 7-bit-encoded buffer into a string.
///
/// **Warning:** You need to unpack the string first; this method operates on unpacked septets, not
/// packed septets. See `decode_sms_7bit`.
///
/// This method is lossy, and doesn't complain about crap that it can't decode.
pub fn gsm_decode_string(input: &[u8]) -> String {
    let mut ret = String::new();
    let mut iter = input.iter();
    while let Some(&b) = iter.next() {
        if b == GSM_ESCAPE {
            if let Some(ch) = iter.next().and_then(|&b| extended_char(b)) {
                ret.push(ch);
            }
        }
        else if let Some(ch) = default_char(b) {
            ret.push(ch);
        }
    }
    ret
}
/// Tries to encode a character into the given destination buffer, returning `true` if the
/// character was successfully encoded, and `false` if the character cannot be represented in the
/// GSM 7-bit encoding.
pub fn try_gsm_encode_char(b: char, dest: &mut Vec<u8>) -> bool {
    match gsm_code(b) {
        Some(code) => {
            code.push_to(dest);
            true
        },
        None => false
    }
}
/// Tries to encode a string as GSM 7-bit, returning a buffer of **unpacked** septets iff all of
/// the data in `input` was representable in the 7-bit encoding.
///
/// **Warning:** The output of this function is unsuitable for transmission across the network;
/// you need to pack the septets first! See `encode_7bit`.
pub fn try_gsm_encode_string(input: &str) -> Option<Vec<u8>> {
    let mut ret = vec![];
    for c in input.chars() {
        if !try_gsm_encode_char(c, &mut ret) {
            return None;
        }
    }
    Some(ret)
}
/// Pack septets, shifted left by `padding` fill bits, and return them as uppercase hex.
pub fn encode_7bit(septets: &[u8], padding: u8) -> String {
    HexData(&encode_sms_7bit(septets, padding)).to_string()
}
/// Pulls septets out of packed 7-bit data.
struct SeptetReader<'a> {
    octets: &'a [u8],
    pos: usize,
    /// Leftover high bits of the last octet read.
    carry: u8,
    carry_bits: u8,
    /// Septets left to read, if TP-UDL told us.
    remaining: Option<usize>
}
impl<'a> SeptetReader<'a> {
    fn new(octets: &'a [u8], padding: u8) -> Self {
        let mut ret = SeptetReader { octets, pos: 0, carry: 0, carry_bits: 0, remaining: None };
        if padding > 0 {
            if let Some(&first) = octets.first() {
                let padding = padding.min(7);
                ret.carry = first >> padding;
                ret.carry_bits = 8 - padding;
                ret.pos = 1;
            }
        }
        ret
    }
    fn counted(octets: &'a [u8], padding: u8, septets: usize) -> Self {
        SeptetReader { remaining: Some(septets), ..Self::new(octets, padding) }
    }
    fn read(&mut self) -> Option<u8> {
        if self.carry_bits >= 7 {
            let ret = self.carry & 0b0111_1111;
            self.carry = 0;
            self.carry_bits = 0;
            // The last septet of a full octet group comes for free. Without a septet count,
            // a zero there is indistinguishable from fill at the end of the data.
            if self.pos < self.octets.len() || ret != 0 || self.remaining.is_some() {
                return Some(ret);
            }
            return None;
        }
        let octet = *self.octets.get(self.pos)?;
        self.pos += 1;
        let low_bits = 7 - self.carry_bits;
        let ret = ((octet & ((1 << low_bits) - 1)) << self.carry_bits) | self.carry;
        self.carry = octet >> low_bits;
        self.carry_bits += 1;
        Some(ret)
    }
}
impl<'a> Iterator for SeptetReader<'a> {
    type Item = u8;
    fn next(&mut self) -> Option<u8> {
        if self.remaining == Some(0) {
            return None;
        }
        let ret = self.read()?;
        if let Some(ref mut n) = self.remaining {
            *n -= 1;
        }
        Some(ret)
    }
}
/// Unpack 7-bit data into septets, skipping `padding` fill bits at the start.
///
/// A trailing zero septet made only of fill bits is dropped, since there's no telling it apart
/// from `@`; use `decode_sms_7bit_counted` when the septet count is known.
pub(crate) fn decode_sms_7bit(orig: &[u8], padding: u8) -> Vec<u8> {
    SeptetReader::new(orig, padding).collect()
}
/// Unpack at most `septets` septets of 7-bit data, skipping `padding` fill bits at the start.
pub(crate) fn decode_sms_7bit_counted(orig: &[u8], padding: u8, septets: usize) -> Vec<u8> {
    SeptetReader::counted(orig, padding, septets).collect()
}
pub(crate) fn encode_sms_7bit(orig: &[u8], padding: u8) -> Vec<u8> {
    let mut ret = vec![];
    if orig.is_empty() {
        return ret;
    }
    // Number of bits of the current septet that have already been written out.
    let mut bits_done = 0;
    if padding > 0 {
        let padding = padding.min(7);
        ret.push(orig[0] << padding);
        bits_done = 8 - padding;
    }
    for (i, data) in orig.iter().enumerate() {
        if bits_done == 7 {
            bits_done = 0;
            continue;
        }
        let mut cur = (*data & 0b0111_1111) >> bits_done;
        if let Some(n) = orig.get(i+1) {
            cur |= *n << (7 - bits_done);
        }
        ret.push(cur);
        bits_done += 1;
    }
    ret
}
/// Decode the text part of the user data (i.e. whatever comes after the header).
///
/// `septets` is how many septets of 7-bit text there are, if that's known.
///
/// 8-bit data and the reserved alphabet aren't really text, but are decoded as Latin-1 anyway
/// since there's often something legible in there.
pub fn decode_user_data(octets: &[u8], alphabet: Alphabet, padding: u8, septets: Option<usize>, violations: &mut Vec<Violation>) -> String {
    use encoding::{Encoding, DecoderTrap};
    use encoding::all::{UTF_16BE, ISO_8859_1};

    let latin1 = |b: &[u8]| {
        ISO_8859_1.decode(b, DecoderTrap::Replace)
            .unwrap_or_else(|e| e.into_owned())
    };
    match alphabet {
        Alphabet::Default => {
            let data = match septets {
                Some(n) => decode_sms_7bit_counted(octets, padding, n),
                None => decode_sms_7bit(octets, padding)
            };
            gsm_decode_string(&data)
        },
        Alphabet::Ucs2 => {
            UTF_16BE.decode(octets, DecoderTrap::Replace)
                .unwrap_or_else(|e| e.into_owned())
        },
        Alphabet::EightBit => {
            format!("(unknown binary data, try ASCII decoding) {}", latin1(octets))
        },
        Alphabet::Reserved => {
            record(violations, Violation::UnrecognizedAlphabet);
            format!("(unrecognized alphabet, try ASCII decoding) {}", latin1(octets))
        }
    }
}
/// Split `buf` into chunks of at most `max_len`, never splitting just after a unit for which
/// `leads_pair` is true.
fn split_buffers<T: Copy>(buf: Vec<T>, max_len: usize, leads_pair: impl Fn(T) -> bool) -> Vec<Vec<T>> {
    let mut ret = vec![];
    let mut cbuf = buf;
    while max_len < cbuf.len() {
        let mut at = max_len;
        if at > 1 && leads_pair(cbuf[at - 1]) {
            at -= 1;
        }
        let split = cbuf.split_off(at);
        let old = ::std::mem::replace(&mut cbuf, split);
        ret.push(old);
    }
    ret.push(cbuf);
    ret
}
fn is_high_surrogate(unit: u16) -> bool {
    unit >= 0xD800 && unit <= 0xDBFF
}
/// The 'data' portion of an SMS message - i.e. the text, for a simple message.
#[derive(Debug, Clone)]
pub struct GsmMessageData {
    pub(crate) encoding: Alphabet,
    pub(crate) udh: bool,
    pub(crate) bytes: Vec<u8>,
    pub(crate) user_data_len: u8
}
impl GsmMessageData {
    /// Get the message encoding.
    pub fn encoding(&self) -> &Alphabet {
        &self.encoding
    }
    /// Whether the data starts with a User Data Header.
    pub fn has_udh(&self) -> bool {
        self.udh
    }
    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
    /// Get the user data length.
    pub fn user_data_len(&self) -> u8 {
        self.user_data_len
    }
    /// Encode an arbitrary string of text into one, or multiple, GSM message data segments.
    ///
    /// If this function returns more than one bit of data, it means it's been split into multiple
    /// concatenated parts for you, and you'll need to send each part individually in order.
    pub fn encode_message(msg: &str) -> Vec<GsmMessageData> {
        Self::encode_message_with_reference(msg, rand::random::<u8>())
    }
    /// Like `encode_message`, but with a fixed concatenation reference.
    pub fn encode_message_with_reference(msg: &str, csms_ref: u8) -> Vec<GsmMessageData> {
        if let Some(buf) = try_gsm_encode_string(msg) {
            if buf.len() <= MAX_SEPTETS {
                let user_data_len = buf.len();
                return vec![GsmMessageData {
                    encoding: Alphabet::Default,
                    bytes: encode_sms_7bit(&buf, 0),
                    udh: false,
                    user_data_len: user_data_len as u8
                }];
            }
            // time to make a Concatenated SMS
            let bufs = split_buffers(buf, MAX_SEPTETS_CONCATENATED, |s| s == GSM_ESCAPE);
            debug!("splitting {}-character message into {} 7-bit parts", msg.chars().count(), bufs.len());
            let num_parts = part_count(bufs.len());
            bufs.into_iter()
                .zip(1..=num_parts)
                .map(|(buf, seq)| {
                    let mut ret = concatenation_header(csms_ref, num_parts, seq);
                    let padding = septet_padding(ret.len() - 1);
                    let len = ((ret.len() * 8) + padding as usize) / 7 + buf.len();
                    ret.extend(encode_sms_7bit(&buf, padding));
                    GsmMessageData {
                        encoding: Alphabet::Default,
                        bytes: ret,
                        udh: true,
                        user_data_len: len as u8
                    }
                })
                .collect()
        }
        else {
            let units = msg.encode_utf16().collect::<Vec<_>>();
            if units.len() <= MAX_UCS2_UNITS {
                let bytes = ucs2_bytes(&units);
                let user_data_len = bytes.len();
                return vec![GsmMessageData {
                    encoding: Alphabet::Ucs2,
                    bytes,
                    udh: false,
                    user_data_len: user_data_len as u8
                }];
            }
            // time to make a Concatenated SMS
            let bufs = split_buffers(units, MAX_UCS2_UNITS_CONCATENATED, is_high_surrogate);
            debug!("splitting {}-character message into {} UCS2 parts", msg.chars().count(), bufs.len());
            let num_parts = part_count(bufs.len());
            bufs.into_iter()
                .zip(1..=num_parts)
                .map(|(buf, seq)| {
                    let mut ret = concatenation_header(csms_ref, num_parts, seq);
                    ret.extend(ucs2_bytes(&buf));
                    let len = ret.len();
                    GsmMessageData {
                        encoding: Alphabet::Ucs2,
                        bytes: ret,
                        udh: true,
                        user_data_len: len as u8
                    }
                })
                .collect()
        }
    }
}
/// The part count for `len` segments. Anything past `MAX_CONCATENATED_PARTS` can't be
/// addressed by the header, and gets dropped.
fn part_count(len: usize) -> u8 {
    match u8::try_from(len) {
        Ok(n) => n,
        Err(_) => {
            warn!("message needs {} parts, only sending the first {}", len, MAX_CONCATENATED_PARTS);
            u8::MAX
        }
    }
}
fn concatenation_header(csms_ref: u8, num_parts: u8, sequence: u8) -> Vec<u8> {
    UserDataHeader::encode(&[UdhComponent::concatenation(csms_ref, num_parts, sequence)])
}
fn ucs2_bytes(units: &[u16]) -> Vec<u8> {
    let mut ret = Vec::with_capacity(units.len() * 2);
    for &unit in units.iter() {
        ret.push((unit >> 8) as u8);
        ret.push((unit & 0xFF) as u8);
    }
    ret
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::parse::HexData;

    fn septets(text: &str) -> Vec<u8> {
        try_gsm_encode_string(text).unwrap()
    }
    #[test]
    fn pack() {
        assert_eq!(encode_7bit(&septets("*110*10#"), 0), "AA580CA68AC146");
        assert_eq!(encode_7bit(&septets("hellohello"), 0), "E8329BFD4697D9EC37");
        assert_eq!(encode_7bit(&septets("[Landstraße]"), 0), "1B1E33EC26CFE9F2B0A7BCF101");
        assert_eq!(encode_7bit(&septets("The quick fox jumps over the lazy dog"), 0),
                   "54741914AFA7C76B90F98D07A9EB6DF81CF4B697E5203ABA0C6287F57910F97D06");
        assert_eq!(encode_7bit(&[], 0), "");
    }
    #[test]
    fn unpack() {
        let data = HexData::decode("E8329BFD4697D9EC37").unwrap();
        assert_eq!(gsm_decode_string(&decode_sms_7bit(&data, 0)), "hellohello");
        let data = HexData::decode("1B1E33EC26CFE9F2B0A7BCF101").unwrap();
        assert_eq!(gsm_decode_string(&decode_sms_7bit(&data, 0)), "[Landstraße]");
        let data = HexData::decode("CD21720A").unwrap();
        assert_eq!(gsm_decode_string(&decode_sms_7bit(&data, 0)), "MCHS");
        let data = HexData::decode("C8F71D14969741F977FD07").unwrap();
        assert_eq!(gsm_decode_string(&decode_sms_7bit(&data, 0)), "How are you?");
    }
    #[test]
    fn eight_septets_fill_seven_octets() {
        let data = encode_sms_7bit(&septets("abcdefgh"), 0);
        assert_eq!(data.len(), 7);
        assert_eq!(gsm_decode_string(&decode_sms_7bit(&data, 0)), "abcdefgh");
    }
    #[test]
    fn trailing_at_sign_needs_septet_count() {
        let data = encode_sms_7bit(&septets("abcdefg@"), 0);
        assert_eq!(data.len(), 7);
        assert_eq!(gsm_decode_string(&decode_sms_7bit(&data, 0)), "abcdefg");
        assert_eq!(gsm_decode_string(&decode_sms_7bit_counted(&data, 0, 8)), "abcdefg@");
        assert_eq!(gsm_decode_string(&decode_sms_7bit_counted(&data, 0, 7)), "abcdefg");
        let mut v = vec![];
        assert_eq!(decode_user_data(&data, Alphabet::Default, 0, Some(8), &mut v), "abcdefg@");
    }
    #[test]
    fn padded() {
        for padding in 1..7 {
            let data = encode_sms_7bit(&septets("hello world"), padding);
            assert_eq!(gsm_decode_string(&decode_sms_7bit(&data, padding)), "hello world");
        }
    }
    #[test]
    fn escapes() {
        assert_eq!(septets("€"), vec![GSM_ESCAPE, 0x65]);
        assert_eq!(gsm_decode_string(&[0x41, GSM_ESCAPE]), "A");
        assert_eq!(gsm_decode_string(&[GSM_ESCAPE, 0x41, 0x42]), "B");
        assert!(try_gsm_encode_string("Привет").is_none());
    }
    #[test]
    fn user_data() {
        let mut v = vec![];
        assert_eq!(decode_user_data(&[0x04, 0x1F, 0x04, 0x40], Alphabet::Ucs2, 0, None, &mut v), "Пр");
        assert_eq!(decode_user_data(b"abc", Alphabet::EightBit, 0, None, &mut v),
                   "(unknown binary data, try ASCII decoding) abc");
        assert!(v.is_empty());
        assert_eq!(decode_user_data(b"abc", Alphabet::Reserved, 0, None, &mut v),
                   "(unrecognized alphabet, try ASCII decoding) abc");
        assert_eq!(v, vec![Violation::UnrecognizedAlphabet]);
    }
    #[test]
    fn single_segment() {
        let parts = GsmMessageData::encode_message(&"a".repeat(160));
        assert_eq!(parts.len(), 1);
        assert!(!parts[0].has_udh());
        assert_eq!(parts[0].user_data_len(), 160);
        assert_eq!(parts[0].as_bytes().len(), 140);
        let parts = GsmMessageData::encode_message(&"Д".repeat(70));
        assert_eq!(parts.len(), 1);
        assert_eq!(*parts[0].encoding(), Alphabet::Ucs2);
        assert_eq!(parts[0].user_data_len(), 140);
    }
    #[test]
    fn concatenated_7bit() {
        let text = "a".repeat(161);
        let parts = GsmMessageData::encode_message_with_reference(&text, 0x42);
        assert_eq!(parts.len(), 2);
        assert_eq!(&parts[0].as_bytes()[..6], &[0x05, 0x00, 0x03, 0x42, 0x02, 0x01]);
        assert_eq!(&parts[1].as_bytes()[..6], &[0x05, 0x00, 0x03, 0x42, 0x02, 0x02]);
        assert_eq!(parts[0].user_data_len(), 7 + 153);
        assert_eq!(parts[1].user_data_len(), 7 + 8);
        let body = decode_sms_7bit(&parts[1].as_bytes()[6..], septet_padding(5));
        assert_eq!(gsm_decode_string(&body), "a".repeat(8));
    }
    #[test]
    fn concatenated_7bit_keeps_escapes_together() {
        let text = format!("{}€{}", "a".repeat(152), "b".repeat(20));
        let parts = GsmMessageData::encode_message_with_reference(&text, 1);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].user_data_len(), 7 + 152);
        let body = decode_sms_7bit(&parts[1].as_bytes()[6..], septet_padding(5));
        assert_eq!(gsm_decode_string(&body), format!("€{}", "b".repeat(20)));
    }
    #[test]
    fn concatenated_ucs2() {
        let text = "Д".repeat(140);
        let parts = GsmMessageData::encode_message_with_reference(&text, 7);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].user_data_len(), 6 + 132);
        assert_eq!(parts[2].user_data_len(), 6 + 16);
        assert_eq!(parts[2].as_bytes()[5], 3);
    }
    #[test]
    fn part_count_is_capped() {
        let parts = GsmMessageData::encode_message_with_reference(&"a".repeat(153 * 256), 1);
        assert_eq!(parts.len(), MAX_CONCATENATED_PARTS);
        assert_eq!(&parts[0].as_bytes()[..6], &[0x05, 0x00, 0x03, 0x01, 0xFF, 0x01]);
        assert_eq!(&parts[254].as_bytes()[..6], &[0x05, 0x00, 0x03, 0x01, 0xFF, 0xFF]);
        let parts = GsmMessageData::encode_message_with_reference(&"Д".repeat(66 * 300), 1);
        assert_eq!(parts.len(), MAX_CONCATENATED_PARTS);
        assert_eq!(&parts[254].as_bytes()[..6], &[0x05, 0x00, 0x03, 0x01, 0xFF, 0xFF]);
    }
    #[test]
    fn concatenated_ucs2_keeps_surrogates_together() {
        let text = format!("{}😀{}", "Д".repeat(65), "Д".repeat(10));
        let parts = GsmMessageData::encode_message_with_reference(&text, 7);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].user_data_len(), 6 + 130);
        let mut v = vec![];
        let second = decode_user_data(&parts[1].as_bytes()[6..], Alphabet::Ucs2, 0, None, &mut v);
        assert!(second.starts_with('😀'));
    }
}
