//! Turning PDU hex strings into octets, and back again.
use std::fmt;
use crate::errors::*;

named!(pub hex_octet(&[u8]) -> u8,
       map_res!(
           count!(
               one_of!("0123456789ABCDEFabcdef"),
               2
           ),
           |data: Vec<char>| {
               let st: String = data.into_iter().collect();
               u8::from_str_radix(&st, 16)
           }
       )
);

/// Wrapper for displaying a buffer of octets as an (uppercase) hex string, the way PDUs are
/// written on the wire.
#[derive(Debug)]
pub struct HexData<'a>(pub &'a [u8]);
impl<'a> fmt::Display for HexData<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in self.0.iter() {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}
impl<'a> HexData<'a> {
    /// Split a hex string into octets.
    ///
    /// Hex digits are accepted in either case. Odd-length strings, or ones containing anything
    /// that isn't a hex digit, are rejected with `PduError::InvalidFormat`.
    pub fn decode(data: &str) -> PduResult<Vec<u8>> {
        use nom::IResult;

        let data = data.as_bytes();
        if data.len() % 2 != 0 {
            return Err(PduError::InvalidFormat("odd number of hex digits"));
        }
        let mut ret = Vec::with_capacity(data.len() / 2);
        for chunk in data.chunks(2) {
            match hex_octet(chunk) {
                IResult::Done(_, octet) => ret.push(octet),
                IResult::Error(e) => return Err(e.into()),
                IResult::Incomplete(_) => return Err(PduError::InvalidFormat("truncated octet"))
            }
        }
        trace!("split {} octets", ret.len());
        Ok(ret)
    }
}
