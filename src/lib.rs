//! The `gsm-pdu` library decodes and encodes SMS messages in the GSM 03.40 / 3GPP 23.040 PDU
//! format - the hex strings you get out of `AT+CMGL` and feed into `AT+CMGS` when talking to a
//! modem in PDU mode.
//!
//! Decoding is forgiving. Real SMSCs and phones send all sorts of slightly wrong PDUs, so apart
//! from strings that aren't hex at all, everything decodes to *something*; whatever didn't look
//! right is listed in `ParsedPdu::violations`.
//!
//! ```ignore
//! let pdu = gsm_pdu::parse("0011000B916407281553F80000AA0AE8329BFD4697D9EC37", false)?;
//! assert_eq!(pdu.text(), Some("hellohello"));
//!
//! let out = gsm_pdu::stringify(&gsm_pdu::OutgoingMessage::new("+46708251358", "hellohello"));
//! ```

#[macro_use] extern crate log;
#[macro_use] extern crate failure_derive;
#[macro_use] extern crate nom;
#[macro_use] extern crate derive_is_enum_variant;
#[macro_use] extern crate num_derive;

pub mod errors;
pub mod gsm_encoding;
pub mod pdu;
pub mod time;
pub mod message;
pub mod submit;
pub mod text;
mod parse;

pub use crate::errors::{PduError, PduResult, Violation};
pub use crate::parse::HexData;
pub use crate::message::{parse, ParsedPdu, Address, UserData};
pub use crate::text::decode;
pub use crate::submit::{stringify, encode_address, OutgoingMessage};
pub use crate::gsm_encoding::{encode_7bit, try_gsm_encode_string as try_7bit};
