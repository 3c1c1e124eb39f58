//! A human-readable, line-by-line rendering of a PDU.
use crate::errors::*;
use crate::message::{parse, ParsedPdu};

fn line<T: ToString>(ret: &mut Vec<String>, label: &str, value: T) {
    ret.push(format!("{}\t{}", label, value.to_string()));
}
/// Render an already-parsed PDU. Address info lines are only there if it was parsed verbosely.
pub fn describe(pdu: &ParsedPdu) -> Vec<String> {
    let mut ret = vec![];
    if let Some(ref smsc) = pdu.sms_centre {
        line(&mut ret, "SMSC number", &smsc.number);
        if let Some(toa) = smsc.type_of_address {
            line(&mut ret, "SMSC number info", toa);
        }
    }
    line(&mut ret, "PDU Type", &pdu.type_of_message);
    if let Some(mr) = pdu.message_reference {
        line(&mut ret, "TP Message Reference", mr);
    }
    line(&mut ret, "Number", &pdu.address.number);
    if let Some(toa) = pdu.address.type_of_address {
        line(&mut ret, "Number info", toa);
    }
    line(&mut ret, "Protocol Identifier", pdu.protocol_identifier);
    line(&mut ret, "Data Coding Scheme", pdu.data_coding);
    if let Some(ref ts) = pdu.service_centre_timestamp {
        line(&mut ret, "Service Centre Time Stamp", ts);
    }
    if let Some(ref vp) = pdu.validity_period {
        line(&mut ret, "Validity Period", vp);
    }
    line(&mut ret, "User Data Length", pdu.user_data_length);
    if pdu.type_of_message.has_udh() {
        line(&mut ret, "User Data Header Length", format!("{} bytes", pdu.user_data_header.length));
        if let Some(ref info) = pdu.user_data_header.info {
            line(&mut ret, "User Data Header", info);
        }
    }
    line(&mut ret, "User Data", &pdu.user_data);
    for v in pdu.violations.iter() {
        line(&mut ret, "VIOLATION", v);
    }
    ret
}
/// Decode a PDU hex string into `label\tvalue` lines.
pub fn decode(pdu: &str) -> PduResult<Vec<String>> {
    Ok(describe(&parse(pdu, true)?))
}
