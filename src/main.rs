//! `pdu-tool`: decode PDUs, or encode messages, one per line on stdin.
//!
//! A line that's just hex gets decoded. A line of the form `recipient;message` gets encoded
//! into one or more SMS-SUBMIT PDUs. Set `RUST_LOG=gsm_pdu=debug` for the gory details.

#[macro_use] extern crate log;

use std::io::prelude::*;
use gsm_pdu::{decode, stringify, OutgoingMessage};

fn main() {
    if let Err(e) = env_logger::init() {
        eprintln!("failed to set up logging: {}", e);
    }
    println!("Input a PDU to decode it, or data in the form recipient;message to encode it");
    let stdin = ::std::io::stdin();
    let lock = stdin.lock();
    for ln in lock.lines() {
        let ln = match ln {
            Ok(l) => l,
            Err(e) => {
                error!("failed to read from stdin: {}", e);
                break;
            }
        };
        let ln = ln.trim();
        if ln.is_empty() {
            continue;
        }
        if let Some(idx) = ln.find(';') {
            let msg = OutgoingMessage::new(&ln[..idx], &ln[idx+1..]);
            println!("Sending \"{}\" to {}...", msg.user_data, msg.address);
            for pdu in stringify(&msg) {
                // AT+CMGS wants the length without the (empty) SMSC part
                println!("AT+CMGS={}", pdu.len() / 2 - 1);
                println!("{}", pdu);
            }
            continue;
        }
        match decode(ln) {
            Ok(lines) => {
                for l in lines {
                    println!("{}", l);
                }
            },
            Err(e) => println!("Error: {}", e)
        }
    }
}
