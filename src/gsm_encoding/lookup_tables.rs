//! The GSM 03.38 default alphabet and its extension table.
//!
//! Letters and digits sit at their ASCII positions and aren't listed in the tables below.
use std::collections::HashMap;
use std::sync::OnceLock;

/// Septet value that switches the next septet over to the extension table.
pub const GSM_ESCAPE: u8 = 0x1B;

pub static GSM_EXTENDED_ENCODING_TABLE: [(char, u8); 10] = [
    // Really FORM FEED; there's nothing useful to show for that, so it decodes as a newline.
    ('\n', 0x0A),
    ('^', 0x14),
    ('{', 0x28),
    ('}', 0x29),
    ('\\', 0x2F),
    ('[', 0x3C),
    ('~', 0x3D),
    (']', 0x3E),
    ('|', 0x40),
    ('\u{20AC}', 0x65)
];
pub static GSM_ENCODING_TABLE: [(char, u8); 65] = [
    ('@', 0x00),
    ('\u{00A3}', 0x01),
    ('$', 0x02),
    ('\u{00A5}', 0x03),
    ('è', 0x04),
    ('é', 0x05),
    ('ù', 0x06),
    ('ì', 0x07),
    ('ò', 0x08),
    ('\u{00C7}', 0x09),
    ('\n', 0x0a),
    ('\u{00D8}', 0x0b),
    ('\u{00F8}', 0x0c),
    ('\r', 0x0d),
    ('\u{00C5}', 0x0e),
    ('\u{00E5}', 0x0f),
    ('\u{0394}', 0x10),
    ('_', 0x11),
    ('\u{03A6}', 0x12),
    ('Γ', 0x13),
    ('Λ', 0x14),
    ('Ω', 0x15),
    ('Π', 0x16),
    ('Ψ', 0x17),
    ('Σ', 0x18),
    ('Θ', 0x19),
    ('Ξ', 0x1A),
    ('Æ', 0x1C),
    ('æ', 0x1D),
    ('ß', 0x1E),
    ('É', 0x1F),
    (' ', 0x20),
    ('!', 0x21),
    ('"', 0x22),
    ('#', 0x23),
    ('¤', 0x24),
    ('%', 0x25),
    ('&', 0x26),
    ('\'', 0x27),
    ('(', 0x28),
    (')', 0x29),
    ('*', 0x2A),
    ('+', 0x2B),
    (',', 0x2C),
    ('-', 0x2D),
    ('.', 0x2E),
    ('/', 0x2F),
    (':', 0x3A),
    (';', 0x3B),
    ('<', 0x3C),
    ('=', 0x3D),
    ('>', 0x3E),
    ('?', 0x3F),
    ('¡', 0x40),
    ('Ä', 0x5B),
    ('Ö', 0x5C),
    ('Ñ', 0x5D),
    ('Ü', 0x5E),
    ('§', 0x5F),
    ('¿', 0x60),
    ('ä', 0x7B),
    ('ö', 0x7C),
    ('ñ', 0x7D),
    ('ü', 0x7E),
    ('à', 0x7F)
];

/// How a character is represented in the 7-bit alphabet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GsmCode {
    /// A single septet from the default table.
    Default(u8),
    /// `GSM_ESCAPE`, followed by this septet from the extension table.
    Extended(u8)
}
impl GsmCode {
    /// Append the septet(s) for this code to `dest`.
    pub fn push_to(self, dest: &mut Vec<u8>) {
        match self {
            GsmCode::Default(b) => dest.push(b),
            GsmCode::Extended(b) => {
                dest.push(GSM_ESCAPE);
                dest.push(b);
            }
        }
    }
}

static DEFAULT_ALPHABET: OnceLock<[Option<char>; 128]> = OnceLock::new();
static EXTENSION_TABLE: OnceLock<[Option<char>; 128]> = OnceLock::new();
static REVERSE_MAP: OnceLock<HashMap<char, GsmCode>> = OnceLock::new();

fn default_alphabet() -> &'static [Option<char>; 128] {
    DEFAULT_ALPHABET.get_or_init(|| {
        let mut ret = [None; 128];
        for b in (b'A'..=b'Z').chain(b'a'..=b'z').chain(b'0'..=b'9') {
            ret[b as usize] = Some(b as char);
        }
        for &(ch, val) in GSM_ENCODING_TABLE.iter() {
            ret[val as usize] = Some(ch);
        }
        ret
    })
}
fn extension_table() -> &'static [Option<char>; 128] {
    EXTENSION_TABLE.get_or_init(|| {
        let mut ret = [None; 128];
        for &(ch, val) in GSM_EXTENDED_ENCODING_TABLE.iter() {
            ret[val as usize] = Some(ch);
        }
        ret
    })
}
fn reverse_map() -> &'static HashMap<char, GsmCode> {
    REVERSE_MAP.get_or_init(|| {
        let mut ret = HashMap::new();
        for &(ch, val) in GSM_EXTENDED_ENCODING_TABLE.iter() {
            ret.insert(ch, GsmCode::Extended(val));
        }
        // Characters present in both tables are sent from the default one.
        for (val, ch) in default_alphabet().iter().enumerate() {
            if let Some(ch) = *ch {
                ret.insert(ch, GsmCode::Default(val as u8));
            }
        }
        ret
    })
}

/// Look up a septet in the default alphabet. `GSM_ESCAPE` has no character of its own.
pub fn default_char(septet: u8) -> Option<char> {
    default_alphabet().get(septet as usize).and_then(|c| *c)
}
/// Look up a septet (one that followed `GSM_ESCAPE`) in the extension table.
pub fn extended_char(septet: u8) -> Option<char> {
    extension_table().get(septet as usize).and_then(|c| *c)
}
/// Find out how to represent `ch` in the 7-bit alphabet, if at all.
pub fn gsm_code(ch: char) -> Option<GsmCode> {
    reverse_map().get(&ch).cloned()
}
