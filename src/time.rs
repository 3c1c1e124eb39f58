//! Service centre timestamps and validity periods.
use std::fmt;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use crate::parse::HexData;

/// Swap the nibbles of a semi-octet pair and read them as a decimal number.
fn reverse_byte(b: u8) -> u8 {
    (b & 0b0000_1111) * 10 + (b >> 4)
}
/// A timestamp (TP-SCTS, or an absolute TP-VP), as it appears in the PDU.
///
/// The fields are kept as they were sent, since SMSCs don't always send valid dates; use
/// `to_datetime` to get something you can do arithmetic with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timestamp {
    /// Full year; two-digit years below 70 are taken to be in the 2000s.
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Offset from GMT, in quarter hours.
    pub offset_quarters: i8
}
impl Timestamp {
    /// Decode the 7 semi-octet pairs of a timestamp. Missing octets read as zero.
    pub fn from_octets(b: &[u8]) -> Self {
        let byte = |i: usize| b.get(i).cloned().unwrap_or(0);
        let year = reverse_byte(byte(0)) as u16;
        let year = if year < 70 { 2000 + year } else { 1900 + year };
        // the sign bit sits in the high bit of the *swapped* octet
        let tz = byte(6);
        let quarters = reverse_byte(tz & 0b1111_0111) as i8;
        let offset_quarters = if (tz & 0b0000_1000) > 0 {
            -quarters
        }
        else {
            quarters
        };
        Timestamp {
            year,
            month: reverse_byte(byte(1)),
            day: reverse_byte(byte(2)),
            hour: reverse_byte(byte(3)),
            minute: reverse_byte(byte(4)),
            second: reverse_byte(byte(5)),
            offset_quarters
        }
    }
    /// The time zone offset, if it's a sane one.
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.offset_quarters as i32 * 15 * 60)
    }
    /// The local date and time in the sender's time zone, or `None` if the fields don't
    /// describe a real date.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let naive = NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)?;
        self.offset()?.from_local_datetime(&naive).single()
    }
    /// The same instant in UTC.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        self.to_datetime().map(|d| d.with_timezone(&Utc))
    }
    /// The offset as a string, like `+03` or `-05:30`.
    pub fn zone(&self) -> String {
        let sign = if self.offset_quarters < 0 { '-' } else { '+' };
        let minutes = (self.offset_quarters as i32).abs() * 15;
        if minutes % 60 == 0 {
            format!("{}{:02}", sign, minutes / 60)
        }
        else {
            format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
        }
    }
}
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02} {:02}:{:02}:{:02} GMT {}{}",
               self.year, self.month, self.day, self.hour, self.minute, self.second,
               if self.offset_quarters < 0 { '-' } else { '+' },
               f32::from((self.offset_quarters as i16).abs() as u8) / 4.0)
    }
}
/// A relative validity period (TP-VP when TP-VPF is relative).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RelativeValidity(pub u8);
impl RelativeValidity {
    pub fn duration(&self) -> Duration {
        let v = self.0 as i64;
        match self.0 {
            0..=143 => Duration::minutes((v + 1) * 5),
            144..=167 => Duration::minutes(12 * 60 + (v - 143) * 30),
            168..=196 => Duration::days(v - 166),
            _ => Duration::weeks(v - 192)
        }
    }
}
impl fmt::Display for RelativeValidity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = self.0 as u32;
        match self.0 {
            0..=143 => write!(f, "{} minutes", (v + 1) * 5),
            144..=167 => {
                let half_hours = (v - 143) + 24;
                if half_hours % 2 == 0 {
                    write!(f, "{} hours", half_hours / 2)
                }
                else {
                    write!(f, "{}.5 hours", half_hours / 2)
                }
            },
            168..=196 => write!(f, "{} days", v - 166),
            _ => write!(f, "{} weeks", v - 192)
        }
    }
}
/// TP-VP, in whichever format TP-VPF says it's in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidityPeriod {
    Relative(RelativeValidity),
    Absolute(Timestamp),
    /// Enhanced format; the 7 octets are kept as they are.
    Enhanced(Vec<u8>)
}
impl fmt::Display for ValidityPeriod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValidityPeriod::Relative(ref r) => write!(f, "{}", r),
            ValidityPeriod::Absolute(ref ts) => write!(f, "until {}", ts),
            ValidityPeriod::Enhanced(ref b) => write!(f, "enhanced format: {}", HexData(b))
        }
    }
}
