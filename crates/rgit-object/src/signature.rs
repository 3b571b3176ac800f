use bstr::{BStr, BString, ByteSlice, ByteVec};
use chrono::Utc;

use crate::ObjectError;

/// A git date with timezone information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitDate {
    /// Seconds since Unix epoch.
    pub timestamp: i64,
    /// Timezone offset in minutes from UTC (e.g., -300 for EST).
    pub tz_offset: i32,
}

/// Git stores timezone offsets as the decimal rendering of `±HHMM`, so
/// -0500 parses to the integer -500.
fn tz_offset_to_minutes(tz: i32) -> i32 {
    let sign = if tz < 0 { -1 } else { 1 };
    let abs = tz.unsigned_abs() as i32;
    let hours = abs / 100;
    let mins = abs % 100;
    sign * (hours * 60 + mins)
}

/// Convert minutes offset to the git-style decimal representation.
fn minutes_to_tz_offset(minutes: i32) -> i32 {
    let sign = if minutes < 0 { -1 } else { 1 };
    let abs = minutes.unsigned_abs() as i32;
    let hours = abs / 60;
    let mins = abs % 60;
    sign * (hours * 100 + mins)
}

impl GitDate {
    /// Create a GitDate from a Unix timestamp and timezone offset in minutes.
    pub fn new(timestamp: i64, tz_offset_minutes: i32) -> Self {
        Self {
            timestamp,
            tz_offset: tz_offset_minutes,
        }
    }

    /// The current time, rendered with the fixed `+0000` offset every
    /// written commit carries.
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now().timestamp(),
            tz_offset: 0,
        }
    }

    /// Parse raw git format: "timestamp +/-offset" or just "timestamp".
    pub fn parse_raw(input: &str) -> Result<Self, ObjectError> {
        let input = input.trim();

        let parts: Vec<&str> = input.splitn(2, ' ').collect();

        let timestamp: i64 = parts[0]
            .parse()
            .map_err(|_| ObjectError::InvalidSignature(format!("invalid timestamp: '{}'", parts[0])))?;

        let tz_offset = if parts.len() > 1 {
            let tz_str = parts[1].trim();
            let tz_int: i32 = tz_str.parse().map_err(|_| {
                ObjectError::InvalidSignature(format!("invalid timezone: '{}'", tz_str))
            })?;
            tz_offset_to_minutes(tz_int)
        } else {
            0
        };

        Ok(Self {
            timestamp,
            tz_offset,
        })
    }
}

/// Author identity with timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: BString,
    pub email: BString,
    pub date: GitDate,
}

impl Signature {
    /// The fixed identity used when no configuration exists.
    pub fn placeholder(date: GitDate) -> Self {
        Self {
            name: BString::from("author_name"),
            email: BString::from("author_email"),
            date,
        }
    }

    /// Parse from git format: `Name <email> timestamp tz`
    ///
    /// Example: "John Doe <john@example.com> 1234567890 +0000"
    pub fn parse(input: &BStr) -> Result<Self, ObjectError> {
        let input = input.as_bytes();

        // Find the last '>' to split off the date portion.
        let gt_pos = input
            .iter()
            .rposition(|&b| b == b'>')
            .ok_or_else(|| ObjectError::InvalidSignature("missing '>'".into()))?;

        // Find the '<' for the email.
        let lt_pos = input[..gt_pos]
            .iter()
            .rposition(|&b| b == b'<')
            .ok_or_else(|| ObjectError::InvalidSignature("missing '<'".into()))?;

        // Name is everything before '<', trimmed.
        let name = input[..lt_pos].trim();

        // Email is between '<' and '>'.
        let email = &input[lt_pos + 1..gt_pos];

        // Date is everything after '>'.
        let date_str = input[gt_pos + 1..].trim();
        let date_str = std::str::from_utf8(date_str)
            .map_err(|_| ObjectError::InvalidSignature("non-UTF-8 date".into()))?;

        let date = GitDate::parse_raw(date_str)?;

        Ok(Self {
            name: BString::from(name),
            email: BString::from(email),
            date,
        })
    }

    /// Format in git's canonical format: `Name <email> timestamp tz`
    pub fn to_bytes(&self) -> BString {
        let tz = minutes_to_tz_offset(self.date.tz_offset);
        let mut out = BString::new(Vec::new());
        out.push_str(&self.name);
        out.push_str(b" <");
        out.push_str(&self.email);
        out.push_str(b"> ");
        out.push_str(format!("{} {:+05}", self.date.timestamp, tz).as_bytes());
        out
    }
}
