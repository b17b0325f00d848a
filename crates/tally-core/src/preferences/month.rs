//! Calendar month values (`YYYY-MM`)

use crate::error::TallyError;
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a month, rejecting out-of-range values
    pub fn new(year: i32, month: u32) -> Result<Self, TallyError> {
        if !(1..=12).contains(&month) {
            return Err(TallyError::validation_field(
                format!("Month must be between 01 and 12, got {}", month),
                "month",
            ));
        }
        if !(1000..=9999).contains(&year) {
            return Err(TallyError::validation_field(
                format!("Year must have four digits, got {}", year),
                "month",
            ));
        }
        Ok(Self { year, month })
    }

    /// The current calendar month in local time
    pub fn current() -> Self {
        let now = Local::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    /// Four-digit year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1-12
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month before this one
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TallyError::validation_field("Month must be YYYY-MM", "month");
        let s = s.trim();
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        if !bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let year: i32 = s[..4].parse().map_err(|_| invalid())?;
        let month: u32 = s[5..].parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = TallyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(month: YearMonth) -> Self {
        month.to_string()
    }
}
