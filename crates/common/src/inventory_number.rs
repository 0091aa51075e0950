//! Sequential inventory numbers of the form `SMU` + 2-digit year + 4-digit sequence.
//!
//! The sequence restarts at `0001` every two-digit year. Numbers are never
//! reused or renumbered, so deleting a device leaves a gap.

use chrono::{Datelike, Utc};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::{Error, Result};

pub const PREFIX: &str = "SMU";

/// Highest sequence that fits the fixed-width suffix
pub const MAX_SEQUENCE: u32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InventoryNumber {
    year: u8,
    sequence: u32,
}

impl InventoryNumber {
    pub fn new(year: u8, sequence: u32) -> Result<Self> {
        if year > 99 {
            return Err(Error::Validation(format!(
                "inventory year must be two digits, got {year}"
            )));
        }
        if sequence > MAX_SEQUENCE {
            return Err(Error::SequenceExhausted { year });
        }
        Ok(Self { year, sequence })
    }

    pub fn year(&self) -> u8 {
        self.year
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for InventoryNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{:02}{:04}", self.year, self.sequence)
    }
}

impl FromStr for InventoryNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("invalid inventory number: {s}"));

        let digits = s.strip_prefix(PREFIX).ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year = digits[..2].parse().map_err(|_| invalid())?;
        let sequence = digits[2..].parse().map_err(|_| invalid())?;
        Self::new(year, sequence)
    }
}

/// Two-digit year used for allocation (wraps every century)
pub fn current_year() -> u8 {
    Utc::now().year().rem_euclid(100) as u8
}

/// Compute the inventory number following the highest one issued in `year`.
///
/// Only well-formed numbers of the requested year take part; anything else is
/// ignored. Running past [`MAX_SEQUENCE`] fails instead of widening the suffix.
pub fn next_inventory_number<'a, I>(existing: I, year: u8) -> Result<InventoryNumber>
where
    I: IntoIterator<Item = &'a str>,
{
    let year_prefix = format!("{PREFIX}{year:02}");

    let last = existing
        .into_iter()
        .filter(|number| number.starts_with(&year_prefix))
        .filter_map(|number| match number.parse::<InventoryNumber>() {
            Ok(parsed) => Some(parsed.sequence()),
            Err(_) => {
                warn!("Ignoring malformed inventory number: {}", number);
                None
            }
        })
        .max()
        .unwrap_or(0);

    if last >= MAX_SEQUENCE {
        return Err(Error::SequenceExhausted { year });
    }

    InventoryNumber::new(year, last + 1)
}
