use crate::{
    IdentityError,
    identity_error::{EmptyCallSignSnafu, ParseNumberSnafu},
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::{fmt::Display, str::FromStr};

const MMSI_MIN: u32 = 100_000_000;
const MMSI_MAX: u32 = 999_999_999;
const IMO_MIN: u32 = 1_000_000;
const IMO_MAX: u32 = 9_999_999;

/// Maritime Mobile Service Identity. Real feeds carry malformed values, so construction is
/// unchecked and format conformance is queried through [`Mmsi::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Mmsi(u32);

/// IMO ship identification number, the last digit is a check digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct ImoNumber(u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CallSign(String);

impl Mmsi {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Builds an identity from a three digit Maritime Identification Digits prefix and a six
    /// digit station number.
    pub fn from_mid(mid: u32, station: u32) -> Self {
        Self(mid * 1_000_000 + station % 1_000_000)
    }

    pub fn into_inner(self) -> u32 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        (MMSI_MIN..=MMSI_MAX).contains(&self.0)
    }
}

impl ImoNumber {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Appends the check digit to a six digit serial.
    pub fn from_serial(serial: u32) -> Self {
        let serial = (serial % 900_000) + 100_000;
        Self(serial * 10 + Self::check_digit(serial))
    }

    pub fn into_inner(self) -> u32 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        (IMO_MIN..=IMO_MAX).contains(&self.0) && Self::check_digit(self.0 / 10) == self.0 % 10
    }

    fn check_digit(serial: u32) -> u32 {
        let mut rest = serial;
        let mut sum = 0;
        for weight in 2..=7 {
            sum += (rest % 10) * weight;
            rest /= 10;
        }
        sum % 10
    }
}

impl CallSign {
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// 3 to 7 ASCII alphanumeric characters.
    pub fn is_valid(&self) -> bool {
        (3..=7).contains(&self.0.len()) && self.0.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

impl AsRef<str> for CallSign {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Mmsi {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .context(ParseNumberSnafu { value: s })
    }
}

impl FromStr for ImoNumber {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("IMO").unwrap_or(trimmed).trim();
        digits
            .parse()
            .map(Self)
            .context(ParseNumberSnafu { value: s })
    }
}

impl FromStr for CallSign {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pruned = s.replace(['_', '-', ' '], "");
        if pruned.is_empty() {
            EmptyCallSignSnafu.fail()
        } else {
            Ok(Self(pruned.to_uppercase()))
        }
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for ImoNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IMO{}", self.0)
    }
}

impl Display for CallSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imo_check_digit_matches_known_vessel() {
        // IMO 9074729 is a registered vessel number
        assert!(ImoNumber::new(9074729).is_valid());
        assert!(!ImoNumber::new(9074728).is_valid());
    }

    #[test]
    fn test_imo_from_serial_is_always_valid() {
        for serial in [0, 1, 123_456, 907_472, 999_999, 4_000_000] {
            assert!(ImoNumber::from_serial(serial).is_valid());
        }
    }

    #[test]
    fn test_mmsi_requires_nine_digits() {
        assert!(Mmsi::new(257_123_456).is_valid());
        assert!(!Mmsi::new(25_712_345).is_valid());
        assert!(Mmsi::from_mid(257, 1_234_567).is_valid());
    }

    #[test]
    fn test_call_sign_is_pruned_and_validated() {
        let call_sign: CallSign = "la-2 b3".parse().unwrap();
        assert_eq!(call_sign.as_ref(), "LA2B3");
        assert!(call_sign.is_valid());
        assert!(!CallSign::new_unchecked("AB").is_valid());
        assert!(!CallSign::new_unchecked("LA2B3C4D").is_valid());
        assert!(" - ".parse::<CallSign>().is_err());
    }

    #[test]
    fn test_imo_parses_with_prefix() {
        let imo: ImoNumber = "IMO 9074729".parse().unwrap();
        assert_eq!(imo.into_inner(), 9074729);
    }
}
