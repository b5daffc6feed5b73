//! Defines [`Length`], a CSS length with a unit, and the number formatting
//! used whenever a computed value is written into CSS.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// The units a [`Length`] can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Px,
    Rem,
    Em,
    Percent,
}

impl Unit {
    /// The CSS suffix for the unit.
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Rem => "rem",
            Unit::Em => "em",
            Unit::Percent => "%",
        }
    }
}

/// A CSS length, e.g. `16px` or `1.45rem`. The value is kept at full
/// precision; rounding only happens when the length is displayed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    pub fn px(value: f64) -> Length {
        Length {
            value,
            unit: Unit::Px,
        }
    }

    pub fn rem(value: f64) -> Length {
        Length {
            value,
            unit: Unit::Rem,
        }
    }

    /// Displays the length with its unit even when it's zero, as `calc()`
    /// expressions require.
    pub fn with_unit(&self) -> String {
        format!("{}{}", format_number(self.value), self.unit.as_str())
    }

    /// Converts the length into pixels. `root_px` is the font size that `rem`,
    /// `em` and `%` lengths are relative to (for the lengths produced by a
    /// [`crate::engine::TypographyEngine`], that is the theme's base font
    /// size).
    pub fn to_px(&self, root_px: f64) -> f64 {
        match self.unit {
            Unit::Px => self.value,
            Unit::Rem | Unit::Em => self.value * root_px,
            Unit::Percent => self.value / 100.0 * root_px,
        }
    }
}

impl fmt::Display for Length {
    /// Displays the length as CSS. Zero lengths are written without a unit.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let number = format_number(self.value);
        if number == "0" {
            f.write_str("0")
        } else {
            write!(f, "{}{}", number, self.unit.as_str())
        }
    }
}

impl FromStr for Length {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Length, ParseError> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic() || c == '%')
            .ok_or_else(|| ParseError::MissingUnit(s.to_owned()))?;
        let (number, unit) = s.split_at(split);
        let unit = match unit {
            "px" => Unit::Px,
            "rem" => Unit::Rem,
            "em" => Unit::Em,
            "%" => Unit::Percent,
            _ => return Err(ParseError::UnknownUnit(s.to_owned())),
        };
        Ok(Length {
            value: parse_number(number)?,
            unit,
        })
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D>(deserializer: D) -> Result<Length, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse::<Length>()
            .map_err(|e| D::Error::custom(format!("{}", e)))
    }
}

/// Formats a number for CSS: rounded to 5 decimal places, with no trailing
/// zeros and no negative zero.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100_000.0).round() / 100_000.0;
    if rounded == 0.0 {
        String::from("0")
    } else {
        format!("{}", rounded)
    }
}

/// Parses a decimal number or a fraction such as `3/5` or `-1.5/5`.
pub fn parse_number(s: &str) -> Result<f64, ParseError> {
    let s = s.trim();
    let invalid = || ParseError::InvalidNumber(s.to_owned());
    let value = match s.split_once('/') {
        None => s.parse::<f64>().map_err(|_| invalid())?,
        Some((numerator, denominator)) => {
            let numerator = numerator.trim().parse::<f64>().map_err(|_| invalid())?;
            let denominator = denominator.trim().parse::<f64>().map_err(|_| invalid())?;
            if denominator == 0.0 {
                return Err(invalid());
            }
            numerator / denominator
        }
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Represents an error parsing a [`Length`] or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Returned when the input isn't a finite decimal number or fraction.
    InvalidNumber(String),

    /// Returned when a length has no unit suffix.
    MissingUnit(String),

    /// Returned when a length's unit isn't one of `px`, `rem`, `em` or `%`.
    UnknownUnit(String),
}

impl fmt::Display for ParseError {
    /// Displays a [`ParseError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::InvalidNumber(s) => write!(f, "invalid number: `{}`", s),
            ParseError::MissingUnit(s) => write!(f, "length `{}` is missing a unit", s),
            ParseError::UnknownUnit(s) => write!(f, "length `{}` has an unknown unit", s),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_length() {
        assert_eq!("16px".parse::<Length>(), Ok(Length::px(16.0)));
        assert_eq!(" 1.5rem ".parse::<Length>(), Ok(Length::rem(1.5)));
        assert_eq!(
            "85%".parse::<Length>(),
            Ok(Length {
                value: 85.0,
                unit: Unit::Percent
            })
        );
        assert_eq!(
            "16".parse::<Length>(),
            Err(ParseError::MissingUnit("16".to_owned()))
        );
        assert_eq!(
            "16pt".parse::<Length>(),
            Err(ParseError::UnknownUnit("16pt".to_owned()))
        );
    }

    #[test]
    fn test_display_length() {
        assert_eq!(Length::rem(1.45).to_string(), "1.45rem");
        assert_eq!(Length::rem(0.0).to_string(), "0");
        assert_eq!(Length::rem(-0.000001).to_string(), "0");
        assert_eq!(Length::rem(1.0 / 3.0).to_string(), "0.33333rem");
        assert_eq!(Length::px(16.0).to_string(), "16px");
    }

    #[test]
    fn test_to_px() {
        assert_eq!(Length::rem(1.5).to_px(16.0), 24.0);
        assert_eq!(Length::px(12.0).to_px(16.0), 12.0);
        assert_eq!("50%".parse::<Length>().unwrap().to_px(16.0), 8.0);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2"), Ok(2.0));
        assert_eq!(parse_number("3/5"), Ok(0.6));
        assert_eq!(parse_number("-1.5/5"), Ok(-0.3));
        assert!(parse_number("1/0").is_err());
        assert!(parse_number("abc").is_err());
        assert!(parse_number("inf").is_err());
    }
}
