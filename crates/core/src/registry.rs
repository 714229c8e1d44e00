//! Windows registry value model shared by the export dialects.
//!
//! A registry item carries a key path, an optional value name, a value type
//! and the raw value data (the item's `content`). The export dialects only
//! distinguish two logical shapes of data: a 32-bit DWORD, rendered as eight
//! hex digits, and everything else, rendered as a quoted string.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Value type names accepted in `registryType`.
pub const REGISTRY_TYPES: &[&str] = &[
    "REG_SZ",
    "REG_DWORD",
    "REG_QWORD",
    "REG_BINARY",
    "REG_MULTI_SZ",
    "REG_EXPAND_SZ",
];

/// Value names that address the key's default (unnamed) value.
pub const DEFAULT_VALUE_NAMES: &[&str] = &["@", "(Default)"];

// ---------------------------------------------------------------------------
// Value type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RegistryValueType {
    #[default]
    String,
    Dword,
    Qword,
    Binary,
    MultiString,
    ExpandString,
}

impl RegistryValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistryValueType::String => "REG_SZ",
            RegistryValueType::Dword => "REG_DWORD",
            RegistryValueType::Qword => "REG_QWORD",
            RegistryValueType::Binary => "REG_BINARY",
            RegistryValueType::MultiString => "REG_MULTI_SZ",
            RegistryValueType::ExpandString => "REG_EXPAND_SZ",
        }
    }

    /// Lenient parse used when reading stored items: unknown or missing
    /// types fall back to `REG_SZ`.
    pub fn from_stored(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for RegistryValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistryValueType {
    type Err = CoreError;

    /// Accepts canonical names (`REG_DWORD`) as well as the bare short form
    /// (`DWORD`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("REG_").unwrap_or(&upper);
        match short {
            "SZ" => Ok(RegistryValueType::String),
            "DWORD" => Ok(RegistryValueType::Dword),
            "QWORD" => Ok(RegistryValueType::Qword),
            "BINARY" => Ok(RegistryValueType::Binary),
            "MULTI_SZ" => Ok(RegistryValueType::MultiString),
            "EXPAND_SZ" => Ok(RegistryValueType::ExpandString),
            _ => Err(CoreError::Validation(format!(
                "Invalid registry type '{s}'. Must be one of: {}",
                REGISTRY_TYPES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// The value name half of a key/value declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueName<'a> {
    Default,
    Named(&'a str),
}

impl<'a> ValueName<'a> {
    pub fn parse(name: &'a str) -> Self {
        if DEFAULT_VALUE_NAMES.contains(&name) {
            ValueName::Default
        } else {
            ValueName::Named(name)
        }
    }
}

/// Logical value data after type interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryData<'a> {
    Dword(u32),
    String(&'a str),
}

/// A borrowed view of one registry key/value declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry<'a> {
    pub path: &'a str,
    pub name: ValueName<'a>,
    pub value_type: RegistryValueType,
    pub raw: &'a str,
}

impl<'a> RegistryEntry<'a> {
    pub fn data(&self) -> RegistryData<'a> {
        match self.value_type {
            RegistryValueType::Dword => RegistryData::Dword(parse_dword(self.raw)),
            _ => RegistryData::String(self.raw),
        }
    }
}

// ---------------------------------------------------------------------------
// DWORD helpers
// ---------------------------------------------------------------------------

/// Interpret DWORD value data the way a user types it into a form.
///
/// Accepts an optional sign, a `0x` hex prefix, or leading decimal digits
/// (trailing garbage is ignored). Anything unparseable yields `0`. Values
/// outside the 32-bit range wrap, so `-1` becomes `0xffffffff`.
pub fn parse_dword(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let magnitude = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        let digits: String = hex.chars().take_while(char::is_ascii_hexdigit).collect();
        i64::from_str_radix(&digits, 16).unwrap_or(0)
    } else {
        let digits: String = unsigned.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<i64>().unwrap_or(0)
    };

    let value = if negative { -magnitude } else { magnitude };
    value as u32
}

/// Render a DWORD as eight zero-padded lower-case hex digits.
pub fn dword_hex(value: u32) -> String {
    format!("{value:08x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dword_255_renders_000000ff() {
        assert_eq!(dword_hex(parse_dword("255")), "000000ff");
    }

    #[test]
    fn dword_parsing_is_lenient() {
        assert_eq!(parse_dword(" 1 "), 1);
        assert_eq!(parse_dword("0x1F"), 31);
        assert_eq!(parse_dword("12abc"), 12);
        assert_eq!(parse_dword("abc"), 0);
        assert_eq!(parse_dword(""), 0);
        assert_eq!(parse_dword("-1"), u32::MAX);
    }

    #[test]
    fn value_type_accepts_short_forms() {
        assert_eq!(
            "DWORD".parse::<RegistryValueType>().unwrap(),
            RegistryValueType::Dword
        );
        assert_eq!(
            "reg_expand_sz".parse::<RegistryValueType>().unwrap(),
            RegistryValueType::ExpandString
        );
        assert!("REG_NONE".parse::<RegistryValueType>().is_err());
        assert_eq!(
            RegistryValueType::from_stored(None),
            RegistryValueType::String
        );
    }

    #[test]
    fn default_value_names() {
        assert_eq!(ValueName::parse("@"), ValueName::Default);
        assert_eq!(ValueName::parse("(Default)"), ValueName::Default);
        assert_eq!(ValueName::parse("Version"), ValueName::Named("Version"));
    }

    #[test]
    fn only_dword_is_numeric() {
        let entry = RegistryEntry {
            path: r"HKEY_CURRENT_USER\Software\App",
            name: ValueName::Named("Count"),
            value_type: RegistryValueType::Qword,
            raw: "255",
        };
        assert_eq!(entry.data(), RegistryData::String("255"));

        let dword = RegistryEntry {
            value_type: RegistryValueType::Dword,
            ..entry
        };
        assert_eq!(dword.data(), RegistryData::Dword(255));
    }
}
