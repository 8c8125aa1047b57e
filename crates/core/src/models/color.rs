use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// A watchlist theme color, stored as a hex string.
///
/// Accepted input forms: `RGB`, `RRGGBB` and `AARRGGBB`, with or without a
/// leading `#`. The stored form is uppercase with a leading `#`, and that is
/// exactly what gets persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThemeColor(String);

impl ThemeColor {
    pub const BLUE: &'static str = "#007AFF";
    pub const GREEN: &'static str = "#34C759";
    pub const ORANGE: &'static str = "#FF9500";
    pub const RED: &'static str = "#FF3B30";
    pub const PURPLE: &'static str = "#AF52DE";
    pub const PINK: &'static str = "#FF2D55";
    pub const TEAL: &'static str = "#5AC8FA";
    pub const INDIGO: &'static str = "#5856D6";
    pub const MINT: &'static str = "#00C7BE";
    pub const CYAN: &'static str = "#32ADE6";

    /// Parse and normalize a hex color.
    pub fn from_hex(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !matches!(digits.len(), 3 | 6 | 8) {
            return Err(CoreError::Validation(format!(
                "Invalid color '{input}': expected 3, 6 or 8 hex digits"
            )));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::Validation(format!(
                "Invalid color '{input}': contains non-hex characters"
            )));
        }

        Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
    }

    /// The default theme color (blue).
    pub fn blue() -> Self {
        Self(Self::BLUE.to_string())
    }

    /// The predefined colors offered when creating or editing a watchlist.
    pub fn palette() -> Vec<(&'static str, ThemeColor)> {
        [
            ("Blue", Self::BLUE),
            ("Green", Self::GREEN),
            ("Orange", Self::ORANGE),
            ("Red", Self::RED),
            ("Purple", Self::PURPLE),
            ("Pink", Self::PINK),
            ("Teal", Self::TEAL),
            ("Indigo", Self::INDIGO),
            ("Mint", Self::MINT),
            ("Cyan", Self::CYAN),
        ]
        .into_iter()
        .map(|(name, hex)| (name, Self(hex.to_string())))
        .collect()
    }

    /// The normalized hex string, e.g. `#007AFF`.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Decode into `(r, g, b, a)` components.
    ///
    /// Short `RGB` digits are expanded (`F` → `FF`); colors without an
    /// alpha channel are fully opaque.
    pub fn rgba(&self) -> (u8, u8, u8, u8) {
        let digits = &self.0[1..];
        // Validated at construction, so every digit parses.
        let value = u32::from_str_radix(digits, 16).unwrap_or(0);
        match digits.len() {
            3 => {
                let expand = |nibble: u32| (nibble * 17) as u8;
                (
                    expand((value >> 8) & 0xF),
                    expand((value >> 4) & 0xF),
                    expand(value & 0xF),
                    255,
                )
            }
            6 => (
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
                255,
            ),
            _ => (
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
                (value >> 24) as u8,
            ),
        }
    }
}

impl Default for ThemeColor {
    fn default() -> Self {
        Self::blue()
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ThemeColor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for ThemeColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ThemeColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}
