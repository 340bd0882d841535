//! sRGB colors as used by material tints and configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

/// An sRGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
    pub const YELLOW: Rgba = Rgba::rgb(1.0, 1.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub fn to_u8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse a CSS color: a named color or `#rgb` / `#rrggbb` / `#rrggbbaa`
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorError::MalformedHex(s.to_string()));
        }
        named(&s.to_ascii_lowercase()).ok_or_else(|| ColorError::UnknownName(s.to_string()))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgba::parse(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::parse(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_u8();
        if a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Rgba::from_u8(nibble(0)?, nibble(1)?, nibble(2)?, 255))
        }
        6 => Some(Rgba::from_u8(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Rgba::from_u8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn named(name: &str) -> Option<Rgba> {
    let (r, g, b) = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "pink" => (255, 192, 203),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "brown" => (165, 42, 42),
        "gold" => (255, 215, 0),
        _ => return None,
    };
    Some(Rgba::from_u8(r, g, b, 255))
}
