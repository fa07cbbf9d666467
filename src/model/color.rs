//! Display colors shared by projects, statuses, and timeline bars.
//!
//! Colors are persisted as `#RRGGBB` / `#RRGGBBAA` strings so the stored
//! collection stays hand-editable.

use egui::Color32;

/// Colors offered when creating a project, in picker order.
pub const PROJECT_PALETTE: [Color32; 8] = [
    Color32::from_rgb(0x63, 0x66, 0xF1), // Indigo
    Color32::from_rgb(0x8B, 0x5C, 0xF6), // Violet
    Color32::from_rgb(0xEC, 0x48, 0x99), // Pink
    Color32::from_rgb(0xEF, 0x44, 0x44), // Red
    Color32::from_rgb(0xF5, 0x9E, 0x0B), // Amber
    Color32::from_rgb(0x10, 0xB9, 0x81), // Emerald
    Color32::from_rgb(0x06, 0xB6, 0xD4), // Cyan
    Color32::from_rgb(0x3B, 0x82, 0xF6), // Blue
];

pub const SUCCESS: Color32 = Color32::from_rgb(0x10, 0xB9, 0x81);
pub const WARNING: Color32 = Color32::from_rgb(0xF5, 0x9E, 0x0B);
pub const DANGER: Color32 = Color32::from_rgb(0xEF, 0x44, 0x44);
pub const NEUTRAL: Color32 = Color32::from_rgb(0x6B, 0x72, 0x80);
pub const INFO: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);
pub const ACCENT: Color32 = Color32::from_rgb(0x63, 0x66, 0xF1);

/// Pick a palette color by index, wrapping around.
pub fn project_color(index: usize) -> Color32 {
    PROJECT_PALETTE[index % PROJECT_PALETTE.len()]
}

/// Format a color as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == 255 {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

pub fn parse_hex_color(s: &str) -> Result<Color32, String> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(format!("Invalid hex color '{}': non-ASCII characters", s));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|e| e.to_string())
    };
    match s.len() {
        6 => Ok(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Ok(Color32::from_rgba_unmultiplied(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => Err(format!("Invalid hex color '{}': expected 6 or 8 hex digits", s)),
    }
}

/// Serde helper for `Color32` stored as a hex string.
pub mod hex_color {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_hex(*color))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_hex_color(&s).map_err(serde::de::Error::custom)
    }
}
