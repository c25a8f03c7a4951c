//! Workload colors
//!
//! The four workloads produced by the simulator's analysis driver have fixed
//! colors. What happens to any other label is decided by
//! [`UnknownWorkloadPolicy`] instead of being implicit.

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb`
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = match text.strip_prefix('#') {
            Some(d) if d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()) => d,
            _ => bail!("Invalid color '{}': expected #rrggbb", text),
        };
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
        Ok(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

// matplotlib "tab10" qualitative colors
pub const TAB_BLUE: Rgb = Rgb(0x1f, 0x77, 0xb4);
pub const TAB_ORANGE: Rgb = Rgb(0xff, 0x7f, 0x0e);
pub const TAB_GREEN: Rgb = Rgb(0x2c, 0xa0, 0x2c);
pub const TAB_RED: Rgb = Rgb(0xd6, 0x27, 0x28);
pub const TAB_PURPLE: Rgb = Rgb(0x94, 0x67, 0xbd);
pub const TAB_BROWN: Rgb = Rgb(0x8c, 0x56, 0x4b);
pub const TAB_PINK: Rgb = Rgb(0xe3, 0x77, 0xc2);
pub const TAB_GRAY: Rgb = Rgb(0x7f, 0x7f, 0x7f);
pub const TAB_OLIVE: Rgb = Rgb(0xbc, 0xbd, 0x22);
pub const TAB_CYAN: Rgb = Rgb(0x17, 0xbe, 0xcf);

/// Color cycle for per-configuration line series and fallback workloads
pub const COLOR_CYCLE: [Rgb; 10] = [
    TAB_BLUE, TAB_ORANGE, TAB_GREEN, TAB_RED, TAB_PURPLE, TAB_BROWN, TAB_PINK, TAB_GRAY,
    TAB_OLIVE, TAB_CYAN,
];

/// Color of the `i`-th series in a cycled assignment
pub fn cycle_color(i: usize) -> Rgb {
    COLOR_CYCLE[i % COLOR_CYCLE.len()]
}

/// A workload label with its assigned color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaletteEntry {
    pub label: String,
    pub color: Rgb,
}

/// Ordered label to color table
///
/// Declaration order is the drawing order of palette-driven panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn color_of(&self, label: &str) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.color)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.color_of(label).is_some()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        let entry = |label: &str, color| PaletteEntry {
            label: label.to_string(),
            color,
        };
        Self::new(vec![
            entry("branch_div", TAB_BLUE),
            entry("nested_div", TAB_PURPLE),
            entry("compute_heavy", TAB_GREEN),
            entry("memory_heavy", TAB_RED),
        ])
    }
}

/// Treatment of workloads missing from the palette in palette-driven panels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownWorkloadPolicy {
    /// Leave them out without notice
    #[default]
    Exclude,
    /// Leave them out and log a warning per label
    Warn,
    /// Draw them after the palette entries using the color cycle
    Fallback,
}
