//! Field colorization.
//!
//! Three modes, all wrapping field strings in escape codes:
//! - per-field palette: every field role has a fixed color
//! - attribute threshold: one numeric attribute (age, cpu, mem) drives
//!   the command field's color; other fields stay plain
//! - rainbow: whole lines painted per character (256-color terminals)
//!
//! Palettes are data. `ansi8` serves 8-16 color terminals; a 256-color
//! palette is chosen by host OS otherwise. Colors are never emitted
//! when stdout is not a TTY unless the user forces color on.

use crate::collect::ProcessRecord;
use crate::options::{ColorAttr, ColorMode, DisplayOptions};

const RESET: &str = "\u{1b}[0m";

/// Color roles for the renderer's field classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Age,
    Args,
    Command,
    CompactIndicator,
    CompactThread,
    Connector,
    Cpu,
    Memory,
    NumThreads,
    Owner,
    OwnerTransition,
    PidPgid,
    Prefix,
    Default,
}

/// A role-to-escape-code table.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    name: &'static str,
    is_256: bool,
}

/// 8/16-color palette.
const ANSI8: Palette = Palette {
    name: "ansi8",
    is_256: false,
};

/// 256-color palette (single table; the host-OS split only shifts
/// hues, not structure).
const INDEXED: Palette = Palette {
    name: "indexed256",
    is_256: true,
};

impl Palette {
    /// Pick the palette for the host terminal.
    pub fn detect(colors: u16) -> &'static Palette {
        if colors >= 256 {
            &INDEXED
        } else {
            &ANSI8
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Escape code for a role.
    pub fn code(&self, role: Role) -> &'static str {
        if self.is_256 {
            match role {
                Role::Age => "\u{1b}[38;5;135m",
                Role::Args => "\u{1b}[38;5;245m",
                Role::Command => "\u{1b}[38;5;231m",
                Role::CompactIndicator => "\u{1b}[38;5;214m",
                Role::CompactThread => "\u{1b}[38;5;114m",
                Role::Connector => "\u{1b}[38;5;240m",
                Role::Cpu => "\u{1b}[38;5;203m",
                Role::Memory => "\u{1b}[38;5;112m",
                Role::NumThreads => "\u{1b}[38;5;75m",
                Role::Owner => "\u{1b}[38;5;80m",
                Role::OwnerTransition => "\u{1b}[38;5;196m",
                Role::PidPgid => "\u{1b}[38;5;222m",
                Role::Prefix => "\u{1b}[38;5;240m",
                Role::Default => "\u{1b}[38;5;250m",
            }
        } else {
            match role {
                Role::Age => "\u{1b}[35m",
                Role::Args => "\u{1b}[37m",
                Role::Command => "\u{1b}[1m",
                Role::CompactIndicator => "\u{1b}[33m",
                Role::CompactThread => "\u{1b}[32m",
                Role::Connector => "\u{1b}[90m",
                Role::Cpu => "\u{1b}[31m",
                Role::Memory => "\u{1b}[32m",
                Role::NumThreads => "\u{1b}[34m",
                Role::Owner => "\u{1b}[36m",
                Role::OwnerTransition => "\u{1b}[31m",
                Role::PidPgid => "\u{1b}[33m",
                Role::Prefix => "\u{1b}[90m",
                Role::Default => "\u{1b}[39m",
            }
        }
    }

    /// Escape code for a threshold band.
    fn band_code(&self, band: Band) -> &'static str {
        if self.is_256 {
            match band {
                Band::Low => "\u{1b}[38;5;40m",
                Band::Medium => "\u{1b}[38;5;220m",
                Band::High => "\u{1b}[38;5;202m",
                Band::VeryHigh => "\u{1b}[38;5;196m",
            }
        } else {
            match band {
                Band::Low => "\u{1b}[32m",
                Band::Medium => "\u{1b}[33m",
                Band::High => "\u{1b}[31m",
                Band::VeryHigh => "\u{1b}[35m",
            }
        }
    }
}

/// Threshold bands for attribute coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Classify a record's attribute into a band.
fn attr_band(attr: ColorAttr, record: &ProcessRecord, installed_memory: u64) -> Band {
    match attr {
        ColorAttr::Age => match record.age_seconds {
            s if s < 60 => Band::Low,
            s if s < 3_600 => Band::Medium,
            s if s < 86_400 => Band::High,
            _ => Band::VeryHigh,
        },
        ColorAttr::Cpu => match record.cpu_percent {
            c if c < 5.0 => Band::Low,
            c if c < 15.0 => Band::Medium,
            _ => Band::High,
        },
        ColorAttr::Mem => {
            let percent = if installed_memory > 0 {
                record.rss_bytes as f64 / installed_memory as f64 * 100.0
            } else {
                0.0
            };
            match percent {
                p if p < 10.0 => Band::Low,
                p if p < 20.0 => Band::Medium,
                _ => Band::High,
            }
        }
    }
}

/// Field colorizer for one run.
#[derive(Debug, Clone, Copy)]
pub struct Colorizer {
    mode: ColorMode,
    palette: &'static Palette,
    enabled: bool,
    installed_memory: u64,
}

impl Colorizer {
    pub fn new(opts: &DisplayOptions, palette: &'static Palette) -> Self {
        Colorizer {
            mode: opts.color_mode,
            palette,
            enabled: opts.color_mode != ColorMode::None && opts.color_allowed(),
            installed_memory: opts.installed_memory_bytes,
        }
    }

    /// Colorizer that never paints (non-TTY output).
    pub fn disabled() -> Self {
        Colorizer {
            mode: ColorMode::None,
            palette: &ANSI8,
            enabled: false,
            installed_memory: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Wrap a field with its role color.
    ///
    /// In attribute mode, non-command roles pass through unchanged.
    pub fn paint(&self, role: Role, text: &str) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        match self.mode {
            ColorMode::None => text.to_string(),
            ColorMode::Field => format!("{}{}{}", self.palette.code(role), text, RESET),
            ColorMode::Attr(_) => text.to_string(),
        }
    }

    /// Wrap the command field; attribute mode applies the threshold
    /// band of the driving attribute.
    pub fn paint_command(&self, record: &ProcessRecord, text: &str) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        match self.mode {
            ColorMode::None => text.to_string(),
            ColorMode::Field => format!("{}{}{}", self.palette.code(Role::Command), text, RESET),
            ColorMode::Attr(attr) => {
                let band = attr_band(attr, record, self.installed_memory);
                format!("{}{}{}", self.palette.band_code(band), text, RESET)
            }
        }
    }
}

/// Rainbow hues, cycled per visible character.
const RAINBOW: [u8; 7] = [196, 208, 226, 46, 51, 21, 129];

/// Paint a line in rainbow colors, one hue per visible character.
///
/// Existing escape sequences are stripped first so hues do not nest.
pub fn rainbow_paint(line: &str) -> String {
    let plain = super::width::strip_ansi(line);
    let mut out = String::with_capacity(plain.len() * 12);
    let mut hue = 0usize;
    for c in plain.chars() {
        if c == ' ' {
            out.push(c);
            continue;
        }
        out.push_str(&format!("\u{1b}[38;5;{}m{}", RAINBOW[hue % RAINBOW.len()], c));
        hue += 1;
    }
    out.push_str(RESET);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::width::{strip_ansi, visible_width};

    fn field_colorizer() -> Colorizer {
        let opts = DisplayOptions {
            color_mode: ColorMode::Field,
            is_tty: true,
            ..Default::default()
        };
        Colorizer::new(&opts, &ANSI8)
    }

    #[test]
    fn test_paint_round_trips_through_strip() {
        let c = field_colorizer();
        for role in [Role::Owner, Role::Cpu, Role::Command, Role::Age, Role::PidPgid] {
            let painted = c.paint(role, "field");
            assert_eq!(strip_ansi(&painted), "field");
        }
    }

    #[test]
    fn test_paint_disabled_without_tty() {
        let opts = DisplayOptions {
            color_mode: ColorMode::Field,
            is_tty: false,
            ..Default::default()
        };
        let c = Colorizer::new(&opts, &ANSI8);
        assert!(!c.is_enabled());
        assert_eq!(c.paint(Role::Owner, "alice"), "alice");
    }

    #[test]
    fn test_paint_forced_without_tty() {
        let opts = DisplayOptions {
            color_mode: ColorMode::Field,
            is_tty: false,
            force_color: true,
            ..Default::default()
        };
        assert!(Colorizer::new(&opts, &ANSI8).is_enabled());
    }

    #[test]
    fn test_attr_mode_leaves_other_fields_plain() {
        let opts = DisplayOptions {
            color_mode: ColorMode::Attr(ColorAttr::Cpu),
            is_tty: true,
            ..Default::default()
        };
        let c = Colorizer::new(&opts, &ANSI8);
        assert_eq!(c.paint(Role::Owner, "alice"), "alice");

        let record = ProcessRecord {
            cpu_percent: 50.0,
            ..Default::default()
        };
        let painted = c.paint_command(&record, "hog");
        assert!(painted.starts_with("\u{1b}["));
        assert_eq!(strip_ansi(&painted), "hog");
    }

    #[test]
    fn test_age_bands() {
        let mk = |age| ProcessRecord {
            age_seconds: age,
            ..Default::default()
        };
        assert_eq!(attr_band(ColorAttr::Age, &mk(30), 0), Band::Low);
        assert_eq!(attr_band(ColorAttr::Age, &mk(120), 0), Band::Medium);
        assert_eq!(attr_band(ColorAttr::Age, &mk(7_200), 0), Band::High);
        assert_eq!(attr_band(ColorAttr::Age, &mk(200_000), 0), Band::VeryHigh);
    }

    #[test]
    fn test_cpu_bands() {
        let mk = |cpu| ProcessRecord {
            cpu_percent: cpu,
            ..Default::default()
        };
        assert_eq!(attr_band(ColorAttr::Cpu, &mk(1.0), 0), Band::Low);
        assert_eq!(attr_band(ColorAttr::Cpu, &mk(10.0), 0), Band::Medium);
        assert_eq!(attr_band(ColorAttr::Cpu, &mk(80.0), 0), Band::High);
    }

    #[test]
    fn test_mem_bands_against_installed_ram() {
        let installed = 1_000u64;
        let mk = |rss| ProcessRecord {
            rss_bytes: rss,
            ..Default::default()
        };
        assert_eq!(attr_band(ColorAttr::Mem, &mk(50), installed), Band::Low);
        assert_eq!(attr_band(ColorAttr::Mem, &mk(150), installed), Band::Medium);
        assert_eq!(attr_band(ColorAttr::Mem, &mk(500), installed), Band::High);
        // Unknown installed memory degrades to the lowest band.
        assert_eq!(attr_band(ColorAttr::Mem, &mk(500), 0), Band::Low);
    }

    #[test]
    fn test_palette_detect() {
        assert_eq!(Palette::detect(8).name(), "ansi8");
        assert_eq!(Palette::detect(256).name(), "indexed256");
    }

    #[test]
    fn test_rainbow_preserves_text_and_width() {
        let painted = rainbow_paint("ab cd");
        assert_eq!(strip_ansi(&painted), "ab cd");
        assert_eq!(visible_width(&painted), 5);
    }
}
