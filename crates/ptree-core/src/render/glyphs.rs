//! Branch-drawing glyph tables.
//!
//! Four named tables; the renderer selects one up front and never
//! branches on style during traversal. `sg`/`eg`/`init` are terminal
//! control prefixes, non-empty only for VT100 (shift-out into the DEC
//! special graphics charset and back).
//!
//! The IBM-850 table is stored as Unicode box-drawing characters;
//! [`encode_cp850`] transcodes finished lines to the raw code-page
//! bytes at write time.

use crate::options::GlyphStyle;

/// One glyph table.
#[derive(Debug)]
pub struct GlyphSet {
    /// Vertical bar carried in the head gutter.
    pub bar: &'static str,
    /// T-junction: this node has a later visible sibling.
    pub bar_c: &'static str,
    /// L-junction: last visible sibling.
    pub bar_l: &'static str,
    /// Horizontal with down-branch: node has descendants to draw.
    pub p: &'static str,
    /// Plain horizontal: no descendants to draw.
    pub s2: &'static str,
    /// Process-group-leader marker.
    pub pgl: &'static str,
    /// Non-leader marker.
    pub npgl: &'static str,
    /// Start-graphics control prefix.
    pub sg: &'static str,
    /// End-graphics control suffix.
    pub eg: &'static str,
    /// Per-line charset initialization.
    pub init: &'static str,
}

const ASCII: GlyphSet = GlyphSet {
    bar: "|",
    bar_c: "|",
    bar_l: "\\",
    p: "-+",
    s2: "--",
    pgl: "=",
    npgl: "-",
    sg: "",
    eg: "",
    init: "",
};

const PC850: GlyphSet = GlyphSet {
    bar: "\u{2502}",
    bar_c: "\u{251c}",
    bar_l: "\u{2514}",
    p: "\u{2500}\u{252c}",
    s2: "\u{2500}\u{2500}",
    pgl: "=",
    npgl: "\u{2500}",
    sg: "",
    eg: "",
    init: "",
};

const VT100: GlyphSet = GlyphSet {
    bar: "x",
    bar_c: "t",
    bar_l: "m",
    p: "qw",
    s2: "qq",
    pgl: "`",
    npgl: "q",
    sg: "\u{0e}",
    eg: "\u{0f}",
    init: "\u{1b}(B\u{1b})0",
};

const UTF8: GlyphSet = GlyphSet {
    bar: "\u{2502}",
    bar_c: "\u{251c}",
    bar_l: "\u{2514}",
    p: "\u{2500}\u{252c}",
    s2: "\u{2500}\u{2500}",
    pgl: "=",
    npgl: "\u{2500}",
    sg: "",
    eg: "",
    init: "",
};

impl GlyphSet {
    /// Table for a style.
    pub fn for_style(style: GlyphStyle) -> &'static GlyphSet {
        match style {
            GlyphStyle::Ascii => &ASCII,
            GlyphStyle::Pc850 => &PC850,
            GlyphStyle::Vt100 => &VT100,
            GlyphStyle::Utf8 => &UTF8,
        }
    }
}

/// Transcode a finished line to raw IBM code page 850 bytes.
///
/// Box-drawing characters map to their single CP850 bytes; other
/// non-ASCII characters degrade to `?`.
pub fn encode_cp850(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| match c {
            '\u{2502}' => 0xb3, // │
            '\u{251c}' => 0xc3, // ├
            '\u{2514}' => 0xc0, // └
            '\u{252c}' => 0xc2, // ┬
            '\u{2500}' => 0xc4, // ─
            '\u{2192}' => 0x1a, // → (CP850 right-arrow control glyph)
            c if c.is_ascii() => c as u8,
            _ => b'?',
        })
        .collect()
}
