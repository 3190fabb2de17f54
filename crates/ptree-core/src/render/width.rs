//! ANSI-aware display width utilities.
//!
//! ANSI CSI sequences (`ESC [ ... <final byte>`) are zero-width;
//! remaining code points are measured with East-Asian-Width rules
//! (wide CJK = 2 cells, combining marks and controls = 0, normal = 1).
//!
//! Truncation and colorization stay orthogonal: truncation operates on
//! already-colored strings and never counts escape bytes.

use unicode_width::UnicodeWidthChar;

const ESC: char = '\u{1b}';
/// ANSI reset, appended after truncation to prevent color bleed.
const RESET: &str = "\u{1b}[0m";
const ELLIPSIS: &str = "...";

/// Display width of `s` with CSI sequences treated as zero-width.
pub fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESC {
            skip_csi(&mut chars);
            continue;
        }
        width += c.width().unwrap_or(0);
    }
    width
}

/// Remove every CSI sequence from `s`.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESC {
            skip_csi(&mut chars);
            continue;
        }
        out.push(c);
    }
    out
}

/// Width-truncate a possibly colored string to `max` cells.
///
/// CSI sequences are copied verbatim and do not count. When the string
/// is cut, the output ends with `"..."` plus an ANSI reset, and its
/// visible width never exceeds `max`.
pub fn truncate_ansi(s: &str, max: usize) -> String {
    if visible_width(s) <= max {
        return s.to_string();
    }
    if max <= 3 {
        return ELLIPSIS.to_string();
    }

    let budget = max - 3;
    let mut out = String::with_capacity(s.len());
    let mut width = 0;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESC {
            out.push(c);
            copy_csi(&mut chars, &mut out);
            continue;
        }
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        out.push(c);
        width += w;
    }

    out.push_str(ELLIPSIS);
    out.push_str(RESET);
    out
}

/// Width-aware truncation with `"..."` suffix for plain text.
pub fn truncate_plain(s: &str, max: usize) -> String {
    let mut total = 0;
    if s.chars().map(|c| c.width().unwrap_or(0)).sum::<usize>() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return ELLIPSIS.to_string();
    }

    let budget = max - 3;
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if total + w > budget {
            break;
        }
        out.push(c);
        total += w;
    }
    out.push_str(ELLIPSIS);
    out
}

/// Consume the remainder of an escape sequence after the ESC.
///
/// Handles CSI (`ESC [ ... <final>`) and the two-byte charset
/// designations (`ESC ( X`, `ESC ) X`) the VT100 glyph table emits.
fn skip_csi(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    match chars.peek() {
        Some('[') => {
            chars.next();
            for c in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    break;
                }
            }
        }
        Some('(') | Some(')') => {
            chars.next();
            chars.next();
        }
        _ => {} // bare ESC: zero-width, nothing to consume
    }
}

/// Copy the remainder of an escape sequence after the ESC into `out`.
fn copy_csi(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    match chars.peek() {
        Some('[') => {
            out.push('[');
            chars.next();
            for c in chars.by_ref() {
                out.push(c);
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    break;
                }
            }
        }
        Some('(') | Some(')') => {
            for _ in 0..2 {
                if let Some(c) = chars.next() {
                    out.push(c);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: &str = "\u{1b}[31m";

    #[test]
    fn test_visible_width_plain() {
        assert_eq!(visible_width("hello"), 5);
        assert_eq!(visible_width(""), 0);
    }

    #[test]
    fn test_visible_width_ignores_csi() {
        assert_eq!(visible_width(&format!("{RED}hello{RESET}")), 5);
        assert_eq!(visible_width("\u{1b}[38;5;208mx\u{1b}[0m"), 1);
    }

    #[test]
    fn test_visible_width_wide_chars() {
        // CJK is two cells per glyph.
        assert_eq!(visible_width("\u{65e5}\u{672c}"), 4);
        // Combining mark is zero cells.
        assert_eq!(visible_width("e\u{0301}"), 1);
    }

    #[test]
    fn test_visible_width_vt100_controls() {
        assert_eq!(visible_width("\u{0e}qw\u{0f}"), 2);
    }

    #[test]
    fn test_charset_designators_are_zero_width() {
        let vt = "\u{1b}(B\u{1b})0qw";
        assert_eq!(visible_width(vt), 2);
        assert_eq!(strip_ansi(vt), "qw");
        // Fits, so truncation must keep the escapes verbatim.
        assert_eq!(truncate_ansi(vt, 10), vt);
    }

    #[test]
    fn test_strip_ansi_round_trip() {
        let colored = format!("{RED}shell{RESET}");
        assert_eq!(strip_ansi(&colored), "shell");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn test_truncate_ansi_unchanged_when_fits() {
        assert_eq!(truncate_ansi("short", 10), "short");
        let colored = format!("{RED}short{RESET}");
        assert_eq!(truncate_ansi(&colored, 5), colored);
    }

    #[test]
    fn test_truncate_ansi_cuts_to_exact_width() {
        let long = "x".repeat(120);
        let cut = truncate_ansi(&long, 80);
        assert_eq!(visible_width(&cut), 80);
        assert!(cut.ends_with(&format!("{ELLIPSIS}{RESET}")));
    }

    #[test]
    fn test_truncate_ansi_keeps_escapes() {
        let long = format!("{RED}{}{RESET}", "y".repeat(50));
        let cut = truncate_ansi(&long, 20);
        assert!(cut.starts_with(RED));
        assert_eq!(visible_width(&cut), 20);
        assert!(cut.ends_with(RESET));
    }

    #[test]
    fn test_truncate_ansi_tiny_max() {
        assert_eq!(truncate_ansi("abcdef", 3), "...");
        assert_eq!(truncate_ansi("abcdef", 0), "...");
    }

    #[test]
    fn test_truncate_ansi_idempotent() {
        let long = format!("{RED}{}{RESET}", "z".repeat(200));
        let once = truncate_ansi(&long, 64);
        assert_eq!(truncate_ansi(&once, 64), once);
    }

    #[test]
    fn test_truncate_plain() {
        assert_eq!(truncate_plain("abc", 10), "abc");
        assert_eq!(truncate_plain(&"a".repeat(20), 10), format!("{}...", "a".repeat(7)));
        assert_eq!(truncate_plain("abcdef", 2), "...");
    }

    #[test]
    fn test_truncate_plain_wide_boundary() {
        // Budget lands mid-wide-char: the wide char is dropped.
        let s = "ab\u{65e5}\u{672c}cdefgh";
        let cut = truncate_plain(s, 6);
        assert_eq!(cut, "ab...");
    }
}
