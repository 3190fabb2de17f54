//! Terminal capability probing.
//!
//! The engine never inspects the environment itself; `main` samples
//! these facts once and bakes them into `DisplayOptions`.

use std::io::IsTerminal;

/// Fallback width when the terminal cannot be queried.
pub const DEFAULT_WIDTH: usize = 80;

/// Whether stdout is a terminal.
pub fn stdout_is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Terminal width in cells, from the controlling TTY.
pub fn terminal_width() -> usize {
    // SAFETY: TIOCGWINSZ only writes into the winsize out-parameter.
    unsafe {
        let mut ws: libc::winsize = std::mem::zeroed();
        if libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) == 0 && ws.ws_col > 0 {
            return ws.ws_col as usize;
        }
    }
    DEFAULT_WIDTH
}

/// Number of colors the terminal supports, from `TERM`/`COLORTERM`
/// hints. Zero means no color support.
pub fn color_count() -> u16 {
    let term = std::env::var("TERM").unwrap_or_default();
    if term.is_empty() || term == "dumb" {
        return 0;
    }
    let colorterm = std::env::var("COLORTERM").unwrap_or_default();
    if term.contains("256") || colorterm == "truecolor" || colorterm == "24bit" {
        256
    } else {
        8
    }
}

/// Whether the `NO_COLOR` convention disables color output.
pub fn no_color_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

/// Whether `CLICOLOR_FORCE` forces color onto a non-TTY stream.
pub fn color_forced() -> bool {
    std::env::var_os("CLICOLOR_FORCE").is_some_and(|v| !v.is_empty() && v != "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_width_positive() {
        assert!(terminal_width() >= 1);
    }
}
