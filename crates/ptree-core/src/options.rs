//! Display configuration.
//!
//! [`DisplayOptions`] is a flat, read-only value constructed once from
//! the CLI; the engine never mutates it. Terminal facts (width,
//! TTY-ness, installed memory) are injected here by the caller so the
//! core stays free of environment probing.

use clap::ValueEnum;

/// Sibling sort keys for `--order-by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum SortKey {
    Pid,
    Cpu,
    Mem,
    Age,
    Threads,
    User,
}

/// Numeric attributes for `--color` threshold coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ColorAttr {
    Age,
    Cpu,
    Mem,
}

/// How fields are colorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// No coloring.
    #[default]
    None,
    /// Every field gets its role's palette color.
    Field,
    /// One numeric attribute drives the command field's color.
    Attr(ColorAttr),
}

/// Line-drawing styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphStyle {
    #[default]
    Ascii,
    Pc850,
    Vt100,
    Utf8,
}

/// Flat display configuration for one run.
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    /// Include the argument list after the command.
    pub show_arguments: bool,
    /// Show CPU percent.
    pub show_cpu_percent: bool,
    /// Show resident memory.
    pub show_memory_usage: bool,
    /// Show thread count.
    pub show_num_threads: bool,
    /// Show process age.
    pub show_process_age: bool,
    /// Show owner username.
    pub show_owner: bool,
    /// Show PIDs in the parenthesized block.
    pub show_pids: bool,
    /// Show PPIDs in the parenthesized block.
    pub show_ppids: bool,
    /// Show PGIDs in the parenthesized block.
    pub show_pgids: bool,
    /// Mark process-group leaders.
    pub show_pgls: bool,
    /// Show `(parent_uid→uid)` transitions.
    pub show_uid_transitions: bool,
    /// Show `(parent_user→user)` transitions.
    pub show_user_transitions: bool,
    /// Suppress thread lines.
    pub hide_threads: bool,

    /// Collapse identical sibling subtrees.
    pub compact: bool,
    /// Maximum depth to draw (0 = unlimited).
    pub max_depth: u32,
    /// Skip width truncation entirely.
    pub wide_display: bool,
    /// Glyph table for branch drawing.
    pub glyphs: GlyphStyle,

    /// Colorization mode.
    pub color_mode: ColorMode,
    /// Rainbow paint over whole lines (256-color terminals).
    pub rainbow: bool,
    /// Colorize even when stdout is not a TTY.
    pub force_color: bool,

    /// Terminal width in cells.
    pub screen_width: usize,
    /// Whether stdout is a terminal.
    pub is_tty: bool,
    /// Installed RAM, for memory threshold coloring (0 = unknown).
    pub installed_memory_bytes: u64,
    /// PID whose root path gets the current-or-ancestor highlight
    /// (0 = none).
    pub highlight_pid: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            show_arguments: false,
            show_cpu_percent: false,
            show_memory_usage: false,
            show_num_threads: false,
            show_process_age: false,
            show_owner: false,
            show_pids: false,
            show_ppids: false,
            show_pgids: false,
            show_pgls: false,
            show_uid_transitions: false,
            show_user_transitions: false,
            hide_threads: false,
            compact: true,
            max_depth: 0,
            wide_display: false,
            glyphs: GlyphStyle::Ascii,
            color_mode: ColorMode::None,
            rainbow: false,
            force_color: false,
            screen_width: 80,
            is_tty: false,
            installed_memory_bytes: 0,
            highlight_pid: 0,
        }
    }
}

impl DisplayOptions {
    /// Whether any component of the PID block is enabled.
    pub fn shows_pid_block(&self) -> bool {
        self.show_ppids || self.show_pids || self.show_pgids
    }

    /// Whether colors may be emitted at all.
    pub fn color_allowed(&self) -> bool {
        self.is_tty || self.force_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = DisplayOptions::default();
        assert!(opts.compact);
        assert_eq!(opts.max_depth, 0);
        assert_eq!(opts.screen_width, 80);
        assert!(!opts.shows_pid_block());
        assert!(!opts.color_allowed());
    }

    #[test]
    fn test_pid_block_subset() {
        let mut opts = DisplayOptions::default();
        opts.show_pgids = true;
        assert!(opts.shows_pid_block());
    }

    #[test]
    fn test_color_allowed_forced() {
        let mut opts = DisplayOptions::default();
        opts.force_color = true;
        assert!(opts.color_allowed());
    }
}
