//! ptree - draw the host's processes as a tree.
//!
//! The binary owns everything environmental: argument parsing, TTY
//! probing, color capability detection and exit-code mapping. The
//! engine in the library crate only ever sees a materialized snapshot
//! and a read-only `DisplayOptions`.

use clap::Parser;
use ptree_common::{Error, ExitCode};
use ptree_core::collect::users::UserTable;
use ptree_core::collect::{default_snapshot, procfs};
use ptree_core::logging::init_logging;
use ptree_core::options::{ColorAttr, ColorMode, DisplayOptions, GlyphStyle, SortKey};
use ptree_core::render::{Colorizer, Palette};
use ptree_core::tree::VisibilityFilter;
use ptree_core::{pipeline, term};
use std::io::{BufWriter, Write};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "ptree",
    version,
    about = "Display running processes as a tree",
    disable_help_subcommand = true
)]
struct Cli {
    /// Include the argument list after each command
    #[arg(short = 'a', long)]
    arguments: bool,

    /// Equivalent to -a -c -g -G -m -O -p -t -I
    #[arg(short = 'A', long, conflicts_with = "user_transitions")]
    all: bool,

    /// Show CPU utilization percentage (disables compact mode)
    #[arg(short = 'c', long)]
    cpu: bool,

    /// Colorize fields with the terminal palette
    #[arg(short = 'C', long)]
    colorize: bool,

    /// Color the command by an attribute threshold (disables compact mode)
    #[arg(short = 'k', long, value_name = "ATTR")]
    color: Option<ColorAttr>,

    /// Rainbow output (256-color terminals only)
    #[arg(short = 'r', long)]
    rainbow: bool,

    /// Disable compact mode
    #[arg(short = 'n', long = "compact-not")]
    compact_not: bool,

    /// Show only subtrees whose command contains PATTERN (disables
    /// compact mode)
    #[arg(short = 's', long, value_name = "PATTERN")]
    contains: Option<String>,

    /// Hide processes owned by root
    #[arg(short = 'X', long, conflicts_with = "user")]
    exclude_root: bool,

    /// Show only trees containing processes of USER (repeatable)
    #[arg(long, value_name = "USER")]
    user: Vec<String>,

    /// Root the tree at PID
    #[arg(short = 'P', long, value_name = "PID")]
    pid: Option<u32>,

    /// Limit the tree to N levels
    #[arg(short = 'l', long, value_name = "N")]
    level: Option<u32>,

    /// Show resident memory usage (disables compact mode)
    #[arg(short = 'm', long)]
    memory: bool,

    /// Show process age as DD:HH:MM:SS
    #[arg(short = 'G', long)]
    age: bool,

    /// Show process group IDs
    #[arg(short = 'g', long)]
    pgid: bool,

    /// Show PIDs
    #[arg(short = 'p', long)]
    show_pids: bool,

    /// Show parent PIDs
    #[arg(long)]
    ppid: bool,

    /// Show the owning user of each process
    #[arg(short = 'O', long)]
    show_owner: bool,

    /// Highlight process group leaders
    #[arg(short = 'S', long)]
    show_pgls: bool,

    /// Show thread counts
    #[arg(short = 't', long)]
    threads: bool,

    /// Hide individual thread lines
    #[arg(short = 'H', long)]
    hide_threads: bool,

    /// Show UID transitions as (parent_uid→uid)
    #[arg(short = 'I', long, conflicts_with = "user_transitions")]
    uid_transitions: bool,

    /// Show username transitions as (parent_user→user)
    #[arg(short = 'U', long)]
    user_transitions: bool,

    /// Sort siblings by FIELD
    #[arg(short = 'o', long, value_name = "FIELD")]
    order_by: Option<SortKey>,

    /// Draw lines with IBM-850 box characters
    #[arg(short = 'i', long = "ibm-850", conflicts_with_all = ["utf_8", "vt_100"])]
    ibm_850: bool,

    /// Draw lines with UTF-8 box characters
    #[arg(short = 'u', long = "utf-8", conflicts_with = "vt_100")]
    utf_8: bool,

    /// Draw lines with VT100 alternate-charset sequences
    #[arg(short = 'v', long = "vt-100")]
    vt_100: bool,

    /// Do not truncate lines to the terminal width
    #[arg(short = 'w', long)]
    wide: bool,
}

impl Cli {
    fn glyph_style(&self) -> GlyphStyle {
        if self.ibm_850 {
            GlyphStyle::Pc850
        } else if self.vt_100 {
            GlyphStyle::Vt100
        } else if self.utf_8 {
            GlyphStyle::Utf8
        } else {
            GlyphStyle::Ascii
        }
    }
}

fn main() -> std::process::ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("ptree: {err}");
            err.exit_code().into()
        }
    }
}

fn run(cli: &Cli) -> ptree_common::Result<ExitCode> {
    let snapshot = default_snapshot();
    let self_pid = snapshot.current_process_id();

    // Resolve --user names before touching the snapshot so a typo
    // fails fast with a clear message.
    if !cli.user.is_empty() {
        let table = UserTable::load();
        for name in &cli.user {
            if table.uid_of(name).is_none() {
                return Err(Error::UnknownUser(name.clone()));
            }
        }
    }

    let opts = build_options(cli, self_pid);
    let colors = if opts.color_allowed() && opts.color_mode != ColorMode::None {
        Colorizer::new(&opts, Palette::detect(term::color_count()))
    } else {
        Colorizer::disabled()
    };

    let filter = VisibilityFilter {
        usernames: cli.user.clone(),
        root_pid: cli.pid.unwrap_or(0),
        contains: cli.contains.clone(),
        exclude_root: cli.exclude_root,
        self_pid,
    };

    let records = snapshot
        .list_processes()
        .map_err(|e| Error::Collection(e.to_string()))?;
    debug!(count = records.len(), "snapshot acquired");

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let visible = match pipeline::execute(records, &filter, cli.order_by, &opts, colors, None, &mut out)
    {
        Ok(visible) => visible,
        // A closed pager is the reader saying "enough", not a fault.
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            return Ok(ExitCode::Success);
        }
        Err(e) => return Err(e),
    };
    match out.flush() {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => return Ok(ExitCode::Success),
        Err(e) => return Err(Error::Io(e)),
    }

    if filter.is_active() && visible == 0 {
        eprintln!("ptree: no processes matched the given filters");
        return Ok(ExitCode::ResolutionError);
    }
    Ok(ExitCode::Success)
}

/// Fold the parsed flags and terminal facts into the engine's
/// read-only display configuration.
fn build_options(cli: &Cli, self_pid: u32) -> DisplayOptions {
    let is_tty = term::stdout_is_tty();
    let colors = term::color_count();
    let force_color = term::color_forced();

    let mut color_mode = if let Some(attr) = cli.color {
        ColorMode::Attr(attr)
    } else if cli.colorize {
        ColorMode::Field
    } else {
        ColorMode::None
    };
    let mut rainbow = cli.rainbow && (colors >= 256 || force_color);
    if term::no_color_requested() && !force_color {
        color_mode = ColorMode::None;
        rainbow = false;
    }
    if colors == 0 && !force_color {
        color_mode = ColorMode::None;
        rainbow = false;
    }

    // These attribute columns (and substring filtering) are unreadable
    // when identical siblings collapse, so they switch compaction off.
    let compact = !(cli.compact_not
        || cli.all
        || cli.cpu
        || cli.memory
        || cli.color.is_some()
        || cli.contains.is_some());

    DisplayOptions {
        show_arguments: cli.arguments || cli.all,
        show_cpu_percent: cli.cpu || cli.all,
        show_memory_usage: cli.memory || cli.all,
        show_num_threads: cli.threads || cli.all,
        show_process_age: cli.age || cli.all,
        show_owner: cli.show_owner || cli.all,
        show_pids: cli.show_pids || cli.all,
        show_ppids: cli.ppid,
        show_pgids: cli.pgid || cli.all,
        show_pgls: cli.show_pgls,
        show_uid_transitions: cli.uid_transitions || cli.all,
        show_user_transitions: cli.user_transitions,
        hide_threads: cli.hide_threads,
        compact,
        max_depth: cli.level.unwrap_or(0),
        wide_display: cli.wide,
        glyphs: cli.glyph_style(),
        color_mode,
        rainbow,
        force_color,
        screen_width: if is_tty {
            term::terminal_width()
        } else {
            term::DEFAULT_WIDTH
        },
        is_tty,
        installed_memory_bytes: procfs::installed_memory_bytes(),
        highlight_pid: self_pid,
    }
}
