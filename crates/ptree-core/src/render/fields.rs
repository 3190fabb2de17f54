//! Per-node info field assembly.
//!
//! Fields are appended after the branch glyphs in a fixed order, each
//! followed by a single space, each independently colorizable:
//! owner, PID block, age, CPU, memory, threads, owner transition,
//! command (with compact suffix), arguments.

use super::color::{Colorizer, Role};
use crate::collect::basename;
use crate::options::DisplayOptions;
use crate::tree::{CompactGroup, Node};
use ptree_common::{format_age, format_bytes};

/// Separator between a command and its compact-group suffix.
const COMPACT_SEP: &str = "\u{2500}\u{2500}\u{2500}";

/// Build the info fields for one node line.
pub fn format_fields(
    node: &Node,
    group: Option<&CompactGroup>,
    opts: &DisplayOptions,
    colors: &Colorizer,
) -> String {
    let record = &node.record;
    let mut out = String::new();
    let mut push = |field: String| {
        if !field.is_empty() {
            out.push_str(&field);
            out.push(' ');
        }
    };

    if opts.show_owner {
        push(colors.paint(Role::Owner, &record.username));
    }

    if opts.shows_pid_block() {
        let mut ids = Vec::with_capacity(3);
        if opts.show_ppids {
            ids.push(record.ppid.to_string());
        }
        if opts.show_pids {
            ids.push(record.pid.to_string());
        }
        if opts.show_pgids {
            ids.push(record.pgid.to_string());
        }
        push(colors.paint(Role::PidPgid, &format!("({})", ids.join(","))));
    }

    if opts.show_process_age {
        push(colors.paint(Role::Age, &format!("({})", format_age(record.age_seconds))));
    }

    if opts.show_cpu_percent {
        push(colors.paint(Role::Cpu, &format!("(c:{:.2}%)", record.cpu_percent)));
    }

    if opts.show_memory_usage {
        push(colors.paint(Role::Memory, &format!("(m:{})", format_bytes(record.rss_bytes))));
    }

    if opts.show_num_threads {
        push(colors.paint(Role::NumThreads, &format!("(t:{})", record.num_threads)));
    }

    if node.has_uid_transition {
        if opts.show_uid_transitions {
            push(colors.paint(
                Role::OwnerTransition,
                &format!("({}\u{2192}{})", node.parent_uid, record.uid),
            ));
        } else if opts.show_user_transitions {
            push(colors.paint(
                Role::OwnerTransition,
                &format!("({}\u{2192}{})", node.parent_username, record.username),
            ));
        }
    }

    let mut command = colors.paint_command(record, &record.command);
    if let Some(group) = group.filter(|g| g.count > 1) {
        command.push_str(COMPACT_SEP);
        command.push_str(&colors.paint(Role::CompactIndicator, &compact_label(group, opts)));
    }
    push(command);

    if opts.show_arguments {
        let args = normalize_args(&record.command, &record.args);
        if !args.is_empty() {
            push(colors.paint(Role::Args, &args.join(" ")));
        }
    }

    out
}

/// Compact-group suffix: `N*[basename]`, plus member PIDs when PIDs
/// are shown.
fn compact_label(group: &CompactGroup, opts: &DisplayOptions) -> String {
    let base = basename(&group.full_path);
    if opts.show_pids {
        let pids: Vec<String> = group.pids.iter().map(|p| p.to_string()).collect();
        format!("{}*[{}] ({})", group.count, base, pids.join(","))
    } else {
        format!("{}*[{}]", group.count, base)
    }
}

/// Normalize argv duplication of the command.
///
/// If `args[0]` starts with the command, the shared prefix plus one
/// separator is stripped; if `args[0]` equals the command's basename,
/// it is dropped.
pub fn normalize_args(command: &str, args: &[String]) -> Vec<String> {
    let Some(first) = args.first() else {
        return Vec::new();
    };

    let mut normalized: Vec<String> = Vec::with_capacity(args.len());
    if let Some(rest) = first.strip_prefix(command) {
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        if !rest.is_empty() {
            normalized.push(rest.to_string());
        }
    } else if first != basename(command) {
        normalized.push(first.clone());
    }
    normalized.extend(args[1..].iter().cloned());
    normalized
}
