//! Tree rendering.
//!
//! One line per visible node, emitted depth-first in sibling order.
//! The recursion carries `depth` and `head` (the accumulated gutter of
//! open vertical bars from the ancestor chain). Every "is this the
//! last sibling?" decision skips compact-collapsed siblings; a naive
//! `next_sibling` test would draw the wrong connector.

pub mod color;
pub mod fields;
pub mod glyphs;
pub mod width;

pub use color::{Colorizer, Palette, Role};
pub use glyphs::{encode_cp850, GlyphSet};
pub use width::{strip_ansi, truncate_ansi, truncate_plain, visible_width};

use crate::collect::basename;
use crate::options::{DisplayOptions, GlyphStyle};
use crate::tree::{compact, CompactGroups, Tree};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Depth-first tree renderer for one run.
pub struct Renderer<'a> {
    opts: &'a DisplayOptions,
    glyphs: &'static GlyphSet,
    colors: Colorizer,
    groups: CompactGroups,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Renderer<'a> {
    pub fn new(opts: &'a DisplayOptions, colors: Colorizer) -> Self {
        Renderer {
            opts,
            glyphs: GlyphSet::for_style(opts.glyphs),
            colors,
            groups: CompactGroups::default(),
            cancel: None,
        }
    }

    /// Attach a cancellation token, checked between nodes.
    pub fn with_cancel(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = Some(token);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|t| t.load(Ordering::Relaxed))
    }

    /// Render the visible forest to `out`.
    ///
    /// Compact grouping is decided here, once, before traversal; the
    /// recursion only reads node flags and the recorded groups.
    pub fn render(&mut self, tree: &mut Tree, out: &mut dyn Write) -> std::io::Result<()> {
        if self.opts.compact {
            self.groups = compact(tree, self.opts.hide_threads);
            debug!(groups = self.groups.len(), "compact grouping complete");
        } else {
            self.groups = CompactGroups::default();
        }

        for root in tree.roots().collect::<Vec<_>>() {
            self.render_node(tree, root, 0, "", out)?;
        }
        Ok(())
    }

    fn render_node(
        &self,
        tree: &Tree,
        index: usize,
        depth: u32,
        head: &str,
        out: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.cancelled() {
            return Ok(());
        }
        if self.opts.max_depth > 0 && depth > self.opts.max_depth {
            return Ok(());
        }
        let node = tree.node(index);
        if self.opts.compact && node.skip_in_compact {
            return Ok(());
        }
        // Dormant root: filters left it unmarked.
        if head.is_empty() && !node.print {
            return Ok(());
        }

        let prefix = self.build_prefix(tree, index, depth, head);
        let group = if self.opts.compact {
            self.groups.group_for(index)
        } else {
            None
        };
        let info = fields::format_fields(node, group, self.opts, &self.colors);

        let mut line = self.colors.paint(Role::Connector, &prefix);
        if !prefix.is_empty() {
            line.push(' ');
        }
        line.push_str(&info);
        self.emit_line(&line, out)?;

        let child_head = self.child_head(tree, index, head);

        if !self.opts.hide_threads && node.record.has_threads() {
            self.render_threads(tree, index, &child_head, out)?;
        }

        for child in tree.children(index) {
            self.render_node(tree, child, depth + 1, &child_head, out)?;
        }
        Ok(())
    }

    /// Branch glyphs for one line (everything left of the info fields).
    fn build_prefix(&self, tree: &Tree, index: usize, depth: u32, head: &str) -> String {
        let g = self.glyphs;
        let node = tree.node(index);
        let record = &node.record;

        let mut prefix = String::new();
        prefix.push_str(g.init);
        prefix.push_str(g.sg);
        prefix.push_str(head);

        // The init process draws a fixed root prefix regardless of
        // filters rooting the tree elsewhere.
        if record.pid == 1 {
            prefix.push_str(g.p);
            if self.opts.show_pgls && !record.is_group_leader() {
                prefix.push_str(g.npgl);
            } else {
                prefix.push_str(g.pgl);
            }
            prefix.push_str(g.eg);
            return prefix;
        }

        if head.is_empty() {
            return String::new();
        }

        if self.has_visible_later_sibling(tree, index) {
            prefix.push_str(g.bar_c);
        } else {
            prefix.push_str(g.bar_l);
        }

        let children_in_reach =
            self.opts.max_depth == 0 || depth < self.opts.max_depth;
        let draws_threads = !self.opts.hide_threads && record.has_threads();
        let collapsed_group = self
            .opts
            .compact
            .then(|| self.groups.group_for(index))
            .flatten()
            .is_some_and(|grp| grp.count > 1);
        if (self.has_visible_child(tree, index) && children_in_reach)
            || draws_threads
            || collapsed_group
        {
            prefix.push_str(g.p);
        } else {
            prefix.push_str(g.s2);
        }

        if self.opts.show_pgls && record.is_group_leader() {
            prefix.push_str(g.pgl);
        } else {
            prefix.push_str(g.npgl);
        }
        prefix.push_str(g.eg);
        prefix
    }

    /// Thread lines hang directly under their owning process and never
    /// nest or count toward depth.
    fn render_threads(
        &self,
        tree: &Tree,
        index: usize,
        gutter: &str,
        out: &mut dyn Write,
    ) -> std::io::Result<()> {
        let g = self.glyphs;
        let node = tree.node(index);
        let has_child = self.has_visible_child(tree, index);
        let count = node.record.threads.len();

        for (i, thread) in node.record.threads.iter().enumerate() {
            if self.cancelled() {
                return Ok(());
            }
            let last = i + 1 == count && !has_child;

            let mut prefix = String::new();
            prefix.push_str(g.init);
            prefix.push_str(g.sg);
            prefix.push_str(gutter);
            prefix.push_str(if last { g.bar_l } else { g.bar_c });
            prefix.push_str(g.s2);
            prefix.push_str(g.npgl);
            prefix.push_str(g.eg);

            let mut line = self.colors.paint(Role::Connector, &prefix);
            line.push_str(&self.colors.paint(
                Role::CompactThread,
                &format!(" {{{}}} ({},{})", basename(&thread.command), thread.tid, thread.pgid),
            ));
            self.emit_line(&line, out)?;
        }
        Ok(())
    }

    /// Gutter for this node's children (and threads): the head plus a
    /// bar if a later visible sibling keeps the column open. The root
    /// level contributes a single alignment space.
    fn child_head(&self, tree: &Tree, index: usize, head: &str) -> String {
        if head.is_empty() {
            return " ".to_string();
        }
        let open = if self.has_visible_later_sibling(tree, index) {
            self.glyphs.bar
        } else {
            " "
        };
        format!("{head}{open} ")
    }

    /// Whether a later sibling will be drawn (compact-aware).
    fn has_visible_later_sibling(&self, tree: &Tree, index: usize) -> bool {
        let mut cursor = tree.node(index).next_sibling;
        while let Some(sibling) = cursor {
            if !(self.opts.compact && tree.node(sibling).skip_in_compact) {
                return true;
            }
            cursor = tree.node(sibling).next_sibling;
        }
        false
    }

    /// Whether any child will be drawn (compact-aware).
    fn has_visible_child(&self, tree: &Tree, index: usize) -> bool {
        tree.children(index)
            .any(|c| !(self.opts.compact && tree.node(c).skip_in_compact))
    }

    /// Width handling and final byte emission for one line.
    fn emit_line(&self, line: &str, out: &mut dyn Write) -> std::io::Result<()> {
        let colored_out = self.opts.color_allowed();
        // VT100 lines carry charset escapes that must survive even
        // when colors are off.
        let finished = if colored_out || self.opts.glyphs == GlyphStyle::Vt100 {
            let painted = if colored_out && self.opts.rainbow {
                color::rainbow_paint(line)
            } else {
                line.to_string()
            };
            if self.opts.wide_display {
                painted
            } else {
                truncate_ansi(&painted, self.opts.screen_width)
            }
        } else {
            let plain = strip_ansi(line);
            if self.opts.wide_display {
                plain
            } else {
                truncate_plain(&plain, self.opts.screen_width)
            }
        };

        if self.opts.glyphs == GlyphStyle::Pc850 {
            out.write_all(&encode_cp850(&finished))?;
            out.write_all(b"\n")
        } else {
            writeln!(out, "{finished}")
        }
    }
}
