//! End-to-end pipeline over one immutable snapshot.
//!
//! build -> attribute mark -> visibility mark -> prune -> sort ->
//! render. Compact grouping happens inside the renderer's root call.
//! The whole pipeline is single-threaded; the only blocking points are
//! writes to the output stream.

use crate::options::{DisplayOptions, SortKey};
use crate::render::{Colorizer, Renderer};
use crate::tree::{
    build_tree, mark_attributes, mark_current, mark_visibility, prune, sort_siblings,
    VisibilityFilter,
};
use ptree_common::{Error, Result};
use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::debug;

/// Run the full pipeline, writing the rendered tree to `out`.
///
/// Returns the number of visible nodes; a zero with active filters
/// means nothing was rendered and the run should exit with a
/// resolution error.
///
/// # Errors
/// - `InvalidSnapshot` on duplicate PIDs
/// - `UnknownPid` when `filter.root_pid` is absent from the snapshot
/// - `Io` on write failure (further output is abandoned)
pub fn execute(
    records: Vec<crate::collect::ProcessRecord>,
    filter: &VisibilityFilter,
    order_by: Option<SortKey>,
    opts: &DisplayOptions,
    colors: Colorizer,
    cancel: Option<Arc<AtomicBool>>,
    out: &mut dyn Write,
) -> Result<usize> {
    let mut tree = build_tree(records)?;

    mark_attributes(&mut tree);
    if opts.highlight_pid > 0 {
        mark_current(&mut tree, opts.highlight_pid);
    }

    if filter.root_pid > 0 && tree.index_of_pid(filter.root_pid).is_none() {
        return Err(Error::UnknownPid(filter.root_pid));
    }

    let visible = mark_visibility(&mut tree, filter);
    prune(&mut tree);

    if let Some(key) = order_by {
        sort_siblings(&mut tree, key);
    }

    let mut renderer = Renderer::new(opts, colors);
    if let Some(token) = cancel {
        renderer = renderer.with_cancel(token);
    }
    renderer.render(&mut tree, out)?;

    debug!(visible, "render complete");
    Ok(visible)
}
