use serde::{Deserialize, Serialize};

use emberscope_protocol::{LayoutRect, Orientation};

use crate::model::{CallNode, ThreadSample};
use crate::views::bucket::{VisualBucket, merge_siblings};

/// Buckets narrower than this are pruned: no rect is emitted and the
/// subtree is not visited. At typical drawing widths 0.1% is under a pixel,
/// and skipping it bounds the work on deep, bushy trees.
pub const MIN_WIDTH_PERCENT: f64 = 0.1;

/// The geometric result of laying out one call forest.
///
/// `max_depth` is computed with the same pruning rule as the rects, in a
/// pre-pass, so the drawing region can be sized before geometry is emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlameLayout {
    pub orientation: Orientation,
    /// Subtree total of the whole forest; the denominator for every width.
    pub total_events: u64,
    /// Number of visible levels after pruning.
    pub max_depth: u32,
    /// Bars in emission order: depth-first, left to right.
    pub rects: Vec<LayoutRect>,
}

impl FlameLayout {
    fn empty(orientation: Orientation, total_events: u64) -> Self {
        Self {
            orientation,
            total_events,
            max_depth: 0,
            rects: Vec::new(),
        }
    }
}

/// Lay out a forest of call nodes as one flame graph.
///
/// Sibling nodes sharing a function id are first merged into buckets at
/// every level; each bucket's width is its share of the forest total and
/// its x offset is the running total of prior unpruned siblings. The result
/// is deterministic: the same input sequence yields bit-identical output.
pub fn layout_forest(roots: &[&CallNode], orientation: Orientation) -> FlameLayout {
    let total: u64 = roots.iter().map(|n| n.subtree_events()).sum();
    if total == 0 {
        // Nothing to divide by: the whole forest is pruned, not NaN.
        return FlameLayout::empty(orientation, 0);
    }

    let buckets = merge_siblings(roots);
    let max_depth = buckets
        .iter()
        .map(|b| bucket_depth(b, total))
        .max()
        .unwrap_or(0);

    let mut rects = Vec::new();
    let mut x = 0.0;
    for bucket in &buckets {
        x = emit_bucket(bucket, 0, x, total, &mut rects);
    }
    log::debug!(
        "laid out {} rects over {} levels ({} events)",
        rects.len(),
        max_depth,
        total
    );

    FlameLayout {
        orientation,
        total_events: total,
        max_depth,
        rects,
    }
}

/// Flame graph for one thread's forward call graph. The synthetic
/// whole-thread root is not drawn; its children are the depth-0 frames.
pub fn layout_thread(thread: &ThreadSample) -> FlameLayout {
    let roots: Vec<&CallNode> = thread.call_graph.children.iter().collect();
    layout_forest(&roots, Orientation::Forward)
}

/// Flame graphs focused on one function: callees of the function from the
/// forward graph, and callers of it from the reverse graph (drawn growing
/// downward).
pub fn layout_function(thread: &ThreadSample, function_id: u32) -> (FlameLayout, FlameLayout) {
    let callees = thread.call_graph.collect_matching(function_id);
    let callers = thread.reverse_graph.collect_matching(function_id);
    (
        layout_forest(&callees, Orientation::Forward),
        layout_forest(&callers, Orientation::Reverse),
    )
}

fn width_percent(events: u64, total: u64) -> f64 {
    events as f64 * 100.0 / total as f64
}

/// Visible depth of a bucket under the pruning rule: 0 if the bucket itself
/// is pruned, else one more than its deepest visible child.
fn bucket_depth(bucket: &VisualBucket<'_>, total: u64) -> u32 {
    if width_percent(bucket.subtree_events(), total) < MIN_WIDTH_PERCENT {
        return 0;
    }
    let children = merge_siblings(&bucket.child_nodes());
    1 + children
        .iter()
        .map(|c| bucket_depth(c, total))
        .max()
        .unwrap_or(0)
}

/// Emit rects for a bucket and its subtree. Returns the x offset for the
/// next sibling; a pruned bucket consumes no horizontal space.
fn emit_bucket(
    bucket: &VisualBucket<'_>,
    depth: u32,
    x: f64,
    total: u64,
    rects: &mut Vec<LayoutRect>,
) -> f64 {
    let subtree_events = bucket.subtree_events();
    let width = width_percent(subtree_events, total);
    if width < MIN_WIDTH_PERCENT {
        return x;
    }

    rects.push(LayoutRect {
        function_id: bucket.function_id(),
        depth,
        x_percent: x,
        width_percent: width,
        subtree_events,
    });

    let mut child_x = x;
    for child in &merge_siblings(&bucket.child_nodes()) {
        child_x = emit_bucket(child, depth + 1, child_x, total, rects);
    }
    x + width
}
