use serde::{Deserialize, Serialize};

/// Geometry for one flame-graph bar, produced by the layout algorithm and
/// consumed by renderers and the zoom controller.
///
/// Horizontal extent is expressed in percent of the drawing width so the
/// layout is independent of the rendered pixel size. `subtree_events` is
/// carried along so weight strings can be re-resolved on a mode change
/// without re-running layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    /// Function identity of the bar (resolved to a name by the caller).
    pub function_id: u32,
    /// Stack depth, 0 = the graph's entry level.
    pub depth: u32,
    /// Left edge in [0, 100].
    pub x_percent: f64,
    /// Width in (0, 100].
    pub width_percent: f64,
    /// Combined subtree event count of the frames behind this bar.
    pub subtree_events: u64,
}

impl LayoutRect {
    /// Right edge in percent.
    pub fn right_percent(&self) -> f64 {
        self.x_percent + self.width_percent
    }
}

/// Which way the call graph grows.
///
/// Forward graphs (callees) put the entry frames at the bottom and grow
/// upward; reverse graphs (callers) put them near the top and grow downward.
/// The layout itself is identical — only the depth-to-vertical mapping
/// differs, so that mapping lives here for renderers to share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    /// Top y coordinate of a bar at `depth`, for a drawing region sized to
    /// `max_depth + header_rows` rows of `row_height`. Every bar's extent
    /// stays inside the region; the depth-0 row of a forward graph sits
    /// flush with the bottom edge.
    pub fn y_for_depth(&self, depth: u32, max_depth: u32, row_height: f64, header_rows: u32) -> f64 {
        let total_rows = max_depth + header_rows;
        match self {
            Orientation::Forward => f64::from(total_rows - depth - 1) * row_height,
            Orientation::Reverse => f64::from(depth + header_rows) * row_height,
        }
    }
}
