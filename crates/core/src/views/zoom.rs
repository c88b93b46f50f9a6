use serde::{Deserialize, Serialize};

use emberscope_protocol::LayoutRect;

/// Slack for the containment test, absorbing floating-point drift from the
/// running x-offset sums.
pub const CONTAINMENT_EPSILON: f64 = 1e-9;

/// One saved viewport: the origin geometry of the bar that was zoomed into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomFrame {
    pub origin_x: f64,
    pub origin_width: f64,
    pub depth: u32,
}

impl ZoomFrame {
    /// The unzoomed root view: full width, depth 0. Projecting through it
    /// is the identity.
    pub const ROOT: ZoomFrame = ZoomFrame {
        origin_x: 0.0,
        origin_width: 100.0,
        depth: 0,
    };
}

/// Zoom state for one flame graph.
///
/// A stack of viewports whose bottom entry is always the root sentinel.
/// Zooming never recomputes layout: the current top frame filters and
/// affinely rescales the unchanged base geometry, so any zoom state can be
/// re-derived in O(visible rects).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomStack {
    frames: Vec<ZoomFrame>,
}

impl ZoomStack {
    pub fn new() -> Self {
        Self {
            frames: vec![ZoomFrame::ROOT],
        }
    }

    /// Push the viewport of a clicked bar.
    pub fn zoom_in(&mut self, rect: &LayoutRect) {
        self.frames.push(ZoomFrame {
            origin_x: rect.x_percent,
            origin_width: rect.width_percent,
            depth: rect.depth,
        });
    }

    /// Pop the top viewport. Popping the root sentinel is a no-op; returns
    /// whether anything was popped.
    pub fn zoom_out(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    pub fn is_zoomed(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn top(&self) -> ZoomFrame {
        self.frames.last().copied().unwrap_or(ZoomFrame::ROOT)
    }

    /// Project base geometry through the current viewport: keep rects at or
    /// below the frame's depth whose extent is fully contained (within
    /// [`CONTAINMENT_EPSILON`]) in the frame, rescaled to the full width.
    pub fn project(&self, rects: &[LayoutRect]) -> Vec<LayoutRect> {
        let frame = self.top();
        let scale = 100.0 / frame.origin_width;
        let right_bound = frame.origin_x + frame.origin_width;

        rects
            .iter()
            .filter(|r| {
                r.depth >= frame.depth
                    && r.x_percent >= frame.origin_x - CONTAINMENT_EPSILON
                    && r.right_percent() <= right_bound + CONTAINMENT_EPSILON
            })
            .map(|r| LayoutRect {
                function_id: r.function_id,
                depth: r.depth - frame.depth,
                x_percent: (r.x_percent - frame.origin_x) * scale,
                width_percent: r.width_percent * scale,
                subtree_events: r.subtree_events,
            })
            .collect()
    }
}

impl Default for ZoomStack {
    fn default() -> Self {
        Self::new()
    }
}
