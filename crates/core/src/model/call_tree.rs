use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

/// One sampled call frame and everything called from it.
///
/// Nodes are immutable after construction; the whole tree is shared
/// read-only across every view and render pass. The subtree total is
/// computed lazily the first time it is needed and cached per node — on
/// trees with tens of thousands of nodes the layout pass asks for it at
/// every level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallNode {
    /// Function identity, resolved to a name by a [`FunctionTable`].
    ///
    /// [`FunctionTable`]: crate::model::FunctionTable
    pub function_id: u32,
    /// Events attributed to this frame itself, excluding children.
    pub self_events: u64,
    /// Callees, in sample order.
    pub children: Vec<CallNode>,
    #[serde(skip)]
    subtree_cache: OnceCell<u64>,
}

impl CallNode {
    pub fn new(function_id: u32, self_events: u64, children: Vec<CallNode>) -> Self {
        Self {
            function_id,
            self_events,
            children,
            subtree_cache: OnceCell::new(),
        }
    }

    /// Leaf constructor, common in tests and builders.
    pub fn leaf(function_id: u32, self_events: u64) -> Self {
        Self::new(function_id, self_events, Vec::new())
    }

    /// Total events in this subtree: `self_events` plus all descendants.
    pub fn subtree_events(&self) -> u64 {
        *self.subtree_cache.get_or_init(|| {
            self.self_events
                + self
                    .children
                    .iter()
                    .map(CallNode::subtree_events)
                    .sum::<u64>()
        })
    }

    /// All nodes in this subtree matching `function_id`.
    ///
    /// A matched node is collected whole; its subtree is not searched
    /// further, so the result is a forest of disjoint subtrees suitable for
    /// a function-focused flame graph.
    pub fn collect_matching(&self, function_id: u32) -> Vec<&CallNode> {
        let mut nodes = Vec::new();
        self.collect_matching_into(function_id, &mut nodes);
        nodes
    }

    fn collect_matching_into<'a>(&'a self, function_id: u32, out: &mut Vec<&'a CallNode>) {
        if self.function_id == function_id {
            out.push(self);
            return;
        }
        for child in &self.children {
            child.collect_matching_into(function_id, out);
        }
    }
}
