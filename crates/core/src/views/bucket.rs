use std::collections::HashMap;

use crate::model::CallNode;

/// One visual box at one flame-graph level: either a single call node, or
/// several sibling nodes that share a function and are drawn as one box.
///
/// Independent call paths can reach the same function, and the graph shows
/// one box per function per level, not one per path. Buckets borrow the
/// tree, live for a single layout pass, and never mutate the nodes.
#[derive(Debug, Clone)]
pub enum VisualBucket<'a> {
    Single(&'a CallNode),
    Merged(Vec<&'a CallNode>),
}

impl<'a> VisualBucket<'a> {
    pub fn function_id(&self) -> u32 {
        match self {
            VisualBucket::Single(node) => node.function_id,
            // Members always share one function id; the first speaks for all.
            VisualBucket::Merged(nodes) => nodes[0].function_id,
        }
    }

    /// Combined subtree total of all members.
    pub fn subtree_events(&self) -> u64 {
        match self {
            VisualBucket::Single(node) => node.subtree_events(),
            VisualBucket::Merged(nodes) => nodes.iter().map(|n| n.subtree_events()).sum(),
        }
    }

    /// Children of every member, in member order — the input to the next
    /// level's merge.
    pub fn child_nodes(&self) -> Vec<&'a CallNode> {
        match self {
            VisualBucket::Single(node) => node.children.iter().collect(),
            VisualBucket::Merged(nodes) => {
                nodes.iter().flat_map(|n| n.children.iter()).collect()
            }
        }
    }
}

/// Group sibling nodes by function id, preserving first-seen order of
/// distinct ids. Singleton groups stay `Single`; multi-member groups become
/// `Merged`. Empty input yields an empty result.
pub fn merge_siblings<'a>(nodes: &[&'a CallNode]) -> Vec<VisualBucket<'a>> {
    let mut slot_by_id: HashMap<u32, usize> = HashMap::new();
    let mut groups: Vec<Vec<&CallNode>> = Vec::new();
    for &node in nodes {
        match slot_by_id.get(&node.function_id) {
            Some(&slot) => groups[slot].push(node),
            None => {
                slot_by_id.insert(node.function_id, groups.len());
                groups.push(vec![node]);
            }
        }
    }
    groups
        .into_iter()
        .map(|mut group| {
            if group.len() == 1 {
                VisualBucket::Single(group.remove(0))
            } else {
                VisualBucket::Merged(group)
            }
        })
        .collect()
}
