//! Substring search filter.
//!
//! Prunes a tree down to nodes whose names contain a search term, keeping
//! every ancestor of a match and one level of children below it so the
//! renderer retains context. The input tree is never mutated.

use crate::parser::schema::TreeNode;
use log::debug;

/// Filter a tree by case-insensitive substring match
///
/// **Public** - main entry point for search
///
/// An empty term returns a clone of the input. With zero matches the
/// result is a single-node tree holding only the root.
pub fn filter_by_match(tree: &TreeNode, term: &str) -> TreeNode {
    if term.is_empty() {
        return tree.clone();
    }

    let term_lower = term.to_lowercase();
    let mut copy = tree.clone();

    mark_matches(&mut copy, &term_lower);
    copy.display.included = true;

    let before = copy.node_count();
    let result = prune(copy).expect("root is always included");
    debug!(
        "Search '{}': kept {} of {} nodes",
        term,
        result.node_count(),
        before
    );

    result
}

/// Mark matches, their ancestors, and their direct children as included
///
/// **Private** - first pass; returns whether the subtree holds a match
fn mark_matches(node: &mut TreeNode, term_lower: &str) -> bool {
    let hit = node.name.to_lowercase().contains(term_lower);
    if hit {
        node.display.included = true;
        node.display.collapsed = false;
        // One level of context below the match
        for child in &mut node.children {
            child.display.included = true;
            child.display.collapsed = false;
        }
    }

    let mut subtree_hit = hit;
    for child in &mut node.children {
        if mark_matches(child, term_lower) {
            subtree_hit = true;
        }
    }

    // Ancestors of a match survive pruning
    if subtree_hit {
        node.display.included = true;
        node.display.collapsed = false;
    }

    subtree_hit
}

/// Drop unmarked subtrees and clear the pass-scoped markers
///
/// **Private** - second pass, bottom-up
fn prune(mut node: TreeNode) -> Option<TreeNode> {
    if !node.display.included {
        return None;
    }

    let children = std::mem::take(&mut node.children);
    node.children = children.into_iter().filter_map(prune).collect();
    node.display.included = false;

    Some(node)
}
