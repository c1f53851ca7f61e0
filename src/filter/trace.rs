//! Trace-driven tree projection.
//!
//! Resolves each traced namespace onto a path in the structural tree,
//! attaches its call statistics, prunes everything that carries no trace
//! information, and propagates aggregate stats bottom-up. The input tree
//! is never mutated.

use super::stats::propagate_stats;
use crate::parser::schema::{NamespaceMap, NamespaceRecord, TraceData, TreeNode};
use crate::utils::config::{ROOT_WRAPPER_SEGMENTS, SOURCE_FILE_SUFFIXES};
use crate::utils::error::FilterError;
use log::{debug, warn};

/// Project a namespace map onto a tree
///
/// **Public** - main entry point for trace filtering
///
/// With no namespace map this is an identity passthrough. Namespaces
/// that resolve to no tree path are skipped with a warning.
pub fn filter_by_trace(tree: &TreeNode, namespaces: Option<&NamespaceMap>) -> TreeNode {
    let Some(namespaces) = namespaces else {
        return tree.clone();
    };

    let mut copy = reroot(tree).clone();

    let mut resolved = 0usize;
    for (namespace, record) in namespaces {
        match annotate_namespace(&mut copy, namespace, record) {
            Ok(()) => resolved += 1,
            Err(err) => warn!("{}", err),
        }
    }
    debug!(
        "Resolved {} of {} namespaces onto the tree",
        resolved,
        namespaces.len()
    );

    copy.display.included = true;
    let mut result = prune_unincluded(copy).expect("root is always included");

    propagate_stats(&mut result);

    result
}

/// Skip a lone wrapper directory under the root
///
/// **Private** - namespace paths never include the repository wrapper
fn reroot(tree: &TreeNode) -> &TreeNode {
    if tree.children.len() == 1 && ROOT_WRAPPER_SEGMENTS.contains(&tree.children[0].name.as_str())
    {
        return &tree.children[0];
    }
    tree
}

/// Dotted namespace to tree path segments, dashes mapped to underscores
///
/// **Private** - namespace → filename convention
fn namespace_segments(namespace: &str) -> Vec<String> {
    namespace
        .split('.')
        .map(|part| part.replace('-', "_"))
        .collect()
}

/// Resolve one namespace and attach its statistics
///
/// **Private** - resolution failure is reported, not fatal
fn annotate_namespace(
    root: &mut TreeNode,
    namespace: &str,
    record: &NamespaceRecord,
) -> Result<(), FilterError> {
    let segments = namespace_segments(namespace);

    let mut chain = Vec::new();
    if !resolve(root, &segments, 0, &mut chain) {
        return Err(FilterError::UnresolvedNamespace(namespace.to_string()));
    }

    // Mark the path and attach stats at its end; attachment replaces any
    // earlier annotation on the same node.
    let mut current = root;
    current.display.included = true;
    current.display.collapsed = false;
    for index in chain {
        current = &mut current.children[index];
        current.display.included = true;
        current.display.collapsed = false;
    }

    current.trace_data = Some(TraceData {
        total_n_calls: record.total_n_calls,
        min_n_calls: 0,
        max_n_calls: 0,
        functions: record.functions.clone(),
    });

    Ok(())
}

/// Walk the tree matching namespace segments, recording child indices
///
/// **Private** - a node whose own name equals the current segment
/// consumes it without descending; the final segment also matches with
/// a canonical source-file suffix appended.
fn resolve(node: &TreeNode, segments: &[String], index: usize, chain: &mut Vec<usize>) -> bool {
    if index >= segments.len() {
        return true;
    }

    if node.name == segments[index] {
        return resolve(node, segments, index + 1, chain);
    }

    let segment = &segments[index];
    let is_final = index == segments.len() - 1;

    let position = node.children.iter().position(|child| {
        if is_final {
            SOURCE_FILE_SUFFIXES
                .iter()
                .any(|suffix| child.name.len() == segment.len() + suffix.len()
                    && child.name.starts_with(segment.as_str())
                    && child.name.ends_with(suffix))
        } else {
            child.name == *segment
        }
    });

    match position {
        Some(i) => {
            chain.push(i);
            resolve(&node.children[i], segments, index + 1, chain)
        }
        None => false,
    }
}

/// Keep only nodes marked included, clearing the markers
///
/// **Private** - top-down copy of the surviving structure
fn prune_unincluded(mut node: TreeNode) -> Option<TreeNode> {
    if !node.display.included {
        return None;
    }

    let children = std::mem::take(&mut node.children);
    node.children = children.into_iter().filter_map(prune_unincluded).collect();
    node.display.included = false;

    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::paths::build_path_tree;
    use crate::parser::trace_log::parse_trace_log;

    fn sample_tree() -> TreeNode {
        build_path_tree(&[
            "repo/src/app/core.clj",
            "repo/src/app/web/handler.clj",
            "repo/src/app/util.clj",
            "repo/docs/readme.md",
        ])
        .unwrap()
    }

    #[test]
    fn test_passthrough_without_namespaces() {
        let tree = sample_tree();
        let filtered = filter_by_trace(&tree, None);
        assert_eq!(filtered, tree);
    }

    #[test]
    fn test_namespace_resolves_with_file_suffix() {
        let tree = sample_tree();
        let log = "\
TRACE t1: (src.app.core/init)
TRACE t1: => :ok
TRACE t2: (src.app.core/run)
TRACE t2: => :ok
";
        let namespaces = parse_trace_log(log).unwrap();
        let filtered = filter_by_trace(&tree, Some(&namespaces));

        // repo -> src -> app -> core.clj, docs pruned away
        assert_eq!(filtered.name, "repo");
        assert_eq!(filtered.children.len(), 1);
        let src = &filtered.children[0];
        assert_eq!(src.name, "src");
        let app = &src.children[0];
        assert_eq!(app.name, "app");
        assert_eq!(app.children.len(), 1);

        let core = &app.children[0];
        assert_eq!(core.name, "core.clj");
        let data = core.trace_data.as_ref().unwrap();
        assert_eq!(data.total_n_calls, 2);
        assert!(data.functions.contains_key("init"));
        assert!(data.functions.contains_key("run"));
    }

    #[test]
    fn test_unresolved_namespace_is_skipped() {
        let tree = sample_tree();
        let log = "\
TRACE t1: (src.app.core/init)
TRACE t1: => 1
TRACE t2: (no.such.namespace/f)
TRACE t2: => 2
";
        let namespaces = parse_trace_log(log).unwrap();
        let filtered = filter_by_trace(&tree, Some(&namespaces));

        // The resolvable namespace still lands
        assert_eq!(filtered.trace_data.as_ref().unwrap().total_n_calls, 1);
    }

    #[test]
    fn test_dashes_map_to_underscores() {
        let tree =
            build_path_tree(&["repo/src/my_app/the_core.clj", "repo/docs/notes.md"]).unwrap();
        let log = "TRACE t1: (src.my-app.the-core/go)\n";
        let namespaces = parse_trace_log(log).unwrap();
        let filtered = filter_by_trace(&tree, Some(&namespaces));

        let src = &filtered.children[0];
        assert_eq!(src.children[0].name, "my_app");
        assert_eq!(src.children[0].children[0].name, "the_core.clj");
    }

    #[test]
    fn test_reroot_skips_wrapper_child() {
        let mut wrapped = TreeNode::new("root");
        wrapped.children.push(TreeNode::new("metabase"));
        assert_eq!(reroot(&wrapped).name, "metabase");

        // Two children: no re-rooting even if one is a wrapper name
        let mut flat = TreeNode::new("root");
        flat.children.push(TreeNode::new("metabase"));
        flat.children.push(TreeNode::new("docs"));
        assert_eq!(reroot(&flat).name, "root");
    }

    #[test]
    fn test_stats_propagated_after_filter() {
        let tree = sample_tree();
        let log = "\
TRACE t1: (src.app.core/init)
TRACE t2: (src.app.util/helper)
TRACE t3: (src.app.util/helper)
";
        let namespaces = parse_trace_log(log).unwrap();
        let filtered = filter_by_trace(&tree, Some(&namespaces));

        let root_data = filtered.trace_data.as_ref().unwrap();
        assert_eq!(root_data.total_n_calls, 3);
        assert_eq!(root_data.min_n_calls, 1);
        assert_eq!(root_data.max_n_calls, 2);
    }

    #[test]
    fn test_input_tree_untouched() {
        let tree = sample_tree();
        let before = tree.clone();
        let log = "TRACE t1: (src.app.core/init)\n";
        let namespaces = parse_trace_log(log).unwrap();
        let _ = filter_by_trace(&tree, Some(&namespaces));
        assert_eq!(tree, before);
    }
}
