//! Path listing parser.
//!
//! Turns a flat list of '/'-separated file paths into a rooted tree.
//! The root is named after the longest common segment prefix, and each
//! remaining path segment becomes a child node in first-seen order.

use super::schema::{DisplayState, TreeNode};
use crate::utils::error::ParseError;
use log::debug;

/// Parse a path listing file into a tree
///
/// **Public** - main entry point for path imports
///
/// One path per line; blank lines are ignored.
///
/// # Errors
/// * `ParseError::EmptyInput` - no non-blank lines
pub fn parse_path_listing(content: &str) -> Result<TreeNode, ParseError> {
    let paths: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    build_path_tree(&paths)
}

/// Build a tree from a collection of paths
///
/// **Public** - used directly by tests and callers that already hold paths
///
/// # Errors
/// * `ParseError::EmptyInput` - the collection is empty
pub fn build_path_tree(paths: &[&str]) -> Result<TreeNode, ParseError> {
    if paths.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let prefix = find_common_prefix(paths);
    debug!("Common prefix: {:?}", prefix);

    // Fall back to the first path's first segment when nothing is shared.
    // Inconsistent with the prefix rule but long-standing behavior.
    let root_name = if prefix.is_empty() {
        paths[0].split('/').next().unwrap_or_default().to_string()
    } else {
        prefix.join("/")
    };

    let mut root = TreeNode {
        display: DisplayState::expanded(),
        ..TreeNode::new(root_name)
    };

    for path in paths {
        insert_path(&mut root, path, prefix.len());
    }

    debug!("Built path tree with {} nodes", root.node_count());

    Ok(root)
}

/// Longest segment prefix shared by every path
///
/// **Private** - internal helper for build_path_tree
fn find_common_prefix<'a>(paths: &[&'a str]) -> Vec<&'a str> {
    let split: Vec<Vec<&str>> = paths.iter().map(|p| p.split('/').collect()).collect();
    let min_len = split.iter().map(Vec::len).min().unwrap_or(0);

    let mut prefix = Vec::new();
    for i in 0..min_len {
        let candidate = split[0][i];
        if split.iter().all(|parts| parts[i] == candidate) {
            prefix.push(candidate);
        } else {
            break;
        }
    }

    prefix
}

/// Insert one path under the root, skipping the shared prefix segments
///
/// **Private** - internal helper for build_path_tree
fn insert_path(root: &mut TreeNode, path: &str, prefix_segments: usize) {
    let mut current = root;

    for segment in path.split('/').skip(prefix_segments) {
        if segment.is_empty() {
            continue;
        }

        let position = current.children.iter().position(|c| c.name == segment);
        let index = match position {
            Some(i) => i,
            None => {
                current.children.push(TreeNode {
                    display: DisplayState::collapsed(),
                    ..TreeNode::new(segment)
                });
                current.children.len() - 1
            }
        };

        current = &mut current.children[index];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tree() {
        let root = build_path_tree(&["project/src/a.txt", "project/src/b.txt"]).unwrap();

        assert_eq!(root.name, "project");
        assert_eq!(root.children.len(), 1);

        let src = &root.children[0];
        assert_eq!(src.name, "src");
        let names: Vec<&str> = src.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_multi_segment_prefix_becomes_root() {
        let root = build_path_tree(&["a/b/c/one.rs", "a/b/c/two.rs", "a/b/c/d/three.rs"]).unwrap();

        assert_eq!(root.name, "a/b/c");
        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["one.rs", "two.rs", "d"]);
    }

    #[test]
    fn test_no_common_prefix_falls_back_to_first_segment() {
        let root = build_path_tree(&["alpha/x.txt", "beta/y.txt"]).unwrap();

        // Root name comes from the first path, but both paths keep all
        // their segments since no prefix was stripped.
        assert_eq!(root.name, "alpha");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].name, "alpha");
        assert_eq!(root.children[1].name, "beta");
    }

    #[test]
    fn test_duplicate_paths_are_idempotent() {
        let once = build_path_tree(&["p/src/a.txt", "p/src/b.txt"]).unwrap();
        let twice = build_path_tree(&["p/src/a.txt", "p/src/b.txt", "p/src/a.txt"]).unwrap();

        assert_eq!(once.node_count(), twice.node_count());
    }

    #[test]
    fn test_path_equal_to_prefix_adds_no_node() {
        let root = build_path_tree(&["p/src", "p/src"]).unwrap();
        assert_eq!(root.name, "p/src");
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            build_path_tree(&[]),
            Err(ParseError::EmptyInput)
        ));
        assert!(matches!(
            parse_path_listing("\n  \n"),
            Err(ParseError::EmptyInput)
        ));
    }

    #[test]
    fn test_listing_ignores_blank_lines() {
        let root = parse_path_listing("p/src/a.txt\n\n  p/src/b.txt  \n").unwrap();
        assert_eq!(root.name, "p/src");
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_new_nodes_start_collapsed() {
        let root = build_path_tree(&["p/src/a.txt"]).unwrap();
        assert!(!root.display.collapsed);
        assert!(root.children[0].display.collapsed);
    }
}
