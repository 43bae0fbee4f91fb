//! Navigation helpers over a menu tree.
//!
//! Level codes encode the position of a menu in the tree two characters per
//! level (`01`, `0102`, `010203`). Given a route, these helpers find the menu
//! that owns it and the chain of ancestors to expand.

use std::collections::HashMap;

use super::entities::MenuTreeNode;

/// Flattens a tree into `router -> node`. Nodes without a router are skipped.
pub fn index_by_router(tree: &[MenuTreeNode]) -> HashMap<&str, &MenuTreeNode> {
    let mut index = HashMap::new();
    collect(tree, &mut index);
    index
}

fn collect<'a>(nodes: &'a [MenuTreeNode], index: &mut HashMap<&'a str, &'a MenuTreeNode>) {
    for node in nodes {
        if !node.router.is_empty() {
            index.insert(node.router.as_str(), node);
        }
        collect(&node.children, index);
    }
}

/// Finds the node owning `pathname`.
///
/// Tries the exact route first, then ever shorter prefixes down to the first
/// segment (`/a/b/c` → `/a/b` → `/a`).
pub fn find_node<'a>(
    pathname: &str,
    index: &HashMap<&str, &'a MenuTreeNode>,
) -> Option<&'a MenuTreeNode> {
    if let Some(node) = index.get(pathname) {
        return Some(*node);
    }

    let segments: Vec<&str> = pathname.split('/').collect();
    (2..segments.len())
        .rev()
        .find_map(|end| index.get(segments[..end].join("/").as_str()).copied())
}

/// Level code of the menu owning `pathname`, if any.
pub fn level_code_for<'a>(
    pathname: &str,
    index: &HashMap<&str, &'a MenuTreeNode>,
) -> Option<&'a str> {
    find_node(pathname, index).map(|n| n.level_code.as_str())
}

/// Level codes to expand so that the menu owning `pathname` is visible.
///
/// Starts at the root whose level code prefixes the target, then adds one
/// key per further level.
pub fn menu_keys(
    pathname: &str,
    index: &HashMap<&str, &MenuTreeNode>,
    roots: &[MenuTreeNode],
) -> Vec<String> {
    let Some(level_code) = level_code_for(pathname, index).filter(|c| !c.is_empty()) else {
        return Vec::new();
    };

    let mut prefix = roots
        .iter()
        .map(|r| r.level_code.as_str())
        .find(|code| !code.is_empty() && level_code.starts_with(code))
        .unwrap_or_default()
        .to_string();

    let mut keys = Vec::new();
    if !prefix.is_empty() {
        keys.push(prefix.clone());
    }

    for (i, ch) in level_code.chars().skip(prefix.chars().count()).enumerate() {
        prefix.push(ch);
        if (i + 1) % 2 == 0 {
            keys.push(prefix.clone());
        }
    }

    keys
}

/// Record ids of the ancestors of `node`, taken from its `parent_path`.
pub fn open_keys(node: &MenuTreeNode) -> Vec<String> {
    node.parent_path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
