// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Namespace-aware lookups over AWS XML responses
//!
//! Paths are `/`-separated child element names relative to `element`, all in
//! the same namespace (e.g. `Instances/member/InstanceId`).

use roxmltree::Node;

/// Every element reachable from `element` along `path`
pub fn find_all<'a, 'input>(
    element: Node<'a, 'input>,
    path: &str,
    namespace: &str,
) -> Vec<Node<'a, 'input>> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(vec![element], |current, segment| {
            current
                .into_iter()
                .flat_map(|node| node.children())
                .filter(|child| child.is_element() && child.has_tag_name((namespace, segment)))
                .collect()
        })
}

/// First element along `path`
pub fn find<'a, 'input>(
    element: Node<'a, 'input>,
    path: &str,
    namespace: &str,
) -> Option<Node<'a, 'input>> {
    find_all(element, path, namespace).into_iter().next()
}

/// Text of the first element along `path`; `None` when absent or empty
pub fn find_text(element: Node<'_, '_>, path: &str, namespace: &str) -> Option<String> {
    find(element, path, namespace)
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Text of the first descendant with the given local name, ignoring namespaces
///
/// Error documents are not always namespaced, so error parsing matches on the
/// local name only.
pub fn find_descendant_text(element: Node<'_, '_>, name: &str) -> Option<String> {
    element
        .descendants()
        .find(|node| node.is_element() && node.tag_name().name() == name)
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
