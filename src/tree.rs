//! Helpers over the roxmltree DOM. Elements are matched by local name so
//! that KML 2.1, 2.2 and un-namespaced files read the same way.

use roxmltree::Node;

pub fn is(node: &Node, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

pub fn child<'a, 'input>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| is(c, tag))
}

pub fn child_text<'a>(node: &Node<'a, '_>, tag: &str) -> Option<&'a str> {
    child(node, tag).and_then(|c| c.text()).map(str::trim)
}

/// `<name>` of a folder or placemark, falling back to `default`.
pub fn name_or(node: &Node, default: &str) -> String {
    match child_text(node, "name") {
        Some(name) => name.to_string(),
        None => default.to_string(),
    }
}

/// Descendant elements with the given tag, excluding `node` itself.
pub fn descendants<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants().filter(move |d| *d != node && is(d, tag))
}

pub fn child_folders<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|c| is(c, "Folder"))
}

/// Folders strictly above `node`, nearest first.
pub fn ancestor_folders<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.ancestors().skip(1).filter(|a| is(a, "Folder"))
}
