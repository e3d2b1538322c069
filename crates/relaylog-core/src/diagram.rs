//! Debug rendering of a tree.

use std::fmt::{Debug, Write};

use crate::node::Link;

const INDENT: usize = 4;

/// Sideways rendering: one element per line, indented by depth, with the
/// right subtree above its parent and the left subtree below.
pub(crate) fn render<T: Debug>(root: &Link<T>) -> String {
    let mut out = String::new();
    render_into(root, 0, &mut out);
    out
}

fn render_into<T: Debug>(link: &Link<T>, depth: usize, out: &mut String) {
    if let Some(node) = link {
        render_into(&node.right, depth + 1, out);
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{:indent$}{:?}", "", node.value, indent = depth * INDENT);
        render_into(&node.left, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use crate::OrdTree;

    #[test]
    fn test_diagram() {
        let tree: OrdTree<i32> = [2, 1, 3].into_iter().collect();
        assert_eq!(tree.diagram(), "    3\n2\n    1\n");
    }

    #[test]
    fn test_diagram_empty() {
        assert_eq!(OrdTree::<i32>::new().diagram(), "");
    }
}
