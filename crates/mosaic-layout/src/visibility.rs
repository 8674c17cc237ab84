//! Show/hide commands.
//!
//! Visibility is a per-node flag, independent of the layout passes. A panel
//! is addressed by identity: the same `Rc` that was placed in the tree. Two
//! distinct panels with equal contents are never confused.
//!
//! A node is *rendered* only when it and every ancestor are shown and it lies
//! on the selected path of every tabbed ancestor. Hiding a group therefore
//! hides its whole subtree without touching the descendants' own flags;
//! showing the group again restores them as they were.

use std::rc::Rc;

use crate::node::{Grouping, LayoutNode, NodeKind};

impl LayoutNode {
    /// The node's own visibility flag.
    pub fn is_shown(&self) -> bool {
        self.visible
    }

    /// Set the node's own visibility flag.
    pub fn show(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Shorthand for `show(false)`.
    pub fn hide(&mut self) {
        self.show(false);
    }

    /// Set the flag of every leaf in this subtree that holds `panel`.
    ///
    /// Returns the number of leaves changed. Zero means the panel is not in
    /// this subtree.
    pub fn show_panel<P: ?Sized>(&mut self, panel: &Rc<P>, visible: bool) -> usize {
        if let NodeKind::Group(group) = &mut self.kind {
            return group
                .children
                .iter_mut()
                .map(|child| child.show_panel(panel, visible))
                .sum();
        }
        if self.holds_panel(panel) {
            self.visible = visible;
            1
        } else {
            0
        }
    }
}

/// Whether the node at `path` below `root` is rendered.
///
/// `None` when the path does not name a node.
pub(crate) fn is_rendered(root: &LayoutNode, path: &[usize]) -> Option<bool> {
    let mut node = root;
    let mut rendered = root.visible;
    for &index in path {
        let child = node.child(index)?;
        if let NodeKind::Group(group) = &node.kind
            && group.grouping == Grouping::Tabbed
            && group.selected_tab != index
        {
            rendered = false;
        }
        rendered &= child.visible;
        node = child;
    }
    Some(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::StaticPanel;

    fn sample() -> (LayoutNode, Rc<StaticPanel>, Rc<StaticPanel>) {
        let a = StaticPanel::new((10, 10)).named("a").shared();
        let b = StaticPanel::new((10, 10)).named("b").shared();
        let tree = LayoutNode::group(
            Grouping::Horizontal,
            vec![
                LayoutNode::leaf(a.clone()),
                LayoutNode::group(
                    Grouping::Vertical,
                    vec![LayoutNode::leaf(b.clone()), LayoutNode::leaf(a.clone())],
                ),
            ],
        );
        (tree, a, b)
    }

    #[test]
    fn show_panel_matches_every_leaf_by_identity() {
        let (mut tree, a, b) = sample();
        assert_eq!(tree.show_panel(&a, false), 2);
        assert!(!tree.children()[0].is_shown());
        assert!(!tree.descendant(&[1, 1]).is_some_and(LayoutNode::is_shown));
        assert!(tree.descendant(&[1, 0]).is_some_and(LayoutNode::is_shown));
        assert_eq!(tree.show_panel(&b, false), 1);
    }

    #[test]
    fn equal_but_distinct_panel_is_not_matched() {
        let (mut tree, _, _) = sample();
        let stranger = StaticPanel::new((10, 10)).named("a").shared();
        assert_eq!(tree.show_panel(&stranger, false), 0);
        let mut visible = 0;
        tree.walk(&mut |_, node| visible += usize::from(node.is_shown()));
        assert_eq!(visible, tree.node_count());
    }

    #[test]
    fn hiding_root_gates_descendants_without_clearing_them() {
        let (mut tree, _, b) = sample();
        tree.show_panel(&b, false);
        tree.hide();
        assert!(!tree.is_shown());
        assert_eq!(is_rendered(&tree, &[0]), Some(false));
        assert_eq!(is_rendered(&tree, &[1, 1]), Some(false));

        tree.show(true);
        assert_eq!(is_rendered(&tree, &[0]), Some(true));
        assert_eq!(is_rendered(&tree, &[1, 0]), Some(false));
        assert_eq!(is_rendered(&tree, &[1, 1]), Some(true));
    }

    #[test]
    fn unselected_tabs_are_not_rendered() {
        let tree = LayoutNode::group(
            Grouping::Tabbed,
            vec![
                LayoutNode::leaf(StaticPanel::new((1, 1)).shared()),
                LayoutNode::group(
                    Grouping::Stacked,
                    vec![LayoutNode::leaf(StaticPanel::new((1, 1)).shared())],
                ),
            ],
        );
        assert_eq!(is_rendered(&tree, &[0]), Some(true));
        assert_eq!(is_rendered(&tree, &[1]), Some(false));
        assert_eq!(is_rendered(&tree, &[1, 0]), Some(false));
        assert_eq!(is_rendered(&tree, &[2]), None);
    }
}
