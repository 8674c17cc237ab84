//! Combinators for assembling layout trees.
//!
//! Every combinator applies the auto-flatten rule: an operand that is
//! already a group of the requested grouping has its children spliced into
//! the result instead of being nested. Chains therefore build one flat group
//! regardless of associativity:
//!
//! ```
//! use mosaic_layout::{LayoutNode, StaticPanel, Grouping};
//!
//! let a = LayoutNode::leaf(StaticPanel::new((10, 10)).shared());
//! let b = LayoutNode::leaf(StaticPanel::new((10, 10)).shared());
//! let c = LayoutNode::leaf(StaticPanel::new((10, 10)).shared());
//! let row = (a | b) | c;
//! assert_eq!(row.grouping(), Some(Grouping::Horizontal));
//! assert_eq!(row.children().len(), 3);
//! ```
//!
//! The named combinators return [`LayoutError::EmptyOperand`] for a group
//! with no children. The operators (`|`, `/`, `^`) cannot fail; they nest an
//! empty operand instead, and the constraint pass reports it.

use std::ops::{BitOr, BitXor, Div};
use std::rc::Rc;

use crate::error::LayoutError;
use crate::node::{Group, Grouping, LayoutNode, NodeKind};
use crate::panel::Panel;

/// Conversion into a layout node.
///
/// Panels become leaves; nodes pass through unchanged.
pub trait IntoLayoutNode {
    fn into_layout_node(self) -> LayoutNode;
}

impl IntoLayoutNode for LayoutNode {
    fn into_layout_node(self) -> LayoutNode {
        self
    }
}

impl<P: Panel + 'static> IntoLayoutNode for Rc<P> {
    fn into_layout_node(self) -> LayoutNode {
        LayoutNode::leaf(self)
    }
}

impl<P: Panel + 'static> IntoLayoutNode for &Rc<P> {
    fn into_layout_node(self) -> LayoutNode {
        LayoutNode::leaf(Rc::clone(self) as Rc<dyn Panel>)
    }
}

impl IntoLayoutNode for Rc<dyn Panel> {
    fn into_layout_node(self) -> LayoutNode {
        LayoutNode::leaf(self)
    }
}

impl IntoLayoutNode for &Rc<dyn Panel> {
    fn into_layout_node(self) -> LayoutNode {
        LayoutNode::leaf(Rc::clone(self))
    }
}

/// Combine two operands under `grouping`, rejecting empty groups.
pub fn join(
    grouping: Grouping,
    lhs: impl IntoLayoutNode,
    rhs: impl IntoLayoutNode,
) -> Result<LayoutNode, LayoutError> {
    let lhs = lhs.into_layout_node();
    let rhs = rhs.into_layout_node();
    if lhs.is_empty() || rhs.is_empty() {
        return Err(LayoutError::EmptyOperand { grouping });
    }
    Ok(join_nodes(grouping, lhs, rhs))
}

/// Combine two nodes under `grouping` without validation.
///
/// The result is always a new group. Spliced operands contribute their
/// children only; of their own settings just the left operand's selected tab
/// carries over. Empty groups are nested as children, never spliced.
pub fn join_nodes(grouping: Grouping, lhs: LayoutNode, rhs: LayoutNode) -> LayoutNode {
    let mut children = Vec::new();
    let selected_tab = match splice(grouping, lhs) {
        Ok(group) => {
            children.extend(group.children);
            group.selected_tab
        }
        Err(lhs) => {
            children.push(lhs);
            0
        }
    };
    match splice(grouping, rhs) {
        Ok(group) => children.extend(group.children),
        Err(rhs) => children.push(rhs),
    }
    LayoutNode::group(grouping, children).with_selected_tab(selected_tab)
}

/// `Ok(group)` if `node` is a non-empty group of `grouping` whose children
/// can be spliced, `Err(node)` otherwise.
fn splice(grouping: Grouping, node: LayoutNode) -> Result<Group, LayoutNode> {
    let splices = matches!(
        &node.kind,
        NodeKind::Group(group) if group.grouping == grouping && !group.children.is_empty()
    );
    match node.kind {
        NodeKind::Group(group) if splices => Ok(group),
        kind => Err(LayoutNode { kind, ..node }),
    }
}

/// One child shown at a time.
pub fn tabbed(
    lhs: impl IntoLayoutNode,
    rhs: impl IntoLayoutNode,
) -> Result<LayoutNode, LayoutError> {
    join(Grouping::Tabbed, lhs, rhs)
}

/// Side by side, left to right.
pub fn horizontal(
    lhs: impl IntoLayoutNode,
    rhs: impl IntoLayoutNode,
) -> Result<LayoutNode, LayoutError> {
    join(Grouping::Horizontal, lhs, rhs)
}

/// One above the other, first on top.
pub fn vertical(
    lhs: impl IntoLayoutNode,
    rhs: impl IntoLayoutNode,
) -> Result<LayoutNode, LayoutError> {
    join(Grouping::Vertical, lhs, rhs)
}

/// Overlaid, drawn first to last.
pub fn stacked(
    lhs: impl IntoLayoutNode,
    rhs: impl IntoLayoutNode,
) -> Result<LayoutNode, LayoutError> {
    join(Grouping::Stacked, lhs, rhs)
}

/// Pack `items` into an aspect-preserving grid.
///
/// A single item is returned unchanged. Flex operands are spliced like any
/// other same-grouping operand.
pub fn flex<I>(items: I) -> Result<LayoutNode, LayoutError>
where
    I: IntoIterator,
    I::Item: IntoLayoutNode,
{
    fold(Grouping::Flex, items)
}

/// Tabbed group over `items`; a single item is returned unchanged.
pub fn tabs<I>(items: I) -> Result<LayoutNode, LayoutError>
where
    I: IntoIterator,
    I::Item: IntoLayoutNode,
{
    fold(Grouping::Tabbed, items)
}

fn fold<I>(grouping: Grouping, items: I) -> Result<LayoutNode, LayoutError>
where
    I: IntoIterator,
    I::Item: IntoLayoutNode,
{
    let mut items = items.into_iter().map(IntoLayoutNode::into_layout_node);
    let Some(first) = items.next() else {
        return Err(LayoutError::EmptyOperand { grouping });
    };
    if first.is_empty() {
        return Err(LayoutError::EmptyOperand { grouping });
    }
    items.try_fold(first, |acc, item| join(grouping, acc, item))
}

impl<R: IntoLayoutNode> BitOr<R> for LayoutNode {
    type Output = LayoutNode;

    fn bitor(self, rhs: R) -> LayoutNode {
        join_nodes(Grouping::Horizontal, self, rhs.into_layout_node())
    }
}

impl<R: IntoLayoutNode> Div<R> for LayoutNode {
    type Output = LayoutNode;

    fn div(self, rhs: R) -> LayoutNode {
        join_nodes(Grouping::Vertical, self, rhs.into_layout_node())
    }
}

impl<R: IntoLayoutNode> BitXor<R> for LayoutNode {
    type Output = LayoutNode;

    fn bitxor(self, rhs: R) -> LayoutNode {
        join_nodes(Grouping::Stacked, self, rhs.into_layout_node())
    }
}

/// Build a tabbed group from heterogeneous operands.
///
/// Expands to a `Result`; see [`tabs`](crate::builder::tabs).
#[macro_export]
macro_rules! tabs {
    ($($item:expr),+ $(,)?) => {
        $crate::builder::tabs(::std::vec![
            $($crate::builder::IntoLayoutNode::into_layout_node($item)),+
        ])
    };
}

/// Build a flex group from heterogeneous operands.
///
/// Expands to a `Result`; see [`flex`](crate::builder::flex).
#[macro_export]
macro_rules! flex {
    ($($item:expr),+ $(,)?) => {
        $crate::builder::flex(::std::vec![
            $($crate::builder::IntoLayoutNode::into_layout_node($item)),+
        ])
    };
}
