//! The layout tree data model.
//!
//! A [`LayoutNode`] is either a leaf holding a shared [`Panel`] or a group
//! arranging an ordered list of exclusively owned children. Every node also
//! carries a visibility flag, a declared aspect ratio, a declared weight and
//! a cache written only by the constraint and region passes.
//!
//! # Invariants
//!
//! 1. A leaf has a payload and no children (enforced by [`NodeKind`]).
//! 2. A group has at least one child. Empty groups can be built with
//!    [`LayoutNode::group`] but are rejected by the constraint pass.
//! 3. A tabbed group's selected tab is `< children.len()`, checked by the
//!    constraint pass and by [`LayoutTree::select_tab`](crate::LayoutTree::select_tab).
//! 4. Nodes never reference their ancestors; the tree is acyclic by ownership.

use std::fmt;
use std::rc::Rc;

use mosaic_core::geometry::{DEFAULT_ASPECT_RATIO, Rect, Size, sanitize_aspect_ratio};
use serde::{Deserialize, Serialize};

use crate::packing::FlexGrid;
use crate::panel::{Panel, panel_addr};

/// Arrangement mode of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// One child shown at a time, the selected tab.
    Tabbed,
    /// Children share the width, left to right.
    Horizontal,
    /// Children share the height, first child on top.
    Vertical,
    /// Children overlay each other, drawn first to last.
    Stacked,
    /// Children of one aspect ratio packed into a grid that fills the region.
    Flex,
}

impl Grouping {
    /// Lower-case name used in dumps and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tabbed => "tabbed",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Stacked => "stacked",
            Self::Flex => "flex",
        }
    }

    /// Primary axis for split groupings.
    #[must_use]
    pub const fn axis(self) -> Option<Axis> {
        match self {
            Self::Horizontal => Some(Axis::Horizontal),
            Self::Vertical => Some(Axis::Vertical),
            Self::Tabbed | Self::Stacked | Self::Flex => None,
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Extent of `size` along this axis.
    #[inline]
    #[must_use]
    pub const fn extent(self, size: Size) -> u32 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Extent of `size` across this axis.
    #[inline]
    #[must_use]
    pub const fn cross_extent(self, size: Size) -> u32 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }
}

/// Position of a node relative to the root: child indices from the top.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path of the root node.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of this node's `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Child indices from the root.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of steps from the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for NodePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for NodePath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl AsRef<[usize]> for NodePath {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

/// Relative claim on space beyond the minimum, per axis ("parts").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    /// Claim on extra width.
    pub x: f64,
    /// Claim on extra height.
    pub y: f64,
}

impl Weight {
    /// No claim on extra space.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// The default leaf weight.
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    /// Weight with separate claims per axis. Negative or non-finite values
    /// are clamped to zero.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: sanitize_weight(x),
            y: sanitize_weight(y),
        }
    }

    /// Same claim on both axes.
    #[must_use]
    pub fn uniform(parts: f64) -> Self {
        Self::new(parts, parts)
    }

    /// Claim along `axis`.
    #[inline]
    #[must_use]
    pub const fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, other: Weight) -> Weight {
        Weight {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
        }
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<f64> for Weight {
    fn from(parts: f64) -> Self {
        Self::uniform(parts)
    }
}

impl From<(f64, f64)> for Weight {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

fn sanitize_weight(parts: f64) -> f64 {
    if parts.is_finite() && parts > 0.0 {
        parts
    } else {
        0.0
    }
}

/// Derived data written by the layout passes.
///
/// Not authoritative: [`LayoutTree`](crate::LayoutTree) only exposes it while
/// the generation that produced it is current.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NodeCache {
    pub(crate) min_size: Size,
    pub(crate) weight: Weight,
    pub(crate) region: Rect,
    pub(crate) grid: Option<FlexGrid>,
    /// False when the node sits in an unselected tab.
    pub(crate) active: bool,
}

/// Children of a group node.
#[derive(Clone)]
pub struct Group {
    pub(crate) grouping: Grouping,
    pub(crate) children: Vec<LayoutNode>,
    pub(crate) selected_tab: usize,
}

impl Group {
    /// Arrangement mode.
    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    /// Ordered children.
    pub fn children(&self) -> &[LayoutNode] {
        &self.children
    }

    /// Selected tab index (meaningful for tabbed groups only).
    pub fn selected_tab(&self) -> usize {
        self.selected_tab
    }
}

/// Leaf or group.
#[derive(Clone)]
pub enum NodeKind {
    Leaf(Rc<dyn Panel>),
    Group(Group),
}

/// One region in the arrangement tree.
#[derive(Clone)]
pub struct LayoutNode {
    pub(crate) kind: NodeKind,
    pub(crate) visible: bool,
    pub(crate) aspect_ratio: f64,
    pub(crate) weight: Weight,
    pub(crate) label: Option<String>,
    pub(crate) cache: NodeCache,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl LayoutNode {
    /// Leaf node for a shared panel.
    ///
    /// The node's aspect ratio is taken from [`Panel::aspect_ratio`], or
    /// `1.0` when the panel declares none.
    pub fn leaf(panel: Rc<dyn Panel>) -> Self {
        let aspect_ratio = panel
            .aspect_ratio()
            .map_or(DEFAULT_ASPECT_RATIO, sanitize_aspect_ratio);
        Self::with_kind(NodeKind::Leaf(panel), aspect_ratio)
    }

    /// Group node with the given children, without flattening.
    ///
    /// Prefer the combinators in [`crate::builder`], which apply the
    /// auto-flatten rule.
    pub fn group(grouping: Grouping, children: Vec<LayoutNode>) -> Self {
        Self::with_kind(
            NodeKind::Group(Group {
                grouping,
                children,
                selected_tab: 0,
            }),
            DEFAULT_ASPECT_RATIO,
        )
    }

    fn with_kind(kind: NodeKind, aspect_ratio: f64) -> Self {
        Self {
            kind,
            visible: true,
            aspect_ratio,
            weight: Weight::ONE,
            label: None,
            cache: NodeCache::default(),
        }
    }

    /// Declare the weight used for a leaf. Groups compute theirs from
    /// their children, so this has no effect on a group.
    #[must_use]
    pub fn with_weight(mut self, weight: impl Into<Weight>) -> Self {
        self.weight = weight.into();
        self
    }

    /// Override the declared aspect ratio. Non-finite or non-positive
    /// ratios become `1.0`.
    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = sanitize_aspect_ratio(ratio);
        self
    }

    /// Attach a diagnostic label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Select the initial tab of a tabbed group. The index is validated by
    /// the constraint pass; on other nodes this has no effect.
    #[must_use]
    pub fn with_selected_tab(mut self, index: usize) -> Self {
        if let NodeKind::Group(group) = &mut self.kind {
            group.selected_tab = index;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl LayoutNode {
    /// Leaf or group payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Whether this node can never produce a region: a group with no children.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            NodeKind::Leaf(_) => false,
            NodeKind::Group(group) => group.children.is_empty(),
        }
    }

    /// Arrangement mode, `None` for leaves.
    pub fn grouping(&self) -> Option<Grouping> {
        match &self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Group(group) => Some(group.grouping),
        }
    }

    /// Children in order; empty for leaves.
    pub fn children(&self) -> &[LayoutNode] {
        match &self.kind {
            NodeKind::Leaf(_) => &[],
            NodeKind::Group(group) => &group.children,
        }
    }

    /// Shared payload, `None` for groups.
    pub fn panel(&self) -> Option<&Rc<dyn Panel>> {
        match &self.kind {
            NodeKind::Leaf(panel) => Some(panel),
            NodeKind::Group(_) => None,
        }
    }

    /// Whether this is a leaf holding exactly this panel (by identity).
    pub fn holds_panel<P: ?Sized>(&self, panel: &Rc<P>) -> bool {
        self.panel()
            .is_some_and(|own| panel_addr(own) == panel_addr(panel))
    }

    /// Selected tab index for tabbed groups.
    pub fn selected_tab(&self) -> Option<usize> {
        match &self.kind {
            NodeKind::Group(group) if group.grouping == Grouping::Tabbed => {
                Some(group.selected_tab)
            }
            _ => None,
        }
    }

    /// Declared aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Declared weight (used for leaves).
    pub fn declared_weight(&self) -> Weight {
        self.weight
    }

    /// Diagnostic label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Child at `index`.
    pub fn child(&self, index: usize) -> Option<&LayoutNode> {
        self.children().get(index)
    }

    /// Node at `path` below this one.
    pub fn descendant(&self, path: &[usize]) -> Option<&LayoutNode> {
        path.iter()
            .try_fold(self, |node, &index| node.child(index))
    }

    pub(crate) fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut LayoutNode> {
        let mut node = self;
        for &index in path {
            node = match &mut node.kind {
                NodeKind::Group(group) => group.children.get_mut(index)?,
                NodeKind::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    pub(crate) fn children_mut(&mut self) -> &mut [LayoutNode] {
        match &mut self.kind {
            NodeKind::Leaf(_) => &mut [],
            NodeKind::Group(group) => &mut group.children,
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(LayoutNode::node_count).sum::<usize>()
    }

    /// Visit every node of this subtree depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&NodePath, &'a LayoutNode)) {
        fn recurse<'a>(
            node: &'a LayoutNode,
            path: &mut NodePath,
            visit: &mut impl FnMut(&NodePath, &'a LayoutNode),
        ) {
            visit(path, node);
            for (index, child) in node.children().iter().enumerate() {
                path.push(index);
                recurse(child, path, visit);
                path.pop();
            }
        }
        recurse(self, &mut NodePath::root(), visit);
    }
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(panel) => write!(f, "Leaf({:p})", panel_addr(panel)),
            Self::Group(group) => f
                .debug_struct("Group")
                .field("grouping", &group.grouping)
                .field("selected_tab", &group.selected_tab)
                .field("children", &group.children)
                .finish(),
        }
    }
}

impl fmt::Debug for LayoutNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutNode")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("visible", &self.visible)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("weight", &self.weight)
            .finish()
    }
}
