//! The owner of a layout tree and its pass results.
//!
//! [`LayoutTree`] keeps a generation counter that every structural change
//! bumps. Each pass records the generation it ran at, and every query checks
//! it, so cached minimums and regions from an older tree are never observed:
//!
//! ```
//! use mosaic_layout::{LayoutTree, LayoutNode, Rect, StaticPanel};
//!
//! let left = StaticPanel::new((100, 50)).shared();
//! let right = StaticPanel::new((100, 50)).shared();
//! let mut tree = LayoutTree::new(LayoutNode::leaf(left) | right.clone());
//!
//! tree.layout(Rect::from_size(400, 300)).unwrap();
//! assert_eq!(right.region(), Some(Rect::new(200, 0, 200, 300)));
//! ```

use std::rc::Rc;
use std::time::Instant;

use mosaic_core::geometry::{Rect, Size};
use tracing::{debug, error};

use crate::config::LayoutConfig;
use crate::constraint;
use crate::error::LayoutError;
use crate::node::{Grouping, LayoutNode, NodeKind, NodePath, Weight};
use crate::packing::FlexGrid;
use crate::panel::Panel;
use crate::region;
use crate::visibility;

/// Constraint pass results for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeConstraints {
    /// Minimum pixel footprint.
    pub min_size: Size,
    /// Claim on space beyond the minimum.
    pub weight: Weight,
    /// Grid estimated for flex groups.
    pub grid: Option<FlexGrid>,
}

/// A leaf that is drawn, in draw order.
#[derive(Clone)]
pub struct RenderedLeaf {
    pub path: NodePath,
    pub panel: Rc<dyn Panel>,
    pub region: Rect,
}

/// The top-most rendered leaf under a pointer.
#[derive(Clone)]
pub struct HitResult {
    pub path: NodePath,
    pub panel: Rc<dyn Panel>,
    pub region: Rect,
    /// Pointer position relative to the region origin.
    pub local: (f64, f64),
    /// Pointer position with the region spanning `[0, 1]` on both axes.
    pub normalized: (f64, f64),
}

impl std::fmt::Debug for RenderedLeaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedLeaf")
            .field("path", &self.path)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for HitResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitResult")
            .field("path", &self.path)
            .field("region", &self.region)
            .field("local", &self.local)
            .field("normalized", &self.normalized)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Resolved {
    generation: u64,
    area: Rect,
}

/// A layout tree together with its configuration and pass bookkeeping.
#[derive(Debug)]
pub struct LayoutTree {
    root: LayoutNode,
    config: LayoutConfig,
    generation: u64,
    constraints_generation: Option<u64>,
    resolved: Option<Resolved>,
}

// ---------------------------------------------------------------------------
// Construction and structure
// ---------------------------------------------------------------------------

impl LayoutTree {
    /// Tree with the default configuration.
    pub fn new(root: impl Into<LayoutNode>) -> Self {
        Self::with_config(root, LayoutConfig::default())
    }

    /// Tree with an explicit configuration.
    pub fn with_config(root: impl Into<LayoutNode>, config: LayoutConfig) -> Self {
        Self {
            root: root.into(),
            config,
            generation: 0,
            constraints_generation: None,
            resolved: None,
        }
    }

    pub fn root(&self) -> &LayoutNode {
        &self.root
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the configuration. Both passes must run again.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.bump();
    }

    /// Current structural generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Node at `path`.
    pub fn node(&self, path: impl AsRef<[usize]>) -> Result<&LayoutNode, LayoutError> {
        let path = path.as_ref();
        self.root
            .descendant(path)
            .ok_or_else(|| no_such_node(path))
    }

    /// Replace the whole tree.
    pub fn set_root(&mut self, root: impl Into<LayoutNode>) -> LayoutNode {
        let old = std::mem::replace(&mut self.root, root.into());
        self.bump();
        old
    }

    /// Replace the subtree at `path`, returning the old one.
    pub fn replace_subtree(
        &mut self,
        path: impl AsRef<[usize]>,
        node: impl Into<LayoutNode>,
    ) -> Result<LayoutNode, LayoutError> {
        let path = path.as_ref();
        let slot = self
            .root
            .descendant_mut(path)
            .ok_or_else(|| no_such_node(path))?;
        let old = std::mem::replace(slot, node.into());
        self.bump();
        Ok(old)
    }

    /// Select the visible tab of the tabbed group at `path`.
    ///
    /// Constraints stay valid; resolved regions are discarded when the
    /// selection changes.
    pub fn select_tab(
        &mut self,
        path: impl AsRef<[usize]>,
        index: usize,
    ) -> Result<(), LayoutError> {
        let path = path.as_ref();
        let node = self
            .root
            .descendant_mut(path)
            .ok_or_else(|| no_such_node(path))?;
        let NodeKind::Group(group) = &mut node.kind else {
            return Err(LayoutError::NotTabbed { path: path.into() });
        };
        if group.grouping != Grouping::Tabbed {
            return Err(LayoutError::NotTabbed { path: path.into() });
        }
        if index >= group.children.len() {
            return Err(LayoutError::TabOutOfRange {
                path: path.into(),
                selected: index,
                len: group.children.len(),
            });
        }
        if group.selected_tab != index {
            debug!(path = %NodePath::from(path), tab = index, "tab selected");
            group.selected_tab = index;
            self.resolved = None;
        }
        Ok(())
    }

    fn bump(&mut self) {
        self.generation += 1;
        self.resolved = None;
    }
}

impl From<LayoutNode> for LayoutTree {
    fn from(root: LayoutNode) -> Self {
        Self::new(root)
    }
}

fn no_such_node(path: &[usize]) -> LayoutError {
    LayoutError::NoSuchNode { path: path.into() }
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

impl LayoutTree {
    /// Run the constraint pass over the whole tree.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid tree. The constraints
    /// are then left stale.
    pub fn compute_constraints(&mut self) -> Result<(), LayoutError> {
        let start = Instant::now();
        let _span = tracing::debug_span!(
            "layout.constraints",
            generation = self.generation,
            nodes = self.root.node_count(),
        )
        .entered();

        self.constraints_generation = None;
        constraint::compute_constraints(&mut self.root, &self.config)?;
        self.constraints_generation = Some(self.generation);

        debug!(
            min_width = self.root.cache.min_size.width,
            min_height = self.root.cache.min_size.height,
            duration_us = start.elapsed().as_micros() as u64,
            "constraint pass completed"
        );
        Ok(())
    }

    /// Run the region pass for `area`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleConstraints`] when the constraint pass has not
    /// completed at the current generation. No region is written.
    pub fn compute_regions(&mut self, area: Rect) -> Result<(), LayoutError> {
        self.ensure_constraints()?;

        let start = Instant::now();
        let _span = tracing::debug_span!(
            "layout.regions",
            generation = self.generation,
            area = %area,
        )
        .entered();

        region::assign_regions(&mut self.root, area, &self.config);
        self.resolved = Some(Resolved {
            generation: self.generation,
            area,
        });

        debug!(
            duration_us = start.elapsed().as_micros() as u64,
            "region pass completed"
        );
        Ok(())
    }

    /// Bring the tree up to date for `area`, running only what is needed.
    ///
    /// Returns `false` when the regions were already current for `area` and
    /// nothing ran.
    pub fn layout(&mut self, area: Rect) -> Result<bool, LayoutError> {
        if self.constraints_generation != Some(self.generation) {
            self.compute_constraints()?;
        }
        let current = Resolved {
            generation: self.generation,
            area,
        };
        if self.resolved == Some(current) {
            return Ok(false);
        }
        self.compute_regions(area)?;
        Ok(true)
    }

    /// Whether the constraint pass is current.
    pub fn has_current_constraints(&self) -> bool {
        self.constraints_generation == Some(self.generation)
    }

    /// Outer region of the last region pass, if it is current.
    pub fn resolved_area(&self) -> Option<Rect> {
        self.resolved
            .filter(|resolved| resolved.generation == self.generation)
            .map(|resolved| resolved.area)
    }

    fn ensure_constraints(&self) -> Result<(), LayoutError> {
        if self.has_current_constraints() {
            return Ok(());
        }
        error!(
            tree_generation = self.generation,
            constraints_generation = ?self.constraints_generation,
            "region pass requested with stale constraints"
        );
        Err(LayoutError::StaleConstraints {
            tree_generation: self.generation,
            constraints_generation: self.constraints_generation,
        })
    }

    fn ensure_regions(&self) -> Result<(), LayoutError> {
        if !self.has_current_constraints() {
            return Err(LayoutError::StaleConstraints {
                tree_generation: self.generation,
                constraints_generation: self.constraints_generation,
            });
        }
        if self.resolved_area().is_none() {
            return Err(LayoutError::RegionsNotResolved);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl LayoutTree {
    /// Constraint pass results for the node at `path`.
    pub fn constraints(&self, path: impl AsRef<[usize]>) -> Result<NodeConstraints, LayoutError> {
        if !self.has_current_constraints() {
            return Err(LayoutError::StaleConstraints {
                tree_generation: self.generation,
                constraints_generation: self.constraints_generation,
            });
        }
        let node = self.node(path)?;
        Ok(NodeConstraints {
            min_size: node.cache.min_size,
            weight: node.cache.weight,
            grid: node.cache.grid,
        })
    }

    /// Resolved region of the node at `path`.
    pub fn region(&self, path: impl AsRef<[usize]>) -> Result<Rect, LayoutError> {
        self.ensure_regions()?;
        Ok(self.node(path)?.cache.region)
    }

    /// Whether the node at `path` is drawn: it and all its ancestors are
    /// shown, and it lies on the selected path of every tabbed ancestor.
    pub fn is_rendered(&self, path: impl AsRef<[usize]>) -> Result<bool, LayoutError> {
        let path = path.as_ref();
        visibility::is_rendered(&self.root, path).ok_or_else(|| no_such_node(path))
    }

    /// Every rendered leaf with its region, in draw order.
    ///
    /// Stacked children are drawn first to last, so later entries are on
    /// top of earlier ones.
    pub fn rendered_leaves(&self) -> Result<Vec<RenderedLeaf>, LayoutError> {
        self.ensure_regions()?;
        let mut out = Vec::new();
        collect_rendered(&self.root, &mut NodePath::root(), &mut out);
        Ok(out)
    }

    /// The top-most rendered leaf containing `(x, y)`.
    pub fn hit_test(&self, x: f64, y: f64) -> Result<Option<HitResult>, LayoutError> {
        let hit = self
            .rendered_leaves()?
            .into_iter()
            .rev()
            .find(|leaf| leaf.region.contains_point(x, y))
            .map(|leaf| HitResult {
                local: leaf.region.relative_point(x, y),
                normalized: leaf.region.normalized_point(x, y),
                path: leaf.path,
                panel: leaf.panel,
                region: leaf.region,
            });
        Ok(hit)
    }

    /// Paths of every leaf holding `panel`, in tree order.
    pub fn find_panel<P: ?Sized>(&self, panel: &Rc<P>) -> Vec<NodePath> {
        let mut out = Vec::new();
        self.root.walk(&mut |path, node| {
            if node.holds_panel(panel) {
                out.push(path.clone());
            }
        });
        out
    }
}

fn collect_rendered(node: &LayoutNode, path: &mut NodePath, out: &mut Vec<RenderedLeaf>) {
    if !node.visible {
        return;
    }
    match &node.kind {
        NodeKind::Leaf(panel) => out.push(RenderedLeaf {
            path: path.clone(),
            panel: Rc::clone(panel),
            region: node.cache.region,
        }),
        NodeKind::Group(group) => {
            for (index, child) in group.children.iter().enumerate() {
                if group.grouping == Grouping::Tabbed && index != group.selected_tab {
                    continue;
                }
                path.push(index);
                collect_rendered(child, path, out);
                path.pop();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

impl LayoutTree {
    /// Show or hide every leaf holding `panel`. Returns the number of leaves
    /// changed.
    pub fn show_panel<P: ?Sized>(&mut self, panel: &Rc<P>, visible: bool) -> usize {
        self.root.show_panel(panel, visible)
    }

    /// Show or hide the node at `path`.
    pub fn show_node(
        &mut self,
        path: impl AsRef<[usize]>,
        visible: bool,
    ) -> Result<(), LayoutError> {
        let path = path.as_ref();
        self.root
            .descendant_mut(path)
            .ok_or_else(|| no_such_node(path))?
            .show(visible);
        Ok(())
    }

    /// Show or hide the whole tree.
    pub fn show(&mut self, visible: bool) {
        self.root.show(visible);
    }

    pub fn hide(&mut self) {
        self.root.hide();
    }

    /// The root's own visibility flag.
    pub fn is_shown(&self) -> bool {
        self.root.is_shown()
    }
}
