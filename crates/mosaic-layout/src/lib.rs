#![forbid(unsafe_code)]

//! Nested-panel layout engine.
//!
//! A layout is a tree of [`LayoutNode`]s. Leaves hold shared [`Panel`]s;
//! groups arrange their children as tabs, side by side, one above the
//! other, overlaid, or packed into an aspect-preserving grid ("flex"). Trees
//! are assembled with the combinators in [`builder`] and resolved by a
//! [`LayoutTree`] in two passes:
//!
//! 1. the constraint pass computes every node's minimum size and weight,
//!    bottom up;
//! 2. the region pass hands every node a pixel rectangle, top down.
//!
//! ```
//! use mosaic_layout::{LayoutNode, LayoutTree, Rect, StaticPanel};
//!
//! let viewer = StaticPanel::for_image((640, 480)).shared();
//! let sidebar = StaticPanel::new((120, 0)).shared();
//! let log = StaticPanel::new((0, 80)).shared();
//!
//! let root = (LayoutNode::leaf(sidebar.clone()).with_weight((0.0, 1.0)) | viewer.clone())
//!     / LayoutNode::leaf(log).with_weight((1.0, 0.0));
//! let mut tree = LayoutTree::new(root);
//! tree.layout(Rect::from_size(800, 600))?;
//!
//! assert_eq!(sidebar.region(), Some(Rect::new(0, 0, 120, 520)));
//! assert_eq!(viewer.region(), Some(Rect::new(120, 0, 680, 520)));
//! # Ok::<(), mosaic_layout::LayoutError>(())
//! ```

pub mod builder;
pub mod config;
mod constraint;
pub mod debug;
pub mod error;
pub mod node;
pub mod packing;
pub mod panel;
mod region;
pub mod tree;
mod visibility;

pub use mosaic_core::geometry::{Rect, Size};

pub use builder::{IntoLayoutNode, flex, horizontal, stacked, tabbed, tabs, vertical};
pub use config::{LayoutConfig, YAxis, ZeroWeightPolicy};
pub use debug::{LayoutSnapshot, NodeSnapshot};
pub use error::{LayoutError, LayoutErrorKind};
pub use node::{Axis, Group, Grouping, LayoutNode, NodeKind, NodePath, Weight};
pub use packing::FlexGrid;
pub use panel::{Panel, StaticPanel};
pub use tree::{HitResult, LayoutTree, NodeConstraints, RenderedLeaf};
